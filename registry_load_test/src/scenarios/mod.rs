// Scenarios module
// Contains load test scenario implementations

pub mod smoke;
pub mod swarm;
