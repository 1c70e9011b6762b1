// Command line interface

mod args;

pub use args::{Api, Cli, Mode, SmokeArgs, SwarmArgs, TargetArgs, V3Args};
