use crate::encoding::{encode_query_value, IdEncoding};
use crate::journey::Step;
use crate::payload::{legacy, v3, DescriptorIds, ShellPayload};
use crate::transport::RegistryRequest;

/// Tenant header of the v3 API
pub const EDC_BPN_HEADER: &str = "Edc-Bpn";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiVersion {
    Legacy,
    V3,
}

/// One versioned shape of the registry API.
///
/// The two versions differ in paths, payload field names, id encoding and
/// tenant handling; they are kept as separate profiles rather than merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiProfile {
    pub version: ApiVersion,
    pub descriptors_path: String,
    pub lookup_path: String,
    pub id_encoding: IdEncoding,
    /// Business partner number sent as [`EDC_BPN_HEADER`]
    pub bpn: Option<String>,
}

/// Legacy profile
///
/// - `POST /registry/shell-descriptors`
/// - `GET /registry/shell-descriptors/{id}` with the raw id
/// - `GET /lookup/shells?assetIds={assetIds}`
/// - no tenant header
pub fn legacy_profile() -> ApiProfile {
    ApiProfile {
        version: ApiVersion::Legacy,
        descriptors_path: "/registry/shell-descriptors".to_string(),
        lookup_path: "/lookup/shells".to_string(),
        id_encoding: IdEncoding::Raw,
        bpn: None,
    }
}

/// v3 profile under `prefix` (normally `/api/v3`)
///
/// - `POST {prefix}/shell-descriptors`
/// - `GET {prefix}/shell-descriptors/{id}` with the base64url id
/// - `GET {prefix}/lookup/shells?assetIds={assetIds}`
/// - `Edc-Bpn` header on every request when a BPN is configured
pub fn v3_profile(prefix: &str, bpn: Option<String>) -> ApiProfile {
    ApiProfile {
        version: ApiVersion::V3,
        descriptors_path: format!("{prefix}/shell-descriptors"),
        lookup_path: format!("{prefix}/lookup/shells"),
        id_encoding: IdEncoding::Base64Url,
        bpn,
    }
}

impl ApiProfile {
    /// A new payload with freshly generated identifiers
    pub fn generate_shell(&self) -> ShellPayload {
        self.shell_from_ids(&DescriptorIds::random())
    }

    pub fn shell_from_ids(&self, ids: &DescriptorIds) -> ShellPayload {
        match self.version {
            ApiVersion::Legacy => ShellPayload::Legacy(legacy::shell_descriptor(ids)),
            ApiVersion::V3 => ShellPayload::V3(v3::shell_descriptor(ids, self.bpn.as_deref())),
        }
    }

    /// Statistics name the requests of `step` are recorded under
    pub fn endpoint_name(&self, step: Step) -> String {
        match step {
            Step::Create => self.descriptors_path.clone(),
            Step::ReadBack => format!("{}/{{id}}", self.descriptors_path),
            Step::Lookup => format!("{}?assetIds={{assetIds}}", self.lookup_path),
        }
    }

    pub fn create_request(&self, body: Vec<u8>) -> RegistryRequest {
        let request = RegistryRequest::post_json(
            &self.descriptors_path,
            self.endpoint_name(Step::Create),
            body,
        );
        self.with_tenant(request)
    }

    pub fn read_back_request(&self, shell_id: &str) -> RegistryRequest {
        let path = format!(
            "{}/{}",
            self.descriptors_path,
            self.id_encoding.encode(shell_id)
        );
        self.with_tenant(RegistryRequest::get(path, self.endpoint_name(Step::ReadBack)))
    }

    /// `asset_ids_json` is the serialized specific asset id list
    pub fn lookup_request(&self, asset_ids_json: &str) -> RegistryRequest {
        let path = format!(
            "{}?assetIds={}",
            self.lookup_path,
            encode_query_value(asset_ids_json)
        );
        self.with_tenant(RegistryRequest::get(path, self.endpoint_name(Step::Lookup)))
    }

    fn with_tenant(&self, request: RegistryRequest) -> RegistryRequest {
        match &self.bpn {
            Some(bpn) => request.with_header(EDC_BPN_HEADER, bpn),
            None => request,
        }
    }
}
