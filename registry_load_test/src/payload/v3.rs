//! Shell descriptor shape of the v3 `/api/v3` API.
//!
//! Enum values follow the asset administration shell metamodel spelling
//! (`ExternalReference`, `GlobalReference`, `Instance`, ...).

use serde::{Deserialize, Serialize};

use super::DescriptorIds;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShellDescriptor {
    pub id: String,
    pub id_short: String,
    pub description: Vec<LangString>,
    pub display_name: Vec<LangString>,
    pub global_asset_id: String,
    pub asset_kind: AssetKind,
    pub asset_type: String,
    pub specific_asset_ids: Vec<SpecificAssetId>,
    pub submodel_descriptors: Vec<SubmodelDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LangString {
    pub language: String,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssetKind {
    Instance,
    Type,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecificAssetId {
    pub name: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_subject_id: Option<Reference>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    #[serde(rename = "type")]
    pub kind: ReferenceType,
    pub keys: Vec<Key>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReferenceType {
    ExternalReference,
    ModelReference,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Key {
    #[serde(rename = "type")]
    pub kind: KeyType,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyType {
    GlobalReference,
    Submodel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmodelDescriptor {
    pub id: String,
    pub id_short: String,
    pub semantic_id: Reference,
    pub description: Vec<LangString>,
    pub endpoints: Vec<Endpoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    pub interface: String,
    pub protocol_information: ProtocolInformation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtocolInformation {
    pub href: String,
    pub endpoint_protocol: String,
    pub endpoint_protocol_version: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subprotocol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subprotocol_body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subprotocol_body_encoding: Option<String>,
    pub security_attributes: Vec<SecurityAttribute>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityAttribute {
    #[serde(rename = "type")]
    pub kind: SecurityType,
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SecurityType {
    None,
    RfcTlsa,
    W3cDid,
}

const DATA_PLANE_URL: &str = "https://edc.data.plane/api/public/data";
const DSP_ENDPOINT: &str = "https://edc.control.plane/api/v1/dsp";

fn en(text: &str) -> Vec<LangString> {
    vec![LangString {
        language: "en".to_string(),
        text: text.to_string(),
    }]
}

fn external_reference(kind: KeyType, value: &str) -> Reference {
    Reference {
        kind: ReferenceType::ExternalReference,
        keys: vec![Key {
            kind,
            value: value.to_string(),
        }],
    }
}

fn specific_asset_id(name: &str, value: &str, bpn: Option<&str>) -> SpecificAssetId {
    SpecificAssetId {
        name: name.to_string(),
        value: value.to_string(),
        external_subject_id: bpn.map(|bpn| external_reference(KeyType::GlobalReference, bpn)),
    }
}

fn submodel(id: &str, id_short: &str, semantic_id: &str) -> SubmodelDescriptor {
    SubmodelDescriptor {
        id: id.to_string(),
        id_short: id_short.to_string(),
        semantic_id: external_reference(KeyType::Submodel, semantic_id),
        description: en("Provides base vehicle information"),
        endpoints: vec![Endpoint {
            interface: "SUBMODEL-3.0".to_string(),
            protocol_information: ProtocolInformation {
                href: format!("{DATA_PLANE_URL}/{id}"),
                endpoint_protocol: "HTTP".to_string(),
                endpoint_protocol_version: vec!["1.1".to_string()],
                subprotocol: Some("DSP".to_string()),
                subprotocol_body: Some(format!("id={id};dspEndpoint={DSP_ENDPOINT}")),
                subprotocol_body_encoding: Some("plain".to_string()),
                security_attributes: vec![SecurityAttribute {
                    kind: SecurityType::None,
                    key: "NONE".to_string(),
                    value: "NONE".to_string(),
                }],
            },
        }],
    }
}

/// Vehicle shell with a material and a part id and two submodels.
///
/// When `bpn` is given every specific asset id is scoped to that business
/// partner through its external subject id.
pub fn shell_descriptor(ids: &DescriptorIds, bpn: Option<&str>) -> ShellDescriptor {
    let [material_id, part_id] = &ids.specific_asset_ids;
    let [base_details_id, part_details_id] = &ids.submodel_ids;

    ShellDescriptor {
        id: ids.shell_id.clone(),
        id_short: "futureConceptX".to_string(),
        description: en("The shell for a vehicle"),
        display_name: en("Future concept x"),
        global_asset_id: ids.global_asset_id.clone(),
        asset_kind: AssetKind::Instance,
        asset_type: "Vehicle".to_string(),
        specific_asset_ids: vec![
            specific_asset_id("MaterialId", material_id, bpn),
            specific_asset_id("PartId", part_id, bpn),
        ],
        submodel_descriptors: vec![
            submodel(
                base_details_id,
                "vehicleBaseDetails",
                "urn:bamm:com.catenax.vehicle:0.1.1",
            ),
            submodel(
                part_details_id,
                "vehiclePartDetails",
                "urn:bamm:com.catenax.vehicle:0.1.1#PartDetails",
            ),
        ],
    }
}
