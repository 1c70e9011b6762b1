//! Shell descriptor shape of the legacy `/registry` API

use serde::{Deserialize, Serialize};

use super::DescriptorIds;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShellDescriptor {
    pub description: Vec<LangString>,
    pub global_asset_id: Reference,
    pub id_short: String,
    pub identification: String,
    pub specific_asset_ids: Vec<SpecificAssetId>,
    pub submodel_descriptors: Vec<SubmodelDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LangString {
    pub language: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    pub value: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecificAssetId {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmodelDescriptor {
    pub description: Vec<LangString>,
    pub id_short: String,
    pub identification: String,
    pub semantic_id: Reference,
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
    pub endpoint_address: String,
    pub endpoint_protocol: String,
    pub endpoint_protocol_version: String,
}

fn en(text: &str) -> Vec<LangString> {
    vec![LangString {
        language: "en".to_string(),
        text: text.to_string(),
    }]
}

fn submodel(id: &str, id_short: &str, semantic_id: &str, address: &str) -> SubmodelDescriptor {
    SubmodelDescriptor {
        description: en("Provides base vehicle information"),
        id_short: id_short.to_string(),
        identification: id.to_string(),
        semantic_id: Reference {
            value: vec![semantic_id.to_string()],
        },
        endpoints: vec![Endpoint {
            interface: "HTTP".to_string(),
            protocol_information: ProtocolInformation {
                endpoint_address: address.to_string(),
                endpoint_protocol: "HTTPS".to_string(),
                endpoint_protocol_version: "1.0".to_string(),
            },
        }],
    }
}

/// Vehicle shell with a material and a part id and two submodels
pub fn shell_descriptor(ids: &DescriptorIds) -> ShellDescriptor {
    let [material_id, part_id] = &ids.specific_asset_ids;
    let [base_details_id, part_details_id] = &ids.submodel_ids;

    ShellDescriptor {
        description: en("The shell for a vehicle"),
        global_asset_id: Reference {
            value: vec![ids.global_asset_id.clone()],
        },
        id_short: "future concept x".to_string(),
        identification: ids.shell_id.clone(),
        specific_asset_ids: vec![
            SpecificAssetId {
                key: "MaterialId".to_string(),
                value: material_id.clone(),
            },
            SpecificAssetId {
                key: "PartId".to_string(),
                value: part_id.clone(),
            },
        ],
        submodel_descriptors: vec![
            submodel(
                base_details_id,
                "vehicle base details",
                "urn:bamm:com.catenax.vehicle:0.1.1",
                "https://catena-x.net/vehicle/basedetails/",
            ),
            submodel(
                part_details_id,
                "vehicle part details",
                "urn:bamm:com.catenax.vehicle:0.1.1#PartDetails",
                "https://catena-x.net/vehicle/partdetails/",
            ),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_legacy_field_names() {
        let ids = DescriptorIds::random();
        let value = serde_json::to_value(shell_descriptor(&ids)).unwrap();

        assert_eq!(value["identification"], json!(ids.shell_id));
        assert_eq!(value["idShort"], json!("future concept x"));
        assert_eq!(value["globalAssetId"], json!({ "value": [ids.global_asset_id] }));
        assert_eq!(
            value["specificAssetIds"],
            json!([
                { "key": "MaterialId", "value": ids.specific_asset_ids[0] },
                { "key": "PartId", "value": ids.specific_asset_ids[1] },
            ])
        );
        assert_eq!(
            value["submodelDescriptors"][1]["endpoints"][0]["protocolInformation"],
            json!({
                "endpointAddress": "https://catena-x.net/vehicle/partdetails/",
                "endpointProtocol": "HTTPS",
                "endpointProtocolVersion": "1.0",
            })
        );
    }

    #[test]
    fn submodels_take_generated_ids() {
        let ids = DescriptorIds::random();
        let shell = shell_descriptor(&ids);
        let submodel_ids: Vec<_> = shell
            .submodel_descriptors
            .iter()
            .map(|s| s.identification.clone())
            .collect();
        assert_eq!(submodel_ids, ids.submodel_ids.to_vec());
    }
}
