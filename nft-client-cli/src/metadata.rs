//! Off-chain JSON metadata document referenced by collection and item URIs.

use serde::{Deserialize, Serialize};

use nft_client_core::error::{NftClientError, NftResult};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NftMetadata {
    pub name: String,
    pub symbol: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation_url: Option<String>,
    #[serde(default)]
    pub attributes: Vec<NftAttribute>,
    #[serde(default)]
    pub properties: NftProperties,
    #[serde(default)]
    pub seller_fee_basis_points: u16,
    #[serde(default)]
    pub creators: Vec<NftCreator>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NftAttribute {
    pub trait_type: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NftProperties {
    #[serde(default)]
    pub files: Vec<NftFile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NftFile {
    pub uri: String,
    #[serde(rename = "type")]
    pub file_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NftCreator {
    pub address: String,
    pub share: u8,
}

impl NftMetadata {
    /// On-chain royalty is a whole percentage; basis points are truncated.
    pub fn royalty_percentage(&self) -> NftResult<u8> {
        let percentage = self.seller_fee_basis_points / 100;
        if percentage > 100 {
            return Err(NftClientError::InvalidRoyaltyPercentage { percentage });
        }
        Ok(percentage as u8)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
