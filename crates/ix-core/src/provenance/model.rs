//! Provenance bundle data model

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Anchoring lifecycle of a bundle. Volatile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum AnchorStatus {
    #[default]
    NotRequested,
    Pending,
    Anchored,
}

/// On-chain anchoring reference
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainRef {
    /// Chain-side status. Volatile.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// When anchoring was confirmed. Volatile.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchored_at: Option<String>,
    /// Stable fields such as chain id or transaction reference
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// A signature over the bundle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signature {
    pub signer: String,
    pub signature: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Signature {
    pub fn new(signer: impl Into<String>, signature: impl Into<String>) -> Self {
        Self {
            signer: signer.into(),
            signature: signature.into(),
            extra: BTreeMap::new(),
        }
    }
}

/// Provenance attached to a source record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvenanceBundle {
    /// Anchoring status. Volatile.
    #[serde(default)]
    pub anchor_status: AnchorStatus,
    /// Content identifier; `None` and `Some("")` are distinct
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_ref: Option<ChainRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relay_ids: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signatures: Option<Vec<Signature>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provenance_version: Option<String>,
    /// Any other fields, kept so they participate in the hash
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}
