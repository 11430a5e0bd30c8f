//! Provenance bundle canonicalization
//!
//! Produces a content hash of a bundle that ignores array order and the
//! volatile anchoring fields (`anchorStatus`, `chainRef.status`,
//! `chainRef.anchoredAt`). The digest is SHA-256 over the canonical text,
//! rendered as 64 lowercase hex characters.

mod canonical;
mod model;

pub use canonical::{
    canonicalize, canonicalize_value, hash, hash_value, short_fingerprint, SHORT_FINGERPRINT_LEN,
    VOLATILE_CHAIN_REF_FIELDS, VOLATILE_FIELDS,
};
pub use model::{AnchorStatus, ChainRef, ProvenanceBundle, Signature};
