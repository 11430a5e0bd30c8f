//! Canonical form and content hash of provenance bundles

use super::model::ProvenanceBundle;
use crate::error::{IxError, Result};
use serde_json::{Map, Number, Value};
use sha2::{Digest, Sha256};

/// Top-level fields excluded from the canonical form
pub const VOLATILE_FIELDS: &[&str] = &["anchorStatus"];

/// `chainRef` fields excluded from the canonical form
pub const VOLATILE_CHAIN_REF_FIELDS: &[&str] = &["status", "anchoredAt"];

/// Length of [`short_fingerprint`] output
pub const SHORT_FINGERPRINT_LEN: usize = 12;

/// Canonicalize a typed bundle
pub fn canonicalize(bundle: &ProvenanceBundle) -> Result<String> {
    canonicalize_value(&serde_json::to_value(bundle)?)
}

/// SHA-256 of the canonical form of a typed bundle, lowercase hex
pub fn hash(bundle: &ProvenanceBundle) -> Result<String> {
    Ok(digest(&canonicalize(bundle)?))
}

/// Canonicalize an untyped bundle.
///
/// Volatile fields are dropped, object keys are sorted and the elements of
/// every array are sorted by their own canonical text. Integral floats are
/// written as integers. Fails only if `value` is not a JSON object.
pub fn canonicalize_value(value: &Value) -> Result<String> {
    let object = value.as_object().ok_or_else(|| {
        IxError::InvalidProvenance(format!("expected a JSON object, got {}", type_name(value)))
    })?;

    let mut stable = object.clone();
    for field in VOLATILE_FIELDS {
        stable.remove(*field);
    }
    if let Some(Value::Object(chain_ref)) = stable.get_mut("chainRef") {
        for field in VOLATILE_CHAIN_REF_FIELDS {
            chain_ref.remove(*field);
        }
    }

    let mut out = String::new();
    write_object(&stable, &mut out);
    Ok(out)
}

/// SHA-256 of the canonical form of an untyped bundle, lowercase hex
pub fn hash_value(value: &Value) -> Result<String> {
    Ok(digest(&canonicalize_value(value)?))
}

/// Leading characters of a hash, for compact display
pub fn short_fingerprint(hash: &str) -> &str {
    hash.get(..SHORT_FINGERPRINT_LEN).unwrap_or(hash)
}

fn digest(canonical: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn write_value(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => write_object(map, out),
        Value::Array(items) => {
            let mut rendered: Vec<String> = items
                .iter()
                .map(|item| {
                    let mut s = String::new();
                    write_value(item, &mut s);
                    s
                })
                .collect();
            rendered.sort();
            out.push('[');
            out.push_str(&rendered.join(","));
            out.push(']');
        }
        Value::Number(n) => write_number(n, out),
        // remaining scalars use serde_json's compact encoding
        scalar => out.push_str(&scalar.to_string()),
    }
}

/// Largest magnitude below which every integral `f64` is exact
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

fn write_number(n: &Number, out: &mut String) {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < MAX_EXACT_INTEGER => {
            out.push_str(&(f as i64).to_string())
        }
        _ => out.push_str(&n.to_string()),
    }
}

fn write_object(map: &Map<String, Value>, out: &mut String) {
    let mut keys: Vec<&String> = map.keys().collect();
    keys.sort();

    out.push('{');
    for (i, key) in keys.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&Value::String((*key).clone()).to_string());
        out.push(':');
        write_value(&map[key.as_str()], out);
    }
    out.push('}');
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provenance::model::{AnchorStatus, ChainRef, Signature};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn bundle() -> Value {
        json!({
            "anchorStatus": "pending",
            "cid": "bafy123",
            "chainRef": {
                "status": "submitted",
                "anchoredAt": null,
                "chainId": 8453,
                "txRef": "0xabc"
            },
            "relayIds": ["relay-b", "relay-a", "relay-c"],
            "signatures": [
                { "signer": "bob", "signature": "sig-2" },
                { "signer": "alice", "signature": "sig-1" }
            ],
            "provenanceVersion": "1.0"
        })
    }

    fn reverse_array(value: &mut Value, key: &str) {
        if let Some(Value::Array(items)) = value.get_mut(key) {
            items.reverse();
        }
    }

    #[test]
    fn test_integral_floats_match_integers() {
        let int = json!({"chainRef": {"chainId": 8453}});
        let float = json!({"chainRef": {"chainId": 8453.0}});
        assert_eq!(canonicalize_value(&float).unwrap(), r#"{"chainRef":{"chainId":8453}}"#);
        assert_eq!(hash_value(&int).unwrap(), hash_value(&float).unwrap());

        let fractional = json!({"weight": 0.5, "zero": -0.0});
        assert_eq!(
            canonicalize_value(&fractional).unwrap(),
            r#"{"weight":0.5,"zero":0}"#
        );
        assert_ne!(
            hash_value(&json!({"n": 1.5})).unwrap(),
            hash_value(&json!({"n": 1})).unwrap()
        );
    }

    #[test]
    fn test_canonical_form_golden() {
        assert_eq!(
            canonicalize_value(&bundle()).unwrap(),
            r#"{"chainRef":{"chainId":8453,"txRef":"0xabc"},"cid":"bafy123","provenanceVersion":"1.0","relayIds":["relay-a","relay-b","relay-c"],"signatures":[{"signature":"sig-1","signer":"alice"},{"signature":"sig-2","signer":"bob"}]}"#
        );
    }

    #[test]
    fn test_hash_golden() {
        let hash = hash_value(&bundle()).unwrap();
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_eq!(
            hash,
            "653ed336230c72d4440daf644f9e36ebb03cc7f84dec60e890854cca68db1f39"
        );
    }

    #[test]
    fn test_hash_is_stable_across_calls() {
        assert_eq!(hash_value(&bundle()).unwrap(), hash_value(&bundle()).unwrap());
    }

    #[test]
    fn test_array_order_independence() {
        let base = hash_value(&bundle()).unwrap();

        let mut reversed = bundle();
        reverse_array(&mut reversed, "signatures");
        assert_eq!(hash_value(&reversed).unwrap(), base);

        reverse_array(&mut reversed, "relayIds");
        assert_eq!(hash_value(&reversed).unwrap(), base);
    }

    #[test]
    fn test_key_order_independence() {
        let a: Value = serde_json::from_str(r#"{"cid":"x","provenanceVersion":"1"}"#).unwrap();
        let b: Value = serde_json::from_str(r#"{"provenanceVersion":"1","cid":"x"}"#).unwrap();
        assert_eq!(hash_value(&a).unwrap(), hash_value(&b).unwrap());
    }

    #[test]
    fn test_volatile_fields_excluded() {
        let base = hash_value(&bundle()).unwrap();

        let mut anchored = bundle();
        anchored["anchorStatus"] = json!("anchored");
        anchored["chainRef"]["status"] = json!("confirmed");
        anchored["chainRef"]["anchoredAt"] = json!("2024-06-01T00:00:00Z");
        assert_eq!(hash_value(&anchored).unwrap(), base);

        let mut stripped = bundle();
        if let Some(obj) = stripped.as_object_mut() {
            obj.remove("anchorStatus");
        }
        assert_eq!(hash_value(&stripped).unwrap(), base);
    }

    #[test]
    fn test_stable_fields_participate() {
        let base = hash_value(&bundle()).unwrap();

        let mut changed = bundle();
        changed["chainRef"]["txRef"] = json!("0xdef");
        assert_ne!(hash_value(&changed).unwrap(), base);

        let mut changed = bundle();
        changed["provenanceVersion"] = json!("2.0");
        assert_ne!(hash_value(&changed).unwrap(), base);

        let mut changed = bundle();
        changed["signatures"][0]["signature"] = json!("forged");
        assert_ne!(hash_value(&changed).unwrap(), base);
    }

    #[test]
    fn test_missing_cid_differs_from_empty_cid() {
        let missing = json!({ "provenanceVersion": "1" });
        let empty = json!({ "provenanceVersion": "1", "cid": "" });
        assert_ne!(hash_value(&missing).unwrap(), hash_value(&empty).unwrap());
    }

    #[test]
    fn test_partial_bundle_is_fine() {
        assert_eq!(canonicalize_value(&json!({})).unwrap(), "{}");
        assert_eq!(
            canonicalize_value(&json!({ "anchorStatus": "pending" })).unwrap(),
            "{}"
        );
    }

    #[test]
    fn test_non_object_is_rejected() {
        for value in [json!(null), json!([1, 2]), json!("cid"), json!(3)] {
            assert!(matches!(
                canonicalize_value(&value),
                Err(IxError::InvalidProvenance(_))
            ));
        }
    }

    #[test]
    fn test_nested_arrays_sorted() {
        let a = json!({ "signatures": [{ "signer": "a", "signature": "s", "chain": [3, 1, 2] }] });
        let b = json!({ "signatures": [{ "signer": "a", "signature": "s", "chain": [2, 3, 1] }] });
        assert_eq!(hash_value(&a).unwrap(), hash_value(&b).unwrap());
    }

    #[test]
    fn test_typed_bundle_matches_untyped() {
        let typed = ProvenanceBundle {
            anchor_status: AnchorStatus::Anchored,
            cid: Some("bafy123".to_string()),
            chain_ref: Some(ChainRef {
                status: Some("confirmed".to_string()),
                anchored_at: Some("2024-06-01T00:00:00Z".to_string()),
                extra: [
                    ("chainId".to_string(), json!(8453)),
                    ("txRef".to_string(), json!("0xabc")),
                ]
                .into_iter()
                .collect(),
            }),
            relay_ids: Some(vec![
                "relay-c".to_string(),
                "relay-a".to_string(),
                "relay-b".to_string(),
            ]),
            signatures: Some(vec![
                Signature::new("alice", "sig-1"),
                Signature::new("bob", "sig-2"),
            ]),
            provenance_version: Some("1.0".to_string()),
            ..ProvenanceBundle::default()
        };
        assert_eq!(hash(&typed).unwrap(), hash_value(&bundle()).unwrap());
    }

    #[test]
    fn test_short_fingerprint() {
        assert_eq!(short_fingerprint("0123456789abcdef"), "0123456789ab");
        assert_eq!(short_fingerprint("abc"), "abc");
    }
}
