use common_crypto::{hmac_sha256_hex, SecretKey};

use crate::error::{GatewayError, GatewayResult};
use crate::record::TransactionRecord;

/// Compute `pp_SecureHash` for `record`.
///
/// The HMAC input is the secret followed by each value named in `field_order`,
/// joined with `&`. Fields outside `field_order` do not contribute, and the
/// order is part of the wire contract.
pub fn generate_secure_hash(
    secret: &SecretKey,
    field_order: &[&str],
    record: &TransactionRecord,
) -> GatewayResult<String> {
    if secret.is_empty() {
        return Err(GatewayError::InvalidArgument(
            "hash key must be a non-empty string".into(),
        ));
    }
    if field_order.is_empty() {
        return Err(GatewayError::InvalidArgument(
            "field order must be a non-empty sequence".into(),
        ));
    }
    if record.is_empty() {
        return Err(GatewayError::InvalidArgument(
            "record must be a non-empty mapping".into(),
        ));
    }

    let raw = hash_input(secret, field_order, record);
    Ok(hmac_sha256_hex(secret, &raw)?)
}

fn hash_input(secret: &SecretKey, field_order: &[&str], record: &TransactionRecord) -> String {
    let mut parts = Vec::with_capacity(field_order.len() + 1);
    parts.push(secret.expose().to_string());
    parts.extend(field_order.iter().map(|field| record.hash_value(field)));
    parts.join("&")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::{json, Map, Value};

    fn record(value: Value) -> TransactionRecord {
        match value {
            Value::Object(map) => TransactionRecord::from(map),
            _ => unreachable!("fixture must be an object"),
        }
    }

    #[test]
    fn hash_input_follows_field_order() {
        let key = SecretKey::new("HK1");
        let rec = record(json!({"b": "2", "a": "1", "extra": "ignored"}));
        assert_eq!(hash_input(&key, &["a", "missing", "b"], &rec), "HK1&1&&2");
    }

    #[test]
    fn matches_direct_hmac_over_joined_string() {
        let key = SecretKey::new("HK1");
        let rec = record(json!({"pp_TxnRefNo": "T1", "pp_Amount": 100}));
        let hash = generate_secure_hash(&key, &["pp_TxnRefNo", "pp_Amount"], &rec).expect("hash");
        let expected = hmac_sha256_hex(&key, "HK1&T1&100").expect("mac");
        assert_eq!(hash, expected);
    }

    #[test]
    fn field_order_changes_the_hash() {
        let key = SecretKey::new("HK1");
        let rec = record(json!({"a": "1", "b": "2"}));
        let forward = generate_secure_hash(&key, &["a", "b"], &rec).expect("hash");
        let reverse = generate_secure_hash(&key, &["b", "a"], &rec).expect("hash");
        assert_ne!(forward, reverse);
    }

    #[test]
    fn rejects_empty_inputs() {
        let rec = record(json!({"a": "1"}));
        let empty_key = generate_secure_hash(&SecretKey::default(), &["a"], &rec);
        assert!(matches!(empty_key, Err(GatewayError::InvalidArgument(_))));

        let key = SecretKey::new("HK1");
        let empty_order = generate_secure_hash(&key, &[], &rec);
        assert!(matches!(empty_order, Err(GatewayError::InvalidArgument(_))));

        let empty_record = generate_secure_hash(&key, &["a"], &TransactionRecord::new());
        assert!(matches!(empty_record, Err(GatewayError::InvalidArgument(_))));
    }

    proptest! {
        #[test]
        fn deterministic_for_identical_inputs(
            secret in "[A-Za-z0-9]{1,32}",
            values in proptest::collection::btree_map("pp_[A-Za-z]{1,12}", "[ -~]{0,24}", 1..8),
        ) {
            let key = SecretKey::new(secret);
            let order: Vec<&str> = values.keys().map(String::as_str).collect();
            let map: Map<String, Value> = values
                .iter()
                .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                .collect();
            let rec = TransactionRecord::from(map);
            let first = generate_secure_hash(&key, &order, &rec).unwrap();
            let second = generate_secure_hash(&key, &order, &rec).unwrap();
            prop_assert_eq!(first, second);
        }

        #[test]
        fn omitted_field_equals_empty_field(
            secret in "[A-Za-z0-9]{1,32}",
            amount in "[0-9]{1,6}",
            omitted_as in prop_oneof![
                Just(Value::String(String::new())),
                Just(Value::Null),
                Just(json!(0)),
                Just(Value::Bool(false)),
            ],
        ) {
            let key = SecretKey::new(secret);
            let order = ["pp_Amount", "pp_BillReference", "pp_TxnRefNo"];
            let without = record(json!({"pp_Amount": amount.clone(), "pp_TxnRefNo": "T1"}));
            let with_empty = record(json!({
                "pp_Amount": amount,
                "pp_BillReference": omitted_as,
                "pp_TxnRefNo": "T1",
            }));
            prop_assert_eq!(
                generate_secure_hash(&key, &order, &without).unwrap(),
                generate_secure_hash(&key, &order, &with_empty).unwrap()
            );
        }
    }
}
