use serde_json::{Map, Number, Value};

pub const SECURE_HASH_FIELD: &str = "pp_SecureHash";

/// Fields the client always controls; caller input never replaces them.
pub const SYSTEM_FIELDS: &[&str] = &["pp_Version", "pp_MerchantID", "pp_Password"];

/// Field name to value mapping sent to the gateway, one per call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionRecord(Map<String, Value>);

impl TransactionRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Layer `defaults`, then `caller`, then `system`; later layers win.
    ///
    /// `system` carries the merchant credentials, protocol version and any
    /// operation constants, so it is applied last. A caller supplied
    /// `pp_SecureHash` is discarded because the hash is always recomputed.
    pub fn merge<'a, D, S>(defaults: D, caller: &Map<String, Value>, system: S) -> Self
    where
        D: IntoIterator<Item = (&'a str, Value)>,
        S: IntoIterator<Item = (&'a str, Value)>,
    {
        let mut record = Map::new();
        for (name, value) in defaults {
            record.insert(name.to_string(), value);
        }
        for (name, value) in caller {
            if name == SECURE_HASH_FIELD {
                continue;
            }
            record.insert(name.clone(), value.clone());
        }
        for (name, value) in system {
            record.insert(name.to_string(), value);
        }
        Self(record)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// String form of a field as it enters the hash input; absent and falsy values are empty.
    pub fn hash_value(&self, name: &str) -> String {
        self.0.get(name).map(hash_text).unwrap_or_default()
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Map<String, Value>> for TransactionRecord {
    fn from(value: Map<String, Value>) -> Self {
        Self(value)
    }
}

/// Falsy values (null, false, zero, empty string) render as the empty string,
/// matching how the gateway builds its own hash input.
pub fn hash_text(value: &Value) -> String {
    if !is_truthy(value) {
        return String::new();
    }
    match value {
        Value::String(text) => text.clone(),
        Value::Number(number) => number_text(number),
        other => other.to_string(),
    }
}

/// Integral floats drop the fractional part (`100.0` renders as `100`), as the gateway does.
fn number_text(number: &Number) -> String {
    if number.is_f64() {
        if let Some(float) = number.as_f64() {
            return float.to_string();
        }
    }
    number.to_string()
}

pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().map(|n| n != 0.0).unwrap_or(true),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
