//! Serde helpers for backend records that send `null` where a value is
//! expected.

use serde::{Deserialize, Deserializer};

/// Read `null` (or a missing field, with `#[serde(default)]`) as the type's
/// default.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Record {
        #[serde(default, deserialize_with = "null_as_default")]
        text: String,
        #[serde(default, deserialize_with = "null_as_default")]
        days: u32,
    }

    #[test]
    fn test_null_and_missing_become_default() {
        let record: Record = serde_json::from_value(json!({ "text": null })).unwrap();
        assert_eq!(record.text, "");
        assert_eq!(record.days, 0);

        let record: Record = serde_json::from_value(json!({ "text": "hi", "days": 3 })).unwrap();
        assert_eq!(record.text, "hi");
        assert_eq!(record.days, 3);
    }

    #[test]
    fn test_wrong_type_still_fails() {
        assert!(serde_json::from_value::<Record>(json!({ "days": "soon" })).is_err());
    }
}
