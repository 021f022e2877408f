//! Deserializer for fields that may arrive as JSON-encoded strings

use serde::de::{DeserializeOwned, Deserializer, Error};
use serde::Deserialize;

/// Accept either a nested JSON value or a string containing JSON.
///
/// An empty string decodes as the type's default.
pub fn embedded<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::String(text) if text.trim().is_empty() => Ok(T::default()),
        serde_json::Value::String(text) => serde_json::from_str(&text).map_err(D::Error::custom),
        serde_json::Value::Null => Ok(T::default()),
        other => serde_json::from_value(other).map_err(D::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Row {
        #[serde(default, deserialize_with = "super::embedded")]
        types: Vec<String>,
        #[serde(default, deserialize_with = "super::embedded")]
        cost: BTreeMap<String, u32>,
    }

    #[test]
    fn test_nested_value() {
        let row: Row = serde_json::from_str(r#"{"types":["fire"],"cost":{"fire":1}}"#).unwrap();
        assert_eq!(row.types, vec!["fire"]);
        assert_eq!(row.cost["fire"], 1);
    }

    #[test]
    fn test_string_encoded_value() {
        let row: Row =
            serde_json::from_str(r#"{"types":"[\"water\",\"ice\"]","cost":"{\"water\":2}"}"#)
                .unwrap();
        assert_eq!(row.types, vec!["water", "ice"]);
        assert_eq!(row.cost["water"], 2);
    }

    #[test]
    fn test_missing_null_and_empty() {
        let row: Row = serde_json::from_str(r#"{"cost":null,"types":""}"#).unwrap();
        assert!(row.types.is_empty());
        assert!(row.cost.is_empty());
    }

    #[test]
    fn test_bad_embedded_json() {
        assert!(serde_json::from_str::<Row>(r#"{"types":"[oops"}"#).is_err());
    }
}
