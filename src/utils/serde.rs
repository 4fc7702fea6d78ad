use serde::{Deserialize, Deserializer};
use uuid::Uuid;

/// Deserialize an optional UUID from query parameters, treating an empty
/// string the same as an absent value.
pub fn deserialize_optional_uuid<'de, D>(deserializer: D) -> Result<Option<Uuid>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.is_empty() => Ok(None),
        Some(s) => Uuid::parse_str(&s).map(Some).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Deserialize an optional bool from query parameters. Query values
/// arrive as strings when the struct carries flattened fields, so
/// "true"/"false" and "1"/"0" are parsed by hand; an empty string is
/// treated as absent.
pub fn deserialize_optional_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s.as_deref() {
        None | Some("") => Ok(None),
        Some("true") | Some("1") => Ok(Some(true)),
        Some("false") | Some("0") => Ok(Some(false)),
        Some(other) => Err(serde::de::Error::custom(format!(
            "invalid boolean value: {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Params {
        #[serde(default, deserialize_with = "deserialize_optional_uuid")]
        id: Option<Uuid>,
        #[serde(default, deserialize_with = "deserialize_optional_bool")]
        active: Option<bool>,
    }

    #[test]
    fn test_empty_string_is_none() {
        let params: Params = serde_json::from_str(r#"{"id":""}"#).unwrap();
        assert!(params.id.is_none());
    }

    #[test]
    fn test_valid_uuid_parses() {
        let id = Uuid::new_v4();
        let params: Params = serde_json::from_str(&format!(r#"{{"id":"{}"}}"#, id)).unwrap();
        assert_eq!(params.id, Some(id));
    }

    #[test]
    fn test_garbage_is_error() {
        let result: Result<Params, _> = serde_json::from_str(r#"{"id":"not-a-uuid"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_bool_from_query_strings() {
        let params: Params = serde_json::from_str(r#"{"active":"true"}"#).unwrap();
        assert_eq!(params.active, Some(true));
        let params: Params = serde_json::from_str(r#"{"active":"0"}"#).unwrap();
        assert_eq!(params.active, Some(false));
        let params: Params = serde_json::from_str(r#"{"active":""}"#).unwrap();
        assert!(params.active.is_none());
        let result: Result<Params, _> = serde_json::from_str(r#"{"active":"maybe"}"#);
        assert!(result.is_err());
    }
}
