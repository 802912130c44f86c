//! Serde helpers for ids sent by the dashboard
//!
//! Select inputs hand ids over as strings ("12"), typed code sends numbers.
//! Both forms are accepted.

use serde::{Deserialize, Deserializer, de};

#[derive(Deserialize)]
#[serde(untagged)]
enum FlexibleId {
    Int(i64),
    Str(String),
}

impl FlexibleId {
    fn into_id<E: de::Error>(self) -> Result<i64, E> {
        match self {
            Self::Int(id) => Ok(id),
            Self::Str(s) => s
                .trim()
                .parse()
                .map_err(|_| E::custom(format!("invalid id: {}", s))),
        }
    }
}

/// Optional id, number or numeric string; null treated as absent
pub fn option_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<FlexibleId>::deserialize(deserializer)?
        .map(FlexibleId::into_id)
        .transpose()
}

/// List of ids, each a number or numeric string; null treated as empty
pub fn ids<'de, D>(deserializer: D) -> Result<Vec<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Vec<FlexibleId>>::deserialize(deserializer)?
        .unwrap_or_default()
        .into_iter()
        .map(FlexibleId::into_id)
        .collect()
}

/// Distinguishes an absent field (`None`) from an explicit null (`Some(None)`).
/// Pair with `#[serde(default)]`.
pub fn clearable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Payload {
        #[serde(default, deserialize_with = "clearable")]
        age: Option<Option<i64>>,
        #[serde(default, deserialize_with = "option_id")]
        id: Option<i64>,
        #[serde(default, deserialize_with = "ids")]
        ids: Vec<i64>,
    }

    #[test]
    fn test_option_id() {
        let p: Payload = serde_json::from_str(r#"{"id":" 5 "}"#).unwrap();
        assert_eq!(p.id, Some(5));
        let p: Payload = serde_json::from_str(r#"{"id":null}"#).unwrap();
        assert_eq!(p.id, None);
        let p: Payload = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(p.id, None);
        assert!(serde_json::from_str::<Payload>(r#"{"id":"abc"}"#).is_err());
    }

    #[test]
    fn test_ids() {
        let p: Payload = serde_json::from_str(r#"{"ids":[3,"4"]}"#).unwrap();
        assert_eq!(p.ids, vec![3, 4]);
        let p: Payload = serde_json::from_str(r#"{"ids":null}"#).unwrap();
        assert!(p.ids.is_empty());
    }

    #[test]
    fn test_clearable_separates_null_from_absent() {
        let p: Payload = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(p.age, None);
        let p: Payload = serde_json::from_str(r#"{"age":null}"#).unwrap();
        assert_eq!(p.age, Some(None));
        let p: Payload = serde_json::from_str(r#"{"age":41}"#).unwrap();
        assert_eq!(p.age, Some(Some(41)));
    }
}
