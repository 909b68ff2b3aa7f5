//! Deserializers tolerating the service's loose JSON typing.
//!
//! `step` has been seen both as `5` and `"5"`, `progression` both as
//! `"12.345"` and `12.345`, and `valide_contrainte` as a bool or `"1"`.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum Loose {
    Bool(bool),
    Num(serde_json::Number),
    Str(String),
}

pub(crate) fn opt_step<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Loose>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Loose::Num(n)) => n
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("step out of range: {}", n))),
        Some(Loose::Str(s)) => s
            .trim()
            .parse::<u32>()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("invalid step: {:?}", s))),
        Some(Loose::Bool(b)) => Err(D::Error::custom(format!("invalid step: {}", b))),
    }
}

pub(crate) fn opt_decimal<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Loose>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Loose::Num(n)) => Ok(Some(n.to_string())),
        Some(Loose::Str(s)) => Ok(Some(s)),
        Some(Loose::Bool(b)) => Err(D::Error::custom(format!("invalid progression: {}", b))),
    }
}

pub(crate) fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Loose>::deserialize(deserializer)? {
        None => false,
        Some(Loose::Bool(b)) => b,
        Some(Loose::Num(n)) => n.as_f64().is_some_and(|v| v != 0.0),
        Some(Loose::Str(s)) => matches!(s.trim().to_lowercase().as_str(), "1" | "true"),
    })
}
