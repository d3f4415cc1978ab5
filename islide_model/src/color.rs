//! Colors are authored as CSS style hex strings (`#rrggbb` or `#rrggbbaa`).

use ecolor::Color32;
use serde::{de::Error, Deserialize, Deserializer, Serializer};

pub fn serialize<S: Serializer>(color: &Color32, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&color.to_hex())
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Color32, D::Error> {
    let hex = smartstring::alias::String::deserialize(deserializer)?;
    Color32::from_hex(&hex).map_err(|e| D::Error::custom(format!("invalid color `{hex}`: {e:?}")))
}
