//! Order presets offered to employees

use crate::util::{opt_number, string_or_empty};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preset {
    #[serde(default, deserialize_with = "opt_number")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub order_text: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub requirements: String,
}
