//! Menu Model

use crate::util::{opt_string, string_or_empty, truthy};
use serde::{Deserialize, Serialize};

/// Category used when an item carries none
pub const DEFAULT_CATEGORY: &str = "Menu";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    #[serde(default, deserialize_with = "string_or_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "opt_string")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "truthy")]
    pub available: bool,
    #[serde(default, deserialize_with = "opt_string")]
    pub image: Option<String>,
}

impl MenuItem {
    pub fn category(&self) -> &str {
        match self.category.as_deref() {
            Some(category) if !category.is_empty() => category,
            _ => DEFAULT_CATEGORY,
        }
    }
}
