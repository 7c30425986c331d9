//! Lunch readiness, check-ins and headcount prediction

use crate::util::{self, opt_numeric, opt_string, string_or_empty, truthy};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// `GET /lunch-ready`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LunchReady {
    #[serde(default, deserialize_with = "truthy")]
    pub is_ready: bool,
    #[serde(default, deserialize_with = "opt_string")]
    pub updated_at: Option<String>,
}

impl LunchReady {
    pub fn updated(&self) -> Option<DateTime<Utc>> {
        self.updated_at.as_deref().and_then(util::parse_timestamp)
    }
}

/// `GET /lunch-checkins`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LunchCheckins {
    #[serde(default, deserialize_with = "util::lenient_vec")]
    pub names: Vec<String>,
    #[serde(default, deserialize_with = "opt_numeric")]
    pub count: Option<i64>,
}

impl LunchCheckins {
    /// Reported count, or the number of names when the count is missing or zero
    pub fn total(&self) -> i64 {
        match self.count {
            Some(count) if count != 0 => count,
            _ => self.names.len() as i64,
        }
    }
}

/// `GET|POST /lunch-checkin`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckinStatus {
    #[serde(default, deserialize_with = "truthy")]
    pub checked: bool,
}

/// `GET /lunch-prediction`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LunchPrediction {
    #[serde(default, deserialize_with = "opt_numeric")]
    pub predicted: Option<i64>,
    #[serde(default, deserialize_with = "opt_numeric")]
    pub hour: Option<i64>,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub date: String,
}
