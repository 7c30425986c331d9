//! Client configuration
//!
//! # Environment variables
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | LUNCH_API_BASE | http://localhost:5000/api/chef/chef-access | API base path of the page |
//! | LUNCH_ROLE | chef | `chef` or `employee` |
//! | LUNCH_ORDER_ID | - | order tracked by the employee status view |
//! | LUNCH_STORE_PATH | ./lunch-store.json | durable key-value file |
//! | REQUEST_TIMEOUT_SECS | 10 | HTTP timeout |
//! | NATIVE_NOTIFICATIONS | false | whether native notifications are permitted |

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Which page the client stands in for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Role {
    /// Kitchen dashboard
    #[default]
    Chef,
    /// Employee order / status pages
    Employee,
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chef" => Ok(Role::Chef),
            "employee" => Ok(Role::Employee),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// Poll period per feed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollIntervals {
    pub orders: Duration,
    pub rings: Duration,
    pub chef_lunch_ready: Duration,
    pub employee_lunch_ready: Duration,
    pub order_status: Duration,
    pub mate_orders: Duration,
    pub my_orders: Duration,
    pub chef_menu: Duration,
    pub employee_menu: Duration,
    pub lunch_checkins: Duration,
    pub lunch_prediction: Duration,
}

impl Default for PollIntervals {
    fn default() -> Self {
        Self {
            orders: Duration::from_secs(5),
            rings: Duration::from_secs(5),
            chef_lunch_ready: Duration::from_secs(8),
            employee_lunch_ready: Duration::from_secs(10),
            order_status: Duration::from_secs(5),
            mate_orders: Duration::from_secs(10),
            my_orders: Duration::from_secs(10),
            chef_menu: Duration::from_secs(5),
            employee_menu: Duration::from_secs(15),
            lunch_checkins: Duration::from_secs(20),
            lunch_prediction: Duration::from_secs(3600),
        }
    }
}

/// Client configuration for one page's worth of feeds
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base path (e.g., "http://localhost:5000/api/chef/chef-access")
    pub base_url: String,

    /// Chef or employee
    pub role: Role,

    /// Order followed by the employee status view
    pub order_id: Option<i64>,

    /// Durable key-value file
    pub store_path: PathBuf,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Whether the user granted native notifications
    pub native_notifications: bool,

    /// Poll periods
    pub intervals: PollIntervals,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            role: Role::Chef,
            order_id: None,
            store_path: PathBuf::from("./lunch-store.json"),
            timeout: 10,
            native_notifications: false,
            intervals: PollIntervals::default(),
        }
    }

    /// Load from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let mut config = Self::new(
            std::env::var("LUNCH_API_BASE")
                .unwrap_or_else(|_| "http://localhost:5000/api/chef/chef-access".into()),
        );
        config.role = std::env::var("LUNCH_ROLE")
            .ok()
            .and_then(|r| r.parse().ok())
            .unwrap_or_default();
        config.order_id = std::env::var("LUNCH_ORDER_ID")
            .ok()
            .and_then(|id| id.trim().parse().ok());
        if let Ok(path) = std::env::var("LUNCH_STORE_PATH") {
            config.store_path = PathBuf::from(path);
        }
        config.timeout = std::env::var("REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|t| t.parse().ok())
            .unwrap_or(10);
        config.native_notifications = std::env::var("NATIVE_NOTIFICATIONS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(false);
        config
    }

    /// Set the role
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    /// Follow a specific order
    pub fn with_order_id(mut self, order_id: i64) -> Self {
        self.order_id = Some(order_id);
        self
    }

    /// Set the store path
    pub fn with_store_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.store_path = path.into();
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Set the poll periods
    pub fn with_intervals(mut self, intervals: PollIntervals) -> Self {
        self.intervals = intervals;
        self
    }

    pub fn with_native_notifications(mut self, granted: bool) -> Self {
        self.native_notifications = granted;
        self
    }

    /// Create an HTTP client from this configuration
    pub fn build_http_client(&self) -> crate::ClientResult<crate::NetworkHttpClient> {
        crate::NetworkHttpClient::new(self)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://localhost:5000/api/chef/chef-access")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse() {
        assert_eq!("Chef".parse::<Role>(), Ok(Role::Chef));
        assert_eq!(" employee ".parse::<Role>(), Ok(Role::Employee));
        assert!("waiter".parse::<Role>().is_err());
    }

    #[test]
    fn test_default_intervals() {
        let intervals = PollIntervals::default();
        assert_eq!(intervals.orders, Duration::from_secs(5));
        assert_eq!(intervals.lunch_checkins, Duration::from_secs(20));
        assert_eq!(intervals.lunch_prediction, Duration::from_secs(3600));
    }

    #[test]
    fn test_builder_overrides() {
        let config = ClientConfig::new("http://kitchen.local/api/employee/x")
            .with_role(Role::Employee)
            .with_order_id(42)
            .with_timeout(3)
            .with_native_notifications(true);
        assert_eq!(config.role, Role::Employee);
        assert_eq!(config.order_id, Some(42));
        assert_eq!(config.timeout, 3);
        assert!(config.native_notifications);
    }
}
