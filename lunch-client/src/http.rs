//! HTTP client for the lunch backend
//!
//! [`LunchApi`] is the black-box contract of the backend; [`NetworkHttpClient`]
//! implements it over reqwest. Paths are relative to the page's base path.

use crate::{ClientConfig, ClientError, ClientResult};
use async_trait::async_trait;
use reqwest::header::{CACHE_CONTROL, HeaderValue};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::request::{AvailabilityUpdate, CheckinRequest, LunchReadyUpdate, PrepUpdate, StatusUpdate};
use shared::{
    CheckinStatus, LunchCheckins, LunchPrediction, LunchReady, MenuItem, Order, OrderStatus, Preset,
    RingEvent,
};

/// Backend endpoints used by the chef and employee pages
#[async_trait]
pub trait LunchApi: Send + Sync {
    // ========== Orders ==========
    async fn orders(&self) -> ClientResult<Vec<Order>>;
    async fn order(&self, order_id: i64) -> ClientResult<Order>;
    async fn set_order_status(&self, order_id: i64, status: OrderStatus) -> ClientResult<()>;
    async fn start_prep(&self, order_id: i64, minutes: i64) -> ClientResult<()>;
    async fn cancel_order(&self, order_id: i64) -> ClientResult<()>;
    async fn mate_orders(&self) -> ClientResult<Vec<Order>>;
    async fn my_orders(&self) -> ClientResult<Vec<Order>>;

    // ========== Rings ==========
    async fn rings(&self) -> ClientResult<Vec<RingEvent>>;
    async fn ring(&self) -> ClientResult<()>;

    // ========== Lunch ==========
    async fn lunch_ready(&self) -> ClientResult<LunchReady>;
    async fn set_lunch_ready(&self, ready: bool) -> ClientResult<()>;
    async fn lunch_checkins(&self) -> ClientResult<LunchCheckins>;
    async fn checkin_status(&self) -> ClientResult<CheckinStatus>;
    async fn check_in(&self, took: bool) -> ClientResult<CheckinStatus>;
    async fn lunch_prediction(&self) -> ClientResult<LunchPrediction>;

    // ========== Menu ==========
    async fn menu(&self) -> ClientResult<Vec<MenuItem>>;
    async fn set_availability(&self, name: &str, available: bool) -> ClientResult<()>;
    async fn presets(&self) -> ClientResult<Vec<Preset>>;
}

/// reqwest-backed [`LunchApi`]
#[derive(Debug, Clone)]
pub struct NetworkHttpClient {
    client: Client,
    base_url: String,
}

impl NetworkHttpClient {
    /// Create a new HTTP client from configuration
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL every endpoint is joined onto
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// GET and decode JSON; responses are never served from cache
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let response = self
            .client
            .get(self.url(path))
            .header(CACHE_CONTROL, HeaderValue::from_static("no-store"))
            .send()
            .await?;
        Self::decode(Self::ensure_success(response).await?).await
    }

    /// POST a JSON body and decode the JSON reply
    pub async fn post<T: DeserializeOwned, B: Serialize + Sync>(&self, path: &str, body: &B) -> ClientResult<T> {
        let response = self.client.post(self.url(path)).json(body).send().await?;
        Self::decode(Self::ensure_success(response).await?).await
    }

    /// POST a JSON body, ignoring whatever the server replies with
    pub async fn post_ack<B: Serialize + Sync>(&self, path: &str, body: &B) -> ClientResult<()> {
        let response = self.client.post(self.url(path)).json(body).send().await?;
        Self::ensure_success(response).await?;
        Ok(())
    }

    /// POST without body
    pub async fn post_empty(&self, path: &str) -> ClientResult<()> {
        let response = self.client.post(self.url(path)).send().await?;
        Self::ensure_success(response).await?;
        Ok(())
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let text = response.text().await?;
        if text.trim().is_empty() {
            return Err(ClientError::InvalidResponse("empty body".into()));
        }
        Ok(serde_json::from_str(&text)?)
    }

    async fn ensure_success(response: reqwest::Response) -> ClientResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let text = response.text().await.unwrap_or_default();
        Err(match status {
            StatusCode::NOT_FOUND => ClientError::NotFound(text),
            _ => ClientError::Rejected {
                status: status.as_u16(),
                body: text,
            },
        })
    }
}

#[async_trait]
impl LunchApi for NetworkHttpClient {
    async fn orders(&self) -> ClientResult<Vec<Order>> {
        self.get("orders").await
    }

    async fn order(&self, order_id: i64) -> ClientResult<Order> {
        self.get(&format!("orders/{order_id}")).await
    }

    async fn set_order_status(&self, order_id: i64, status: OrderStatus) -> ClientResult<()> {
        self.post_ack(&format!("orders/{order_id}/status"), &StatusUpdate { status })
            .await
    }

    async fn start_prep(&self, order_id: i64, minutes: i64) -> ClientResult<()> {
        self.post_ack(&format!("orders/{order_id}/prep"), &PrepUpdate { minutes })
            .await
    }

    async fn cancel_order(&self, order_id: i64) -> ClientResult<()> {
        self.post_empty(&format!("orders/{order_id}/cancel")).await
    }

    async fn mate_orders(&self) -> ClientResult<Vec<Order>> {
        self.get("mate-orders").await
    }

    async fn my_orders(&self) -> ClientResult<Vec<Order>> {
        self.get("my-orders").await
    }

    async fn rings(&self) -> ClientResult<Vec<RingEvent>> {
        self.get("rings").await
    }

    async fn ring(&self) -> ClientResult<()> {
        self.post_empty("ring").await
    }

    async fn lunch_ready(&self) -> ClientResult<LunchReady> {
        self.get("lunch-ready").await
    }

    async fn set_lunch_ready(&self, ready: bool) -> ClientResult<()> {
        self.post_ack("lunch-ready", &LunchReadyUpdate { ready }).await
    }

    async fn lunch_checkins(&self) -> ClientResult<LunchCheckins> {
        self.get("lunch-checkins").await
    }

    async fn checkin_status(&self) -> ClientResult<CheckinStatus> {
        self.get("lunch-checkin").await
    }

    async fn check_in(&self, took: bool) -> ClientResult<CheckinStatus> {
        self.post("lunch-checkin", &CheckinRequest { took }).await
    }

    async fn lunch_prediction(&self) -> ClientResult<LunchPrediction> {
        self.get("lunch-prediction").await
    }

    async fn menu(&self) -> ClientResult<Vec<MenuItem>> {
        self.get("menu").await
    }

    async fn set_availability(&self, name: &str, available: bool) -> ClientResult<()> {
        let body = AvailabilityUpdate {
            name: name.to_string(),
            available,
        };
        self.post_ack("menu/availability", &body).await
    }

    async fn presets(&self) -> ClientResult<Vec<Preset>> {
        self.get("presets").await
    }
}
