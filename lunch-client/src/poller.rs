//! Feed polling
//!
//! Every feed runs on its own task with a fixed period. A tick that fails
//! (transport error, non-success status, bad payload) is skipped silently and
//! the feed simply tries again next period. Ticks of one feed never overlap:
//! a slow tick delays only its own feed, and missed periods are dropped rather
//! than replayed in a burst.

use crate::ClientResult;
use futures::FutureExt;
use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// Data feed polled from the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feed {
    Orders,
    OrderStatus,
    Rings,
    LunchReady,
    LunchCheckins,
    LunchPrediction,
    MateOrders,
    MyOrders,
    Menu,
    Presets,
}

impl Feed {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Feed::Orders => "orders",
            Feed::OrderStatus => "order-status",
            Feed::Rings => "rings",
            Feed::LunchReady => "lunch-ready",
            Feed::LunchCheckins => "lunch-checkins",
            Feed::LunchPrediction => "lunch-prediction",
            Feed::MateOrders => "mate-orders",
            Feed::MyOrders => "my-orders",
            Feed::Menu => "menu",
            Feed::Presets => "presets",
        }
    }
}

impl fmt::Display for Feed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered feed task
struct RegisteredFeed {
    feed: Feed,
    /// `None` for one-shot loads
    period: Option<Duration>,
    handle: JoinHandle<()>,
}

/// Scheduler owning every feed task of a page
///
/// # Example
///
/// ```ignore
/// let mut scheduler = PollScheduler::new();
/// scheduler.every(Feed::Orders, Duration::from_secs(5), move || {
///     let api = api.clone();
///     let state = state.clone();
///     async move { chef::poll_orders(&*api, &state).await.map(|_| ()) }
/// });
/// scheduler.shutdown().await;
/// ```
pub struct PollScheduler {
    feeds: Vec<RegisteredFeed>,
    shutdown: CancellationToken,
}

impl PollScheduler {
    pub fn new() -> Self {
        Self {
            feeds: Vec::new(),
            shutdown: CancellationToken::new(),
        }
    }

    /// Token cancelled by [`PollScheduler::shutdown`]
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Run `tick` now and then every `period` until shutdown.
    ///
    /// Each tick is isolated: an error or a panic is logged and the feed
    /// carries on with its next period.
    pub fn every<F, Fut>(&mut self, feed: Feed, period: Duration, mut tick: F)
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ClientResult<()>> + Send + 'static,
    {
        let shutdown = self.shutdown.clone();
        let poll_loop = async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => break,
                    _ = ticker.tick() => run_guarded(feed, async { tick().await }).await,
                }
            }
        };
        self.register(feed, Some(period), poll_loop);
    }

    /// Run `load` once, e.g. presets at page start.
    pub fn once<Fut>(&mut self, feed: Feed, load: Fut)
    where
        Fut: Future<Output = ClientResult<()>> + Send + 'static,
    {
        let shutdown = self.shutdown.clone();
        let one_shot = async move {
            tokio::select! {
                _ = shutdown.cancelled() => {}
                _ = run_guarded(feed, load) => {}
            }
        };
        self.register(feed, None, one_shot);
    }

    fn register<F>(&mut self, feed: Feed, period: Option<Duration>, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(future);
        tracing::debug!(feed = %feed, period_ms = period.map(|p| p.as_millis() as u64), "Registered feed");
        self.feeds.push(RegisteredFeed { feed, period, handle });
    }

    pub fn len(&self) -> usize {
        self.feeds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.feeds.is_empty()
    }

    pub fn log_summary(&self) {
        let periodic = self.feeds.iter().filter(|f| f.period.is_some()).count();
        tracing::info!(
            "Feeds registered: {} total ({} periodic, {} one-shot)",
            self.feeds.len(),
            periodic,
            self.feeds.len() - periodic
        );
    }

    /// Periodic feeds whose task is no longer running; each one is logged.
    pub fn check_health(&self) -> usize {
        let mut failed = 0;
        for registered in &self.feeds {
            if registered.period.is_some() && registered.handle.is_finished() {
                tracing::error!(feed = %registered.feed, "Feed task stopped unexpectedly");
                failed += 1;
            }
        }
        failed
    }

    /// Cancel every feed and wait for the tasks to finish.
    pub async fn shutdown(self) {
        tracing::info!("Stopping {} feeds...", self.feeds.len());
        self.shutdown.cancel();

        for registered in self.feeds {
            match registered.handle.await {
                Ok(()) => tracing::debug!(feed = %registered.feed, "Feed stopped"),
                Err(e) if e.is_cancelled() => tracing::debug!(feed = %registered.feed, "Feed cancelled"),
                Err(e) => tracing::error!(feed = %registered.feed, error = ?e, "Feed task failed"),
            }
        }

        tracing::info!("All feeds stopped");
    }
}

impl Default for PollScheduler {
    fn default() -> Self {
        Self::new()
    }
}

/// Drive one tick to completion, logging a failure or a panic.
async fn run_guarded<Fut>(feed: Feed, tick: Fut)
where
    Fut: Future<Output = ClientResult<()>>,
{
    match AssertUnwindSafe(tick).catch_unwind().await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::debug!(feed = %feed, error = %e, "Poll tick skipped"),
        Err(panic_info) => {
            let panic_msg: String = if let Some(s) = panic_info.downcast_ref::<&str>() {
                (*s).to_string()
            } else if let Some(s) = panic_info.downcast_ref::<String>() {
                s.clone()
            } else {
                "Unknown panic".to_string()
            };
            tracing::error!(feed = %feed, panic = %panic_msg, "Poll tick panicked");
        }
    }
}
