//! lunch-watch - headless chef / employee page
//!
//! Polls every feed of the configured role and renders banners, chimes and
//! notifications through the log.

use lunch_client::console::{LogBanner, LogNotifier, TerminalChime};
use lunch_client::{
    ClientConfig, ClientError, Dispatcher, Feed, FileStore, KeyValueStore, NetworkHttpClient, PollScheduler, Role, chef,
    employee, logger,
};
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Environment (dotenv, logging)
    let _ = dotenvy::dotenv();
    logger::init_logger();

    // 2. Configuration
    let config = ClientConfig::from_env();
    tracing::info!(base_url = %config.base_url, role = ?config.role, "🍱 lunch-watch starting...");

    // 3. Capabilities (store, http, notifications)
    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(config.store_path.clone()));
    let api = Arc::new(config.build_http_client()?);
    let dispatcher = Arc::new(Dispatcher::new(
        store.clone(),
        Arc::new(TerminalChime::default()),
        Arc::new(LogNotifier {
            granted: config.native_notifications,
        }),
        Arc::new(LogBanner),
    ));

    // 4. Register feeds
    let mut scheduler = PollScheduler::new();
    match config.role {
        Role::Chef => register_chef(&mut scheduler, &config, api, store, dispatcher),
        Role::Employee => register_employee(&mut scheduler, &config, api, store, dispatcher),
    }
    scheduler.log_summary();

    // 5. Run until Ctrl+C
    let mut health = tokio::time::interval(Duration::from_secs(60));
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = health.tick() => {
                scheduler.check_health();
            }
        }
    }

    tracing::info!("Shutdown signal received");
    scheduler.shutdown().await;
    Ok(())
}

fn register_chef(
    scheduler: &mut PollScheduler,
    config: &ClientConfig,
    api: Arc<NetworkHttpClient>,
    store: Arc<dyn KeyValueStore>,
    dispatcher: Arc<Dispatcher>,
) {
    let intervals = config.intervals;
    let state = Arc::new(chef::ChefState::new(store, dispatcher));

    let (a, s) = (api.clone(), state.clone());
    scheduler.every(Feed::Orders, intervals.orders, move || {
        let (api, state) = (a.clone(), s.clone());
        async move {
            let board = chef::poll_orders(&*api, &state).await?;
            tracing::debug!(cards = board.cards.len(), groups = board.groups.len(), "Chef board refreshed");
            for group in &board.groups {
                tracing::debug!("  {} x{}", group.name, group.total_qty);
            }
            Ok::<(), ClientError>(())
        }
    });

    let (a, s) = (api.clone(), state.clone());
    scheduler.every(Feed::Rings, intervals.rings, move || {
        let (api, state) = (a.clone(), s.clone());
        async move { chef::poll_rings(&*api, &state).await.map(|_| ()) }
    });

    let (a, s) = (api.clone(), state.clone());
    scheduler.every(Feed::LunchReady, intervals.chef_lunch_ready, move || {
        let (api, state) = (a.clone(), s.clone());
        async move { chef::poll_lunch_ready(&*api, &state).await.map(|_| ()) }
    });

    let (a, s) = (api.clone(), state.clone());
    scheduler.every(Feed::LunchCheckins, intervals.lunch_checkins, move || {
        let (api, state) = (a.clone(), s.clone());
        async move {
            let board = chef::poll_checkins(&*api, &state).await?;
            if let Some(headline) = board.headline() {
                match &board {
                    chef::CheckinBoard::Summary { names, .. } => tracing::info!("{headline}: {}", names.join(", ")),
                    _ => tracing::debug!("{headline}"),
                }
            }
            Ok::<(), ClientError>(())
        }
    });

    let (a, s) = (api.clone(), state);
    scheduler.every(Feed::LunchPrediction, intervals.lunch_prediction, move || {
        let (api, state) = (a.clone(), s.clone());
        async move { chef::poll_prediction(&*api, &state).await.map(|_| ()) }
    });

    scheduler.every(Feed::Menu, intervals.chef_menu, move || {
        let api = api.clone();
        async move {
            let sections = chef::poll_menu(&*api).await?;
            tracing::debug!(sections = sections.len(), "Menu refreshed");
            Ok::<(), ClientError>(())
        }
    });
}

fn register_employee(
    scheduler: &mut PollScheduler,
    config: &ClientConfig,
    api: Arc<NetworkHttpClient>,
    store: Arc<dyn KeyValueStore>,
    dispatcher: Arc<Dispatcher>,
) {
    let intervals = config.intervals;
    let state = Arc::new(employee::EmployeeState::new(store, dispatcher));

    match config.order_id {
        Some(order_id) => {
            let (a, s) = (api.clone(), state.clone());
            scheduler.every(Feed::OrderStatus, intervals.order_status, move || {
                let (api, state) = (a.clone(), s.clone());
                async move {
                    let view = employee::poll_order_status(&*api, &state, order_id).await?;
                    tracing::debug!(
                        order_id,
                        status = %view.status,
                        percent = ?view.percent(),
                        "{}",
                        view.message
                    );
                    Ok::<(), ClientError>(())
                }
            });
        }
        None => tracing::warn!("LUNCH_ORDER_ID not set, order status view disabled"),
    }

    let (a, s) = (api.clone(), state.clone());
    scheduler.every(Feed::LunchReady, intervals.employee_lunch_ready, move || {
        let (api, state) = (a.clone(), s.clone());
        async move { employee::poll_lunch_ready(&*api, &state).await.map(|_| ()) }
    });

    let (a, s) = (api.clone(), state);
    scheduler.every(Feed::MateOrders, intervals.mate_orders, move || {
        let (api, state) = (a.clone(), s.clone());
        async move { employee::poll_mate_orders(&*api, &state).await.map(|_| ()) }
    });

    let a = api.clone();
    scheduler.every(Feed::MyOrders, intervals.my_orders, move || {
        let api = a.clone();
        async move {
            let orders = employee::poll_my_orders(&*api).await?;
            tracing::debug!(orders = orders.len(), "My orders refreshed");
            Ok::<(), ClientError>(())
        }
    });

    let a = api.clone();
    scheduler.every(Feed::Menu, intervals.employee_menu, move || {
        let api = a.clone();
        async move { employee::poll_menu(&*api).await.map(|_| ()) }
    });

    scheduler.once(Feed::Presets, async move {
        let presets = employee::load_presets(&*api).await?;
        tracing::info!(presets = presets.len(), "Presets loaded");
        Ok::<(), ClientError>(())
    });
}
