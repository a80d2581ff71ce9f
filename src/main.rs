mod api;
mod config;
mod models;
mod services;
mod sources;

use std::path::Path;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api::{create_rest_router, AppState};
use config::Config;
use models::asset::format_price;
use services::{
    AlertEvaluator, DashboardStore, FileReportSink, PreferenceStore, SyncOrchestrator, SyncOutcome,
};
use sources::ApiClient;

/// Console summary of the current dashboard state
fn print_summary(store: &DashboardStore, outcome: &SyncOutcome) {
    store.read(|s| {
        println!("\n⏱️  {} - {:?}", chrono::Local::now().format("%H:%M:%S"), outcome);
        println!("   {:8} {:14} {:>16} {:>8}", "Symbol", "Name", "Price", "Change");
        println!("   ──────── ────────────── ──────────────── ────────");
        for asset in &s.assets {
            let arrow = if asset.change >= 0.0 { "↗️" } else { "↘️" };
            println!("   {:8} {:14} {:>16} {:>+7.2}% {}",
                asset.symbol, asset.name, format_price(asset.price), asset.change, arrow);
        }

        println!("\n   Portfolio: {} ({:+.2} / {:+.2}%)",
            format_price(s.portfolio.total_value),
            s.portfolio.weekly_change,
            s.portfolio.weekly_change_percent
        );

        for signal in &s.signals {
            println!("   {:8} {:4} {:>4.0}% RSI {:>5.1}  {}",
                signal.coin, signal.signal.as_str(), signal.confidence * 100.0, signal.rsi, signal.reason);
        }

        if let Some(best) = s.pools.first() {
            println!("\n   Best AYAO pool: {} (APY {:.1}%, 30d {})",
                best.pool.name, best.pool.apy, best.estimated_30d);
        }

        let offline = s.status.offline();
        if !offline.is_empty() {
            println!("   Offline: {:?}", offline);
        }
    });
}

#[tokio::main(worker_threads = 4)]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();

    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,royal_sync=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load()?;
    tracing::info!("✓ Configuration loaded (backend {})", config.api.base_url);

    let store = Arc::new(DashboardStore::new(
        config.sync.notification_ttl_secs,
        config.sync.log_capacity,
    ));
    store.register(Arc::new(AlertEvaluator::new(config.sync.notification_ttl_secs)));

    let source = Arc::new(ApiClient::new(&config.api.base_url, config.api.timeout_secs));
    let reports = Arc::new(FileReportSink::new(&config.storage.report_dir));
    let orchestrator = Arc::new(SyncOrchestrator::new(
        source,
        store.clone(),
        reports,
        config.sync.capital,
    ));

    // Check for --once flag (single sync, print, exit)
    if args.contains(&"--once".to_string()) {
        println!("\n👑 Royal Sync - single pass\n");
        let outcome = orchestrator.sync_primary().await;
        // a fallback already pulled pools again
        if !outcome.is_fallback() {
            orchestrator.refresh_pools().await;
        }
        print_summary(&store, &outcome);
        return Ok(());
    }

    // Check for --report flag
    if args.contains(&"--report".to_string()) {
        let path = orchestrator.generate_report().await?;
        println!("✓ Report saved to {}", path.display());
        return Ok(());
    }

    println!("\n🚀 Royal Sync Starting...\n");

    let prefs = Arc::new(PreferenceStore::load(Path::new(&config.storage.prefs_path)));
    tracing::info!("✓ Preferences loaded (dark mode: {})", prefs.dark_mode());

    // Background: one Royal Sync up front, then primary sync on a fixed period
    println!("📥 Starting data sync ({}s cycle)...", config.sync.interval_secs);
    let background = orchestrator.clone();
    let interval_secs = config.sync.interval_secs;
    tokio::spawn(async move {
        background.royal_sync().await;
        background.run_periodic(interval_secs).await;
    });

    let state = Arc::new(AppState {
        orchestrator,
        store,
        prefs,
    });

    let app = create_rest_router(state).layer(CorsLayer::permissive());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    println!("\n✓ Server ready on http://{}\n", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
