use chrono::Utc;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::time::{interval_at, Duration, Instant, MissedTickBehavior};
use crate::models::{
    ActivityEntry, ActivityStatus, LedgerEntry, NotificationLevel, Portfolio, Signal, SystemStatus,
};
use crate::sources::{AssetQuote, DashboardSource, SourceError};
use super::report::{report_file_name, ReportError, ReportSink};
use super::store::{DashboardStore, SyncPhase};
use super::{fallback, stats};

/// Result of one sync of one domain
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "lowercase")]
pub enum SyncOutcome {
    /// Server data applied
    Fresh,
    /// Baseline applied; carries the failure reason
    Fallback(String),
    /// Another primary cycle was already in flight
    Skipped,
    /// A newer fetch of the same domain started meanwhile; results discarded
    Stale,
}

impl SyncOutcome {
    pub fn is_fallback(&self) -> bool {
        matches!(self, SyncOutcome::Fallback(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoyalSyncReport {
    pub primary: SyncOutcome,
    pub pools: SyncOutcome,
    pub risk_alerts: SyncOutcome,
}

/// Monotonic cycle counter; only the latest ticket may write
#[derive(Default)]
struct Generation(AtomicU64);

impl Generation {
    fn begin(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, ticket: u64) -> bool {
        self.0.load(Ordering::SeqCst) == ticket
    }
}

/// Clears the busy flag when the cycle ends, however it ends
struct BusyGuard<'a>(&'a AtomicBool);

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| BusyGuard(flag))
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

type PrimaryData = (Vec<AssetQuote>, Vec<Signal>, Option<Vec<LedgerEntry>>);

pub struct SyncOrchestrator {
    source: Arc<dyn DashboardSource>,
    store: Arc<DashboardStore>,
    reports: Arc<dyn ReportSink>,
    capital: f64,
    /// Serializes primary cycles, so they need no generation ticket
    busy: AtomicBool,
    pools_gen: Generation,
    risk_gen: Generation,
}

impl SyncOrchestrator {
    pub fn new(
        source: Arc<dyn DashboardSource>,
        store: Arc<DashboardStore>,
        reports: Arc<dyn ReportSink>,
        capital: f64,
    ) -> Self {
        Self {
            source,
            store,
            reports,
            capital,
            busy: AtomicBool::new(false),
            pools_gen: Generation::default(),
            risk_gen: Generation::default(),
        }
    }

    /// Prices, signals and ledger together. Any single failure replaces
    /// them with the baseline dataset, then pools and risk alerts are
    /// pulled again, each falling back on its own.
    pub async fn sync_primary(&self) -> SyncOutcome {
        let outcome = self.run_primary().await;
        if outcome.is_fallback() {
            tokio::join!(self.refresh_pools(), self.refresh_risk_alerts());
        }
        outcome
    }

    async fn run_primary(&self) -> SyncOutcome {
        let Some(_busy) = BusyGuard::acquire(&self.busy) else {
            tracing::debug!("Sync already in flight, trigger ignored");
            return SyncOutcome::Skipped;
        };

        self.store.update(|s| s.phase = SyncPhase::Syncing);
        tracing::debug!("Primary sync via {}", self.source.name());

        let (prices, signals, ledger) = tokio::join!(
            self.source.fetch_prices(),
            self.source.fetch_signals(),
            self.source.fetch_ledger(),
        );

        let result: Result<PrimaryData, SourceError> = match (prices, signals, ledger) {
            (Ok(p), Ok(s), Ok(l)) => Ok((p, s, l)),
            (Err(e), _, _) | (_, Err(e), _) | (_, _, Err(e)) => Err(e),
        };

        match result {
            Ok(data) => {
                self.apply_primary(data);
                SyncOutcome::Fresh
            }
            Err(e) => {
                let reason = e.to_string();
                self.apply_baseline(&reason);
                SyncOutcome::Fallback(reason)
            }
        }
    }

    fn apply_primary(&self, (quotes, signals, ledger): PrimaryData) {
        let assets: Vec<_> = quotes.into_iter().map(stats::enrich).collect();
        let portfolio = Portfolio::from_assets(&assets);
        let (asset_count, signal_count) = (assets.len(), signals.len());

        self.store.update_watched(|s| {
            s.assets = assets;
            s.signals = signals;
            // a body without entries keeps the current ledger
            if let Some(entries) = ledger {
                s.ledger = entries;
            }
            s.portfolio = portfolio;
            s.status = SystemStatus::all_online();
            s.phase = SyncPhase::Success;
            s.last_sync = Some(Utc::now());
        });

        tracing::info!(
            "✓ Sync complete: {} assets | {} signals | total ${:.2} ({:+.2}%)",
            asset_count, signal_count, portfolio.total_value, portfolio.weekly_change_percent
        );
        self.store.log_activity(ActivityEntry::now(
            "Data Sync",
            ActivityStatus::Success,
            format!("{} assets, {} signals updated", asset_count, signal_count),
        ));
        self.store.notify(NotificationLevel::Success, "✅ Data refreshed!");
    }

    fn apply_baseline(&self, reason: &str) {
        tracing::warn!("Primary sync failed ({}), loading baseline data", reason);

        let assets: Vec<_> = fallback::quotes().into_iter().map(stats::enrich).collect();

        self.store.update_watched(|s| {
            s.assets = assets;
            s.signals = fallback::signals();
            s.ledger = fallback::ledger();
            s.portfolio = fallback::portfolio();
            s.activity = fallback::activity().into_iter().collect();
            s.status = SystemStatus::degraded();
            s.phase = SyncPhase::Fallback;
        });

        self.store.log_activity(ActivityEntry::now("Data Sync", ActivityStatus::Fallback, reason));
        self.store.notify(
            NotificationLevel::Warning,
            format!("⚠️ Using demo data. Backend: {}", reason),
        );
    }

    /// AYAO pools; failure falls back to the ranked baseline pools only
    pub async fn refresh_pools(&self) -> SyncOutcome {
        let ticket = self.pools_gen.begin();
        let fetched = self.source.fetch_pools().await;

        if !self.pools_gen.is_current(ticket) {
            tracing::debug!("Discarding stale pool fetch #{}", ticket);
            return SyncOutcome::Stale;
        }

        let (pools, outcome) = match fetched {
            Ok(pools) => (pools, SyncOutcome::Fresh),
            Err(e) => {
                tracing::warn!("AYAO fetch failed ({}), using baseline pools", e);
                (fallback::pools(), SyncOutcome::Fallback(e.to_string()))
            }
        };

        let ranked = stats::rank_yield_pools(&pools, self.capital);
        if let Some(best) = ranked.first() {
            tracing::debug!("AYAO best pool: {} ({:.2} risk-adjusted)", best.pool.name, best.risk_adjusted_return);
        }
        self.store.update(|s| s.pools = ranked);
        outcome
    }

    /// Risk alerts; failure falls back to the baseline alerts only
    pub async fn refresh_risk_alerts(&self) -> SyncOutcome {
        let ticket = self.risk_gen.begin();
        let fetched = self.source.fetch_risk_alerts().await;

        if !self.risk_gen.is_current(ticket) {
            tracing::debug!("Discarding stale risk alert fetch #{}", ticket);
            return SyncOutcome::Stale;
        }

        let (alerts, outcome) = match fetched {
            Ok(alerts) => (alerts, SyncOutcome::Fresh),
            Err(e) => {
                tracing::warn!("Risk alert fetch failed ({}), using baseline alerts", e);
                (fallback::risk_alerts(), SyncOutcome::Fallback(e.to_string()))
            }
        };

        self.store.update(|s| s.risk_alerts = alerts);
        outcome
    }

    /// Primary data, pools and risk alerts concurrently, each domain
    /// falling back on its own.
    pub async fn royal_sync(&self) -> RoyalSyncReport {
        self.store.notify(NotificationLevel::Info, "👑 Royal Sync started...");

        let (primary, pools, risk_alerts) = tokio::join!(
            self.run_primary(),
            self.refresh_pools(),
            self.refresh_risk_alerts(),
        );
        let report = RoyalSyncReport { primary, pools, risk_alerts };

        let degraded: Vec<&str> = [
            ("prices", &report.primary),
            ("pools", &report.pools),
            ("alerts", &report.risk_alerts),
        ]
        .into_iter()
        .filter(|(_, o)| o.is_fallback())
        .map(|(name, _)| name)
        .collect();

        if degraded.is_empty() {
            self.store.log_activity(ActivityEntry::now("Royal Sync", ActivityStatus::Success, "All AI data synchronized"));
            self.store.notify(NotificationLevel::Success, "👑 All Royal data synchronized!");
        } else {
            let message = format!("Local data used for: {}", degraded.join(", "));
            tracing::warn!("Royal Sync degraded: {}", message);
            self.store.log_activity(ActivityEntry::now("Royal Sync", ActivityStatus::Fallback, message.clone()));
            self.store.notify(NotificationLevel::Warning, format!("⚠️ Royal Sync: {}", message));
        }

        report
    }

    /// Ask the backend to sync itself, then pull fresh data
    pub async fn sync_all(&self) -> Result<SyncOutcome, SourceError> {
        self.store.notify(NotificationLevel::Info, "🔄 Starting AI data sync...");

        match self.source.trigger_sync().await {
            Ok(()) => {
                self.store.log_activity(ActivityEntry::now("Server Sync", ActivityStatus::Success, "Backend sync finished"));
                self.store.notify(NotificationLevel::Success, "✅ Sync finished!");
                Ok(self.sync_primary().await)
            }
            Err(e) => {
                tracing::warn!("Server sync failed: {}", e);
                self.store.log_activity(ActivityEntry::now("Server Sync", ActivityStatus::Failed, e.to_string()));
                self.store.notify(NotificationLevel::Warning, format!("⚠️ Sync error: {}", e));
                Err(e)
            }
        }
    }

    /// Download the report artifact. Never touches dashboard data.
    pub async fn generate_report(&self) -> Result<PathBuf, ReportError> {
        self.store.notify(NotificationLevel::Info, "📄 Generating Royal report...");

        let result = match self.source.fetch_report().await {
            Ok(bytes) => self.reports.deliver(&report_file_name(), &bytes),
            Err(e) => Err(ReportError::from(e)),
        };

        match &result {
            Ok(path) => {
                self.store.notify(NotificationLevel::Success, "✅ Royal report downloaded!");
                tracing::info!("Report delivered to {}", path.display());
            }
            Err(e) => {
                tracing::warn!("Report generation failed: {}", e);
                self.store.notify(NotificationLevel::Warning, format!("⚠️ Report error: {}", e));
            }
        }
        result
    }

    /// Timer-driven primary sync; the first tick comes one period from now
    pub async fn run_periodic(self: Arc<Self>, interval_secs: u64) {
        let period = Duration::from_secs(interval_secs.max(1));
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            let outcome = self.sync_primary().await;
            tracing::debug!("Periodic sync: {:?}", outcome);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::collections::{HashMap, VecDeque};
    use crate::models::{
        AlertDirection, Health, RiskAlert, Subsystem, Verdict, YieldPool, RiskTier, PricePoint,
    };
    use crate::services::alerts::AlertEvaluator;

    /// In-memory backend; each endpoint either answers or fails with 500
    #[derive(Default)]
    struct StubSource {
        fail: Mutex<Vec<&'static str>>,
        prices: Mutex<Vec<AssetQuote>>,
        ledger: Mutex<Option<Vec<LedgerEntry>>>,
        /// Per endpoint, one delay consumed per call
        delays: Mutex<HashMap<&'static str, VecDeque<u64>>>,
        /// One response consumed per call, then the default pair
        pool_batches: Mutex<VecDeque<Vec<YieldPool>>>,
        alert_batches: Mutex<VecDeque<Vec<RiskAlert>>>,
    }

    impl StubSource {
        fn healthy() -> Self {
            let stub = Self::default();
            *stub.prices.lock() = vec![
                quote("BTC", 110.0, 10.0, &[100.0, 110.0]),
                quote("ETH", 90.0, -10.0, &[100.0, 90.0]),
            ];
            stub
        }

        fn failing(self, endpoints: &[&'static str]) -> Self {
            *self.fail.lock() = endpoints.to_vec();
            self
        }

        fn delayed(self, endpoint: &'static str, delays_ms: &[u64]) -> Self {
            self.delays.lock().entry(endpoint).or_default().extend(delays_ms);
            self
        }

        fn check(&self, endpoint: &str) -> Result<(), SourceError> {
            if self.fail.lock().iter().any(|e| *e == endpoint) {
                return Err(SourceError::Status { endpoint: endpoint.to_string(), status: 500 });
            }
            Ok(())
        }

        async fn pause(&self, endpoint: &str) {
            let delay = self.delays.lock().get_mut(endpoint).and_then(|d| d.pop_front());
            if let Some(ms) = delay {
                tokio::time::sleep(Duration::from_millis(ms)).await;
            }
        }
    }

    fn pool(name: &str, apy: f64, risk_factor: f64) -> YieldPool {
        YieldPool {
            name: name.into(),
            apy,
            risk_factor,
            min_deposit: 0.0,
            risk: RiskTier::from_factor(risk_factor),
            tvl: "$1M".into(),
        }
    }

    fn quote(symbol: &str, price: f64, change: f64, history: &[f64]) -> AssetQuote {
        AssetQuote {
            symbol: symbol.to_string(),
            name: symbol.to_string(),
            price,
            change,
            history: history.iter().map(|p| PricePoint::new("Mon", *p)).collect(),
        }
    }

    #[async_trait]
    impl DashboardSource for StubSource {
        fn name(&self) -> &'static str { "stub" }

        async fn fetch_prices(&self) -> Result<Vec<AssetQuote>, SourceError> {
            self.pause("/api/harga").await;
            self.check("/api/harga")?;
            Ok(self.prices.lock().clone())
        }

        async fn fetch_signals(&self) -> Result<Vec<Signal>, SourceError> {
            self.check("/api/sinyal")?;
            Ok(vec![Signal {
                coin: "BTC".into(),
                signal: Verdict::Sell,
                confidence: 0.9,
                reason: "stub".into(),
                rsi: 80.0,
            }])
        }

        async fn fetch_ledger(&self) -> Result<Option<Vec<LedgerEntry>>, SourceError> {
            self.check("/api/ledger")?;
            Ok(self.ledger.lock().clone())
        }

        async fn fetch_pools(&self) -> Result<Vec<YieldPool>, SourceError> {
            self.check("/api/ayao")?;
            let batch = self.pool_batches.lock().pop_front();
            self.pause("/api/ayao").await;
            Ok(batch.unwrap_or_else(|| vec![pool("risky", 10.0, 0.5), pool("safe", 8.0, 0.0)]))
        }

        async fn fetch_risk_alerts(&self) -> Result<Vec<RiskAlert>, SourceError> {
            self.check("/api/alerts")?;
            let batch = self.alert_batches.lock().pop_front();
            self.pause("/api/alerts").await;
            Ok(batch.unwrap_or_default())
        }

        async fn trigger_sync(&self) -> Result<(), SourceError> {
            self.check("/api/sync")
        }

        async fn fetch_report(&self) -> Result<Vec<u8>, SourceError> {
            self.check("/api/report")?;
            Ok(b"%PDF".to_vec())
        }
    }

    /// Keeps delivered reports in memory
    #[derive(Default)]
    struct MemorySink(Mutex<Vec<(String, Vec<u8>)>>);

    impl ReportSink for MemorySink {
        fn deliver(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, ReportError> {
            self.0.lock().push((file_name.to_string(), bytes.to_vec()));
            Ok(PathBuf::from(file_name))
        }
    }

    fn orchestrator(source: StubSource) -> (SyncOrchestrator, Arc<MemorySink>) {
        let store = Arc::new(DashboardStore::new(4, 20));
        store.register(Arc::new(AlertEvaluator::new(4)));
        let sink = Arc::new(MemorySink::default());
        let orch = SyncOrchestrator::new(Arc::new(source), store, sink.clone(), 1000.0);
        (orch, sink)
    }

    #[tokio::test]
    async fn healthy_backend_applies_server_data() {
        let (orch, _) = orchestrator(StubSource::healthy());

        assert_eq!(orch.sync_primary().await, SyncOutcome::Fresh);

        orch.store.read(|s| {
            assert_eq!(s.phase, SyncPhase::Success);
            assert!(s.last_sync.is_some());
            assert_eq!(s.assets.len(), 2);
            assert_eq!(s.assets[0].chart.len(), 2);
            assert!((s.assets[0].chart[0].middle - 105.0).abs() < 1e-9);
            assert_eq!(s.signals[0].signal, Verdict::Sell);
            assert_eq!(s.portfolio.total_value, 200.0);
            assert!(s.status.offline().is_empty());
        });
        assert!(!orch.busy.load(Ordering::Acquire));
    }

    #[tokio::test]
    async fn any_single_failure_loads_full_baseline() {
        for endpoint in ["/api/harga", "/api/sinyal", "/api/ledger"] {
            let (orch, _) = orchestrator(StubSource::healthy().failing(&[endpoint]));

            let outcome = orch.sync_primary().await;
            assert!(outcome.is_fallback(), "{} should trigger fallback", endpoint);

            orch.store.read(|s| {
                assert_eq!(s.phase, SyncPhase::Fallback);
                let symbols: Vec<&str> = s.assets.iter().map(|a| a.symbol.as_str()).collect();
                assert_eq!(symbols, vec!["BTC", "ETH", "SOL", "XRP", "MATIC"]);
                assert_eq!(s.signals.len(), 3);
                assert_eq!(s.ledger, fallback::ledger());
                assert_eq!(s.portfolio, fallback::portfolio());
                // pools and risk alerts were pulled again and answered
                assert_eq!(s.pools[0].pool.name, "safe");
                assert!(s.risk_alerts.is_empty());
                assert_eq!(s.status.get(Subsystem::Claude), Health::Online);
                assert_eq!(s.status.offline(), vec![Subsystem::Bibot, Subsystem::Lechat, Subsystem::Gemini]);
                assert_eq!(s.notification.as_ref().unwrap().level, NotificationLevel::Warning);
                assert!(s.last_sync.is_none());
            });
        }
    }

    #[tokio::test]
    async fn unreachable_backend_loads_every_baseline() {
        let all = ["/api/harga", "/api/sinyal", "/api/ledger", "/api/ayao", "/api/alerts"];
        let (orch, _) = orchestrator(StubSource::healthy().failing(&all));

        assert!(orch.sync_primary().await.is_fallback());
        orch.store.read(|s| {
            assert_eq!(s.assets.len(), 5);
            assert_eq!(s.pools.len(), 5);
            assert_eq!(s.pools[0].pool.name, "SOL-USDT");
            assert_eq!(s.risk_alerts, fallback::risk_alerts());
        });
    }

    #[tokio::test]
    async fn missing_ledger_entries_keep_previous_ledger() {
        let stub = StubSource::healthy();
        *stub.ledger.lock() = Some(fallback::ledger());
        let stub = Arc::new(stub);

        let store = Arc::new(DashboardStore::new(4, 20));
        let orch = SyncOrchestrator::new(stub.clone(), store, Arc::new(MemorySink::default()), 1000.0);

        orch.sync_primary().await;
        *stub.ledger.lock() = None;
        orch.sync_primary().await;

        assert_eq!(orch.store.read(|s| s.ledger.len()), 3);
    }

    #[tokio::test]
    async fn overlapping_trigger_is_skipped() {
        let (orch, _) = orchestrator(StubSource::healthy().delayed("/api/harga", &[100]));

        let (first, second) = tokio::join!(orch.sync_primary(), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            orch.sync_primary().await
        });

        assert_eq!(first, SyncOutcome::Fresh);
        assert_eq!(second, SyncOutcome::Skipped);
        assert_eq!(orch.sync_primary().await, SyncOutcome::Fresh);
    }

    #[test]
    fn generation_only_latest_ticket_is_current() {
        let gen = Generation::default();
        let first = gen.begin();
        assert!(gen.is_current(first));
        let second = gen.begin();
        assert!(!gen.is_current(first));
        assert!(gen.is_current(second));
    }

    #[tokio::test]
    async fn royal_sync_falls_back_per_domain() {
        let (orch, _) = orchestrator(StubSource::healthy().failing(&["/api/alerts"]));

        let report = orch.royal_sync().await;
        assert_eq!(report.primary, SyncOutcome::Fresh);
        assert_eq!(report.pools, SyncOutcome::Fresh);
        assert!(report.risk_alerts.is_fallback());

        orch.store.read(|s| {
            // server prices survive, only alerts come from the baseline
            assert_eq!(s.assets.len(), 2);
            assert!(s.status.offline().is_empty());
            assert_eq!(s.pools[0].pool.name, "safe");
            assert_eq!(s.risk_alerts, fallback::risk_alerts());
            assert_eq!(s.notification.as_ref().unwrap().level, NotificationLevel::Warning);
        });
    }

    #[tokio::test]
    async fn late_primary_failure_keeps_fresh_pools() {
        let stub = StubSource::healthy()
            .failing(&["/api/harga"])
            .delayed("/api/harga", &[50]);
        let (orch, _) = orchestrator(stub);

        let report = orch.royal_sync().await;
        assert!(report.primary.is_fallback());
        assert_eq!(report.pools, SyncOutcome::Fresh);
        assert_eq!(report.risk_alerts, SyncOutcome::Fresh);

        orch.store.read(|s| {
            assert_eq!(s.assets.len(), 5);
            assert_eq!(s.pools.len(), 2);
            assert_eq!(s.pools[0].pool.name, "safe");
            assert!(s.risk_alerts.is_empty());
        });
    }

    #[tokio::test]
    async fn late_pool_result_is_discarded() {
        let stub = StubSource::healthy().delayed("/api/ayao", &[80]);
        stub.pool_batches.lock().extend([vec![pool("old", 50.0, 0.0)], vec![pool("new", 5.0, 0.1)]]);
        let (orch, _) = orchestrator(stub);

        let (first, second) = tokio::join!(orch.refresh_pools(), orch.refresh_pools());
        assert_eq!(first, SyncOutcome::Stale);
        assert_eq!(second, SyncOutcome::Fresh);

        orch.store.read(|s| {
            assert_eq!(s.pools.len(), 1);
            assert_eq!(s.pools[0].pool.name, "new");
        });
    }

    #[tokio::test]
    async fn late_risk_alert_result_is_discarded() {
        let stub = StubSource::healthy().delayed("/api/alerts", &[80]);
        stub.alert_batches.lock().extend([fallback::risk_alerts(), vec![]]);
        let (orch, _) = orchestrator(stub);

        let (first, second) = tokio::join!(orch.refresh_risk_alerts(), orch.refresh_risk_alerts());
        assert_eq!(first, SyncOutcome::Stale);
        assert_eq!(second, SyncOutcome::Fresh);
        assert!(orch.store.read(|s| s.risk_alerts.is_empty()));
    }

    #[tokio::test]
    async fn royal_sync_pool_failure_ranks_baseline() {
        let (orch, _) = orchestrator(StubSource::healthy().failing(&["/api/ayao"]));

        let report = orch.royal_sync().await;
        assert!(report.pools.is_fallback());
        assert_eq!(report.risk_alerts, SyncOutcome::Fresh);

        orch.store.read(|s| {
            assert_eq!(s.pools.len(), 5);
            assert!(s.pools.windows(2).all(|w| w[0].risk_adjusted_return >= w[1].risk_adjusted_return));
            assert!(s.risk_alerts.is_empty());
        });
    }

    #[tokio::test]
    async fn server_sync_failure_leaves_state_alone() {
        let (orch, _) = orchestrator(StubSource::healthy().failing(&["/api/sync"]));

        assert!(orch.sync_all().await.is_err());
        orch.store.read(|s| {
            assert!(s.assets.is_empty());
            assert_eq!(s.phase, SyncPhase::Idle);
            assert_eq!(s.activity[0].status, ActivityStatus::Failed);
        });

        let (orch, _) = orchestrator(StubSource::healthy());
        assert_eq!(orch.sync_all().await.unwrap(), SyncOutcome::Fresh);
    }

    #[tokio::test]
    async fn report_failure_is_isolated() {
        let (orch, sink) = orchestrator(StubSource::healthy().failing(&["/api/report"]));
        orch.sync_primary().await;

        assert!(matches!(orch.generate_report().await, Err(ReportError::Source(_))));
        assert!(sink.0.lock().is_empty());
        orch.store.read(|s| {
            assert_eq!(s.phase, SyncPhase::Success);
            assert_eq!(s.assets.len(), 2);
        });

        let (orch, sink) = orchestrator(StubSource::healthy());
        orch.generate_report().await.unwrap();
        let delivered = sink.0.lock();
        assert!(delivered[0].0.starts_with("Royal_Report_"));
        assert_eq!(delivered[0].1, b"%PDF".to_vec());
    }

    #[tokio::test]
    async fn sync_reevaluates_custom_alerts() {
        let (orch, _) = orchestrator(StubSource::healthy());
        orch.store.add_alert("btc", 105.0, AlertDirection::Above).unwrap();
        orch.store.add_alert("eth", 50.0, AlertDirection::Below).unwrap();

        orch.sync_primary().await;
        orch.store.read(|s| {
            assert!(!s.custom_alerts[0].active);
            assert!(s.custom_alerts[1].active);
        });
    }
}
