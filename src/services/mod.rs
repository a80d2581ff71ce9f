pub mod stats;
pub mod alerts;
pub mod store;
pub mod fallback;
pub mod orchestrator;
pub mod prefs;
pub mod report;

pub use alerts::AlertEvaluator;
pub use store::DashboardStore;
pub use orchestrator::{SyncOrchestrator, SyncOutcome};
pub use prefs::PreferenceStore;
pub use report::{FileReportSink, ReportSink};
