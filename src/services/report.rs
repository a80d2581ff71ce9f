use chrono::Utc;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use crate::sources::SourceError;

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("report fetch failed: {0}")]
    Source(#[from] SourceError),
    #[error("report write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Where a downloaded report ends up
pub trait ReportSink: Send + Sync {
    fn deliver(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, ReportError>;
}

/// Dated download name, e.g. `Royal_Report_2025-11-01.pdf`
pub fn report_file_name() -> String {
    format!("Royal_Report_{}.pdf", Utc::now().format("%Y-%m-%d"))
}

/// Writes reports into a local download directory
pub struct FileReportSink {
    report_dir: PathBuf,
}

impl FileReportSink {
    pub fn new(report_dir: &str) -> Self {
        Self {
            report_dir: PathBuf::from(report_dir),
        }
    }
}

impl ReportSink for FileReportSink {
    fn deliver(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, ReportError> {
        fs::create_dir_all(&self.report_dir)?;
        let path = self.report_dir.join(file_name);

        let mut writer = BufWriter::new(File::create(&path)?);
        writer.write_all(bytes)?;
        writer.flush()?;

        tracing::info!("📄 Report saved: {} ({} bytes)", path.display(), bytes.len());
        Ok(path)
    }
}
