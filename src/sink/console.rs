//! Console sink
//!
//! Emits one INFO line per successful count. Failed counts already produced
//! an ERROR line at the counter boundary, so they are not repeated here.

use crate::report::ProjectReport;

pub fn write_report(report: &ProjectReport) {
    for record in &report.records {
        if let Some(line) = record.line() {
            tracing::info!("{}", line);
        }
    }
}
