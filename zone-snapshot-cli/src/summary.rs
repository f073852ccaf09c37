//! 运行报告的文本摘要

use std::fmt::Write;

use zone_snapshot_core::{RunReport, ZoneStatus};

/// 每个区域一行，最后一行为汇总
pub fn render(report: &RunReport) -> String {
    let mut out = String::new();
    for zone in &report.zones {
        let _ = match &zone.status {
            ZoneStatus::Archived { record_sets, keys } => writeln!(
                out,
                "archived  {} ({record_sets} record sets, {} artifacts)",
                zone.zone_name,
                keys.len()
            ),
            ZoneStatus::Failed {
                stage,
                error,
                last_completed,
                uploaded_keys,
            } => {
                let mut line = format!("FAILED    {} at {stage}: {error}", zone.zone_name);
                if let Some(done) = last_completed {
                    let _ = write!(line, " (completed {done}");
                    if !uploaded_keys.is_empty() {
                        let _ = write!(line, ", uploaded {}", uploaded_keys.join(" "));
                    }
                    line.push(')');
                }
                writeln!(out, "{line}")
            }
        };
    }
    let _ = writeln!(
        out,
        "{}/{} zones archived to {} under {}/",
        report.archived_count(),
        report.zones.len(),
        report.archive_target,
        report.run_timestamp
    );
    out
}
