//! Run report types.

use serde::Serialize;
use zone_snapshot_provider::HostedZone;

/// Pipeline stage at which a zone failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ZoneStage {
    /// Draining the zone's record sets.
    FetchRecords,
    /// Writing the staged artifacts.
    Export,
    /// Uploading the artifacts.
    Archive,
    /// The run deadline elapsed before the zone finished.
    TimedOut,
}

impl std::fmt::Display for ZoneStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::FetchRecords => "fetch-records",
            Self::Export => "export",
            Self::Archive => "archive",
            Self::TimedOut => "timed-out",
        })
    }
}

/// Final state of one zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum ZoneStatus {
    /// Both artifacts were uploaded.
    #[serde(rename_all = "camelCase")]
    Archived {
        /// Number of record sets in the snapshot.
        record_sets: usize,
        /// Archive keys, one per artifact.
        keys: Vec<String>,
    },
    /// The zone stopped at `stage`.
    #[serde(rename_all = "camelCase")]
    Failed {
        /// Stage that failed.
        stage: ZoneStage,
        /// Error text.
        error: String,
        /// Last stage that completed before the failure.
        #[serde(skip_serializing_if = "Option::is_none")]
        last_completed: Option<ZoneStage>,
        /// Artifacts already in the archive when the zone stopped.
        #[serde(skip_serializing_if = "Vec::is_empty")]
        uploaded_keys: Vec<String>,
    },
}

/// How far a zone got through the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ZoneProgress {
    /// Last completed stage (`FetchRecords` or `Export`).
    pub last_completed: Option<ZoneStage>,
    /// Keys uploaded so far.
    pub uploaded_keys: Vec<String>,
}

/// Outcome of one zone in a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneOutcome {
    /// Hosted zone id as returned by the listing API.
    pub zone_id: String,
    /// Zone name with trailing dot.
    pub zone_name: String,
    /// Result.
    #[serde(flatten)]
    pub status: ZoneStatus,
}

impl ZoneOutcome {
    /// Archived outcome.
    #[must_use]
    pub fn archived(zone: &HostedZone, record_sets: usize, keys: Vec<String>) -> Self {
        Self {
            zone_id: zone.id.clone(),
            zone_name: zone.name.clone(),
            status: ZoneStatus::Archived { record_sets, keys },
        }
    }

    /// Failed outcome.
    #[must_use]
    pub fn failed(zone: &HostedZone, stage: ZoneStage, error: impl ToString) -> Self {
        Self {
            zone_id: zone.id.clone(),
            zone_name: zone.name.clone(),
            status: ZoneStatus::Failed {
                stage,
                error: error.to_string(),
                last_completed: None,
                uploaded_keys: Vec::new(),
            },
        }
    }

    /// Attaches partial progress to a failed outcome; archived outcomes are unchanged.
    #[must_use]
    pub fn with_progress(mut self, progress: ZoneProgress) -> Self {
        if let ZoneStatus::Failed {
            last_completed,
            uploaded_keys,
            ..
        } = &mut self.status
        {
            *last_completed = progress.last_completed;
            *uploaded_keys = progress.uploaded_keys;
        }
        self
    }

    /// Whether the zone was archived.
    #[must_use]
    pub fn is_archived(&self) -> bool {
        matches!(self.status, ZoneStatus::Archived { .. })
    }
}

/// Report of a whole run, zones in listing order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    /// Run timestamp (`%Y-%m-%dT%H:%M:%SZ`), first segment of every archive key.
    pub run_timestamp: String,
    /// Archive target (bucket).
    pub archive_target: String,
    /// One outcome per listed zone.
    pub zones: Vec<ZoneOutcome>,
}

impl RunReport {
    /// The run succeeded only if every zone was archived.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.zones.iter().all(ZoneOutcome::is_archived)
    }

    /// Zones that did not make it to the archive.
    pub fn failed_zones(&self) -> impl Iterator<Item = &ZoneOutcome> {
        self.zones.iter().filter(|z| !z.is_archived())
    }

    /// Number of archived zones.
    #[must_use]
    pub fn archived_count(&self) -> usize {
        self.zones.iter().filter(|z| z.is_archived()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zone(name: &str) -> HostedZone {
        HostedZone {
            id: format!("/hostedzone/Z{}", name.len()),
            name: name.to_string(),
            caller_reference: None,
            comment: None,
            private_zone: None,
            record_set_count: None,
        }
    }

    #[test]
    fn empty_report_is_success() {
        let report = RunReport {
            run_timestamp: "2024-01-01T00:00:00Z".into(),
            archive_target: "b".into(),
            zones: vec![],
        };
        assert!(report.is_success());
        assert_eq!(report.archived_count(), 0);
    }

    #[test]
    fn one_failure_fails_the_run() {
        let report = RunReport {
            run_timestamp: "2024-01-01T00:00:00Z".into(),
            archive_target: "b".into(),
            zones: vec![
                ZoneOutcome::archived(&zone("a.com."), 3, vec!["k".into()]),
                ZoneOutcome::failed(&zone("b.com."), ZoneStage::Archive, "denied"),
            ],
        };
        assert!(!report.is_success());
        assert_eq!(report.archived_count(), 1);
        let failed: Vec<_> = report.failed_zones().map(|z| z.zone_name.as_str()).collect();
        assert_eq!(failed, vec!["b.com."]);
    }

    #[test]
    fn outcome_serializes_flat() {
        let json =
            serde_json::to_value(ZoneOutcome::failed(&zone("a.com."), ZoneStage::TimedOut, "late"))
                .unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "zoneId": "/hostedzone/Z6",
                "zoneName": "a.com.",
                "status": "failed",
                "stage": "timed-out",
                "error": "late"
            })
        );
    }

    #[test]
    fn partial_progress_is_reported() {
        let outcome = ZoneOutcome::failed(&zone("a.com."), ZoneStage::TimedOut, "late")
            .with_progress(ZoneProgress {
                last_completed: Some(ZoneStage::Export),
                uploaded_keys: vec!["ts/a.com/a.com.csv".into()],
            });

        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["lastCompleted"], "export");
        assert_eq!(json["uploadedKeys"], serde_json::json!(["ts/a.com/a.com.csv"]));
        assert!(!outcome.is_archived());
    }

    #[test]
    fn progress_does_not_touch_archived_outcome() {
        let archived = ZoneOutcome::archived(&zone("a.com."), 1, vec!["k".into()]);
        let with = archived.clone().with_progress(ZoneProgress {
            last_completed: Some(ZoneStage::FetchRecords),
            uploaded_keys: vec![],
        });
        assert_eq!(with, archived);
    }
}
