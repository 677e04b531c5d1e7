//! Split result summaries
//!
//! A [`Report`] is built from immutable result values once a split has
//! finished. It never reads distributor state.

use crate::distributor::DistributionSummary;
use crate::upload::UploadSummary;
use serde::Serialize;
use std::fmt;

/// Summary of a split that only wrote local files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    pub distribution: DistributionSummary,
}

/// Summary of a split whose files were also uploaded to a graph store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadReport {
    pub distribution: DistributionSummary,
    pub upload: UploadSummary,
    pub url: String,
}

/// Outcome of a split.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Report {
    File(FileReport),
    Upload(UploadReport),
}

impl Report {
    pub fn distribution(&self) -> &DistributionSummary {
        match self {
            Report::File(r) => &r.distribution,
            Report::Upload(r) => &r.distribution,
        }
    }

    /// One-line human summary.
    pub fn summarize(&self) -> String {
        let d = self.distribution();
        let written = format!(
            "{} lines written into {} files",
            d.total,
            d.partitions_used()
        );
        match self {
            Report::File(_) => format!("{written}."),
            Report::Upload(r) => format!(
                "{written} and uploaded to {} in {:?}",
                r.url, r.upload.elapsed
            ),
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summarize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn distribution() -> DistributionSummary {
        DistributionSummary {
            total: 7,
            partitions: 2,
            lines_per_partition: vec![4, 3],
        }
    }

    #[test]
    fn test_file_report() {
        let report = Report::File(FileReport {
            distribution: distribution(),
        });
        assert_eq!(report.summarize(), "7 lines written into 2 files.");
    }

    #[test]
    fn test_file_report_fewer_lines_than_partitions() {
        let report = Report::File(FileReport {
            distribution: DistributionSummary {
                total: 1,
                partitions: 8,
                lines_per_partition: vec![1, 0, 0, 0, 0, 0, 0, 0],
            },
        });
        assert_eq!(report.to_string(), "1 lines written into 1 files.");
    }

    #[test]
    fn test_upload_report() {
        let report = Report::Upload(UploadReport {
            distribution: distribution(),
            upload: UploadSummary {
                uploaded: 2,
                elapsed: Duration::from_millis(1500),
            },
            url: "http://localhost:3030/test".into(),
        });
        assert_eq!(
            report.summarize(),
            "7 lines written into 2 files and uploaded to http://localhost:3030/test in 1.5s"
        );
    }

    #[test]
    fn test_report_json() {
        let report = Report::File(FileReport {
            distribution: distribution(),
        });
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["kind"], "file");
        assert_eq!(json["distribution"]["total"], 7);
    }
}
