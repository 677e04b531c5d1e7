//! End-to-end split of an input file
//!
//! Opens the corpus, distributes it across partition files, always closes
//! the distributor, then uploads the files when the backend asks for it.

use crate::destination::{Backend, FileDestinations, OutputLayout};
use crate::distributor::RoundRobinDistributor;
use crate::error::{Error, Result};
use crate::report::{FileReport, Report, UploadReport};
use crate::upload::{upload_partitions, GraphStoreClient};
use std::path::{Path, PathBuf};
use tokio::io::BufReader;

/// Options for [`split_file`].
#[derive(Debug, Clone)]
pub struct SplitOptions {
    pub partitions: usize,
    pub output_dir: PathBuf,
    pub backend: Backend,
}

impl SplitOptions {
    pub fn new(partitions: usize) -> Self {
        Self {
            partitions,
            output_dir: PathBuf::from("."),
            backend: Backend::LocalFile,
        }
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }
}

/// Split `input` into `options.partitions` graphs.
pub async fn split_file(input: &Path, options: &SplitOptions) -> Result<Report> {
    // Build the upload client first so a bad URL fails before any output
    let client = options
        .backend
        .graph_store()
        .map(GraphStoreClient::new)
        .transpose()?;

    let file = tokio::fs::File::open(input)
        .await
        .map_err(|e| Error::input(format!("failed to open {}: {e}", input.display())))?;
    let layout = OutputLayout::from_input(input, &options.output_dir)?;

    tracing::info!(
        input = %input.display(),
        partitions = options.partitions,
        output_dir = %options.output_dir.display(),
        "splitting corpus"
    );

    let mut distributor =
        RoundRobinDistributor::new(FileDestinations::new(layout.clone()), options.partitions)?;
    let distributed = distributor.distribute(BufReader::new(file)).await;
    let closed = distributor.close().await;
    let summary = distributed?;
    closed?;

    tracing::info!(
        total = summary.total,
        used = summary.partitions_used(),
        "distribution complete"
    );

    match client {
        None => Ok(Report::File(FileReport {
            distribution: summary,
        })),
        Some(client) => {
            tracing::info!(url = %client.base_url(), "uploading partitions");
            let upload = upload_partitions(&client, &layout, &summary).await?;
            Ok(Report::Upload(UploadReport {
                distribution: summary,
                upload,
                url: client.base_url().to_string(),
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upload::GraphStoreConfig;
    use crate::error::UploadFailure;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn write_input(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[tokio::test]
    async fn test_split_to_local_files() {
        let input_dir = tempfile::tempdir().unwrap();
        let out_dir = tempfile::tempdir().unwrap();
        let input = write_input(input_dir.path(), "data.nt", "1\n2\n3\n4\n5\n6\n7\n");

        let options = SplitOptions::new(2).with_output_dir(out_dir.path());
        let report = split_file(&input, &options).await.unwrap();

        assert_eq!(report.summarize(), "7 lines written into 2 files.");
        let first = std::fs::read_to_string(out_dir.path().join("data-01.nt")).unwrap();
        let second = std::fs::read_to_string(out_dir.path().join("data-10.nt")).unwrap();
        assert_eq!(first, "1\n3\n5\n7\n");
        assert_eq!(second, "2\n4\n6\n");
    }

    #[tokio::test]
    async fn test_split_missing_input() {
        let out_dir = tempfile::tempdir().unwrap();
        let options = SplitOptions::new(2).with_output_dir(out_dir.path());
        let err = split_file(&out_dir.path().join("nope.nt"), &options)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Input(_)));
        assert_eq!(std::fs::read_dir(out_dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_split_unwritable_output_dir() {
        let input_dir = tempfile::tempdir().unwrap();
        let input = write_input(input_dir.path(), "data.nt", "a\nb\n");
        let options = SplitOptions::new(2).with_output_dir(input_dir.path().join("missing"));
        let err = split_file(&input, &options).await.unwrap_err();
        assert!(matches!(err, Error::BackendCreation { .. }));
    }

    #[tokio::test]
    async fn test_split_and_upload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(3)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path(), "people.nt", "a\nb\nc\nd\n\nignored\n");
        let options = SplitOptions::new(3)
            .with_output_dir(dir.path())
            .with_backend(Backend::RemoteGraphStore(GraphStoreConfig::new(server.uri())));

        let report = split_file(&input, &options).await.unwrap();
        match &report {
            Report::Upload(r) => {
                assert_eq!(r.upload.uploaded, 3);
                assert_eq!(r.distribution.total, 4);
            }
            other => panic!("expected upload report, got {other:?}"),
        }
        assert!(report.summarize().contains("and uploaded to"));
    }

    #[tokio::test]
    async fn test_split_and_upload_fewer_lines_than_partitions() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path(), "data.nt", "only\n");
        let options = SplitOptions::new(4)
            .with_output_dir(dir.path())
            .with_backend(Backend::RemoteGraphStore(GraphStoreConfig::new(server.uri())));

        let err = split_file(&input, &options).await.unwrap_err();
        assert_eq!(err.uploaded_before_failure(), Some(1));
        assert!(matches!(
            err,
            Error::Upload {
                source: UploadFailure::Open { .. },
                ..
            }
        ));
        // the local split itself completed
        let written = std::fs::read_to_string(dir.path().join("data-001.nt")).unwrap();
        assert_eq!(written, "only\n");
    }
}
