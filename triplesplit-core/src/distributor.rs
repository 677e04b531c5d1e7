//! Round-robin distribution of lines across partitions
//!
//! Each line goes to the partition at the cursor, then the cursor advances
//! modulo the partition count. Destinations are created lazily on the
//! first line routed to them and are owned by the distributor until
//! [`RoundRobinDistributor::close`].
//!
//! Intake via [`RoundRobinDistributor::distribute`] stops at end of stream
//! or at the first blank line. The blank line and everything after it are
//! discarded.

use crate::destination::{Destination, DestinationFactory};
use crate::error::{Error, Result};
use crate::partition::render_name;
use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Open,
    /// A submit failed; only `close` is allowed.
    Failed,
    Closed,
}

/// Outcome of a distribution pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DistributionSummary {
    /// Lines routed to destinations.
    pub total: usize,
    /// Configured partition count.
    pub partitions: usize,
    /// Lines written per partition, by index.
    pub lines_per_partition: Vec<usize>,
}

impl DistributionSummary {
    /// Partitions that received at least one line: `min(partitions, total)`.
    pub fn partitions_used(&self) -> usize {
        self.partitions.min(self.total)
    }
}

/// Cyclic line distributor over `count` lazily created destinations.
#[derive(Debug)]
pub struct RoundRobinDistributor<F: DestinationFactory> {
    factory: F,
    count: usize,
    cursor: usize,
    total: usize,
    destinations: Vec<Option<F::Destination>>,
    lines: Vec<usize>,
    state: State,
}

impl<F: DestinationFactory> RoundRobinDistributor<F> {
    /// Create a distributor over `count` partitions.
    pub fn new(factory: F, count: usize) -> Result<Self> {
        if count < 1 {
            return Err(Error::invalid_index(0, count));
        }
        let mut destinations = Vec::with_capacity(count);
        destinations.resize_with(count, || None);
        Ok(Self {
            factory,
            count,
            cursor: 0,
            total: 0,
            destinations,
            lines: vec![0; count],
            state: State::Open,
        })
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Index of the partition that receives the next line.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_closed(&self) -> bool {
        self.state == State::Closed
    }

    /// Number of destinations that have been created.
    pub fn created(&self) -> usize {
        self.destinations.iter().filter(|d| d.is_some()).count()
    }

    pub fn summary(&self) -> DistributionSummary {
        DistributionSummary {
            total: self.total,
            partitions: self.count,
            lines_per_partition: self.lines.clone(),
        }
    }

    /// Route one line (without its terminator) to the next partition.
    ///
    /// A trailing newline is appended. The first creation or write failure
    /// puts the distributor in a failed state: later submits return
    /// [`Error::Closed`] and only [`close`](Self::close) remains useful.
    pub async fn submit(&mut self, line: &str) -> Result<()> {
        if self.state != State::Open {
            return Err(Error::Closed);
        }
        let index = self.cursor;
        let graph = render_name(index, self.count)?;

        if self.destinations[index].is_none() {
            match self.factory.create(&graph).await {
                Ok(dest) => self.destinations[index] = Some(dest),
                Err(source) => {
                    self.state = State::Failed;
                    return Err(Error::BackendCreation { graph, source });
                }
            }
        }

        let mut buf = Vec::with_capacity(line.len() + 1);
        buf.extend_from_slice(line.as_bytes());
        buf.push(b'\n');

        let Some(dest) = self.destinations[index].as_mut() else {
            return Err(Error::Closed);
        };
        if let Err(source) = dest.write(&buf).await {
            self.state = State::Failed;
            return Err(Error::Write { graph, source });
        }

        self.lines[index] += 1;
        self.total += 1;
        self.cursor = (self.cursor + 1) % self.count;
        Ok(())
    }

    /// Read lines from `reader` and route them until end of stream or the
    /// first blank line.
    ///
    /// Does not close the distributor; callers close it on every path.
    pub async fn distribute<R>(&mut self, reader: R) -> Result<DistributionSummary>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = reader.lines();
        while let Some(line) = lines
            .next_line()
            .await
            .map_err(|e| Error::input(format!("failed to read input: {e}")))?
        {
            if line.is_empty() {
                tracing::debug!(total = self.total, "blank line, stopping intake");
                break;
            }
            self.submit(&line).await?;
        }
        Ok(self.summary())
    }

    /// Release every destination that was created.
    ///
    /// Uncreated slots are not touched. All destinations are closed even if
    /// some fail; the first failure is returned. Calling again is a no-op.
    pub async fn close(&mut self) -> Result<()> {
        if self.state == State::Closed {
            return Ok(());
        }
        self.state = State::Closed;

        let mut first_err = None;
        for (index, slot) in self.destinations.iter_mut().enumerate() {
            let Some(mut dest) = slot.take() else {
                continue;
            };
            if let Err(source) = dest.close().await {
                let graph = render_name(index, self.count)?;
                tracing::warn!(graph = %graph, error = %source, "failed to close destination");
                first_err.get_or_insert(Error::Write { graph, source });
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::destination::MemoryDestinations;
    use async_trait::async_trait;
    use std::io;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    async fn run(lines: &str, count: usize) -> (MemoryDestinations, DistributionSummary) {
        let factory = MemoryDestinations::new();
        let mut dist = RoundRobinDistributor::new(factory.clone(), count).unwrap();
        let summary = dist.distribute(lines.as_bytes()).await.unwrap();
        dist.close().await.unwrap();
        (factory, summary)
    }

    #[tokio::test]
    async fn test_seven_lines_two_partitions() {
        let (mem, summary) = run("1\n2\n3\n4\n5\n6\n7\n", 2).await;
        assert_eq!(mem.contents("01").unwrap(), "1\n3\n5\n7\n");
        assert_eq!(mem.contents("10").unwrap(), "2\n4\n6\n");
        assert_eq!(summary.total, 7);
        assert_eq!(summary.partitions_used(), 2);
        assert_eq!(summary.lines_per_partition, vec![4, 3]);
    }

    #[tokio::test]
    async fn test_blank_line_truncates_intake() {
        let (mem, summary) = run("a\nb\n\nc\n", 3).await;
        assert_eq!(mem.graphs(), vec!["01", "10"]);
        assert_eq!(mem.contents("01").unwrap(), "a\n");
        assert_eq!(mem.contents("10").unwrap(), "b\n");
        assert!(mem.contents("11").is_none());
        assert_eq!(summary.total, 2);
    }

    #[tokio::test]
    async fn test_fewer_lines_than_partitions() {
        let (mem, summary) = run("x\ny\n", 5).await;
        assert_eq!(mem.graphs().len(), 2);
        assert_eq!(summary.partitions_used(), 2);
        assert_eq!(summary.lines_per_partition, vec![1, 1, 0, 0, 0]);
    }

    #[tokio::test]
    async fn test_load_is_balanced() {
        let input: String = (0..101).map(|i| format!("line{i}\n")).collect();
        let (_, summary) = run(&input, 7).await;
        let max = *summary.lines_per_partition.iter().max().unwrap();
        let min = *summary.lines_per_partition.iter().min().unwrap();
        assert!(max - min <= 1);
        assert_eq!(summary.lines_per_partition.iter().sum::<usize>(), 101);
    }

    #[tokio::test]
    async fn test_crlf_input() {
        let (mem, summary) = run("a\r\nb\r\n\r\nc\r\n", 2).await;
        assert_eq!(summary.total, 2);
        assert_eq!(mem.contents("01").unwrap(), "a\n");
    }

    #[tokio::test]
    async fn test_close_is_idempotent_and_closes_once() {
        let factory = MemoryDestinations::new();
        let mut dist = RoundRobinDistributor::new(factory.clone(), 4).unwrap();
        dist.submit("only").await.unwrap();
        dist.close().await.unwrap();
        dist.close().await.unwrap();
        assert!(dist.is_closed());
        assert_eq!(factory.close_count("001"), 1);
        assert!(matches!(dist.submit("late").await, Err(Error::Closed)));
    }

    #[tokio::test]
    async fn test_close_without_destinations() {
        let mut dist = RoundRobinDistributor::new(MemoryDestinations::new(), 3).unwrap();
        dist.close().await.unwrap();
        assert_eq!(dist.created(), 0);
    }

    #[tokio::test]
    async fn test_zero_partitions_rejected() {
        assert!(matches!(
            RoundRobinDistributor::new(MemoryDestinations::new(), 0),
            Err(Error::InvalidIndex { count: 0, .. })
        ));
    }

    /// Factory that refuses to create its `fail_at`-th destination.
    #[derive(Debug, Clone)]
    struct FailingFactory {
        inner: MemoryDestinations,
        created: Arc<AtomicUsize>,
        fail_at: usize,
    }

    #[async_trait]
    impl DestinationFactory for FailingFactory {
        type Destination = crate::destination::MemoryDestination;

        async fn create(&self, graph: &str) -> io::Result<Self::Destination> {
            if self.created.fetch_add(1, Ordering::SeqCst) == self.fail_at {
                return Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
            }
            self.inner.create(graph).await
        }
    }

    #[tokio::test]
    async fn test_creation_failure_aborts_and_releases_created() {
        let inner = MemoryDestinations::new();
        let factory = FailingFactory {
            inner: inner.clone(),
            created: Arc::new(AtomicUsize::new(0)),
            fail_at: 2,
        };
        let mut dist = RoundRobinDistributor::new(factory, 3).unwrap();
        let err = dist.distribute("a\nb\nc\nd\n".as_bytes()).await.unwrap_err();
        match err {
            Error::BackendCreation { graph, .. } => assert_eq!(graph, "11"),
            other => panic!("expected BackendCreation, got: {other}"),
        }
        assert_eq!(dist.total(), 2);
        assert!(matches!(dist.submit("e").await, Err(Error::Closed)));

        dist.close().await.unwrap();
        assert_eq!(inner.close_count("01"), 1);
        assert_eq!(inner.close_count("10"), 1);
        assert!(inner.contents("11").is_none());
    }

    /// Wraps memory destinations; writes to `fail_write` fail once it holds
    /// `write_budget` lines, and closing `fail_close` always fails.
    #[derive(Debug, Clone)]
    struct FailingDestinations {
        inner: MemoryDestinations,
        fail_write: Option<(&'static str, usize)>,
        fail_close: Option<&'static str>,
    }

    #[derive(Debug)]
    struct FailingDestination {
        inner: crate::destination::MemoryDestination,
        writes_left: Option<usize>,
        fail_close: bool,
    }

    #[async_trait]
    impl DestinationFactory for FailingDestinations {
        type Destination = FailingDestination;

        async fn create(&self, graph: &str) -> io::Result<FailingDestination> {
            Ok(FailingDestination {
                inner: self.inner.create(graph).await?,
                writes_left: self
                    .fail_write
                    .and_then(|(g, budget)| (g == graph).then_some(budget)),
                fail_close: self.fail_close == Some(graph),
            })
        }
    }

    #[async_trait]
    impl Destination for FailingDestination {
        async fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
            match self.writes_left {
                Some(0) => Err(io::Error::other("disk full")),
                Some(ref mut n) => {
                    *n -= 1;
                    self.inner.write(bytes).await
                }
                None => self.inner.write(bytes).await,
            }
        }

        async fn close(&mut self) -> io::Result<()> {
            if self.fail_close {
                return Err(io::Error::other("close failed"));
            }
            self.inner.close().await
        }
    }

    #[tokio::test]
    async fn test_write_failure_aborts_intake_and_releases_created() {
        let inner = MemoryDestinations::new();
        let factory = FailingDestinations {
            inner: inner.clone(),
            fail_write: Some(("01", 1)),
            fail_close: None,
        };
        let mut dist = RoundRobinDistributor::new(factory, 2).unwrap();

        // a -> 01, b -> 10, c -> 01 fails
        let err = dist.distribute("a\nb\nc\nd\n".as_bytes()).await.unwrap_err();
        match &err {
            Error::Write { graph, source } => {
                assert_eq!(graph, "01");
                assert_eq!(source.to_string(), "disk full");
            }
            other => panic!("expected Write, got: {other}"),
        }
        assert_eq!(dist.total(), 2);
        assert_eq!(dist.created(), 2);
        // the failed line is neither retried nor skipped to the next partition
        assert!(matches!(dist.submit("d").await, Err(Error::Closed)));
        assert_eq!(inner.contents("10").unwrap(), "b\n");

        dist.close().await.unwrap();
        assert_eq!(inner.close_count("01"), 1);
        assert_eq!(inner.close_count("10"), 1);
        assert_eq!(inner.contents("01").unwrap(), "a\n");
    }

    #[tokio::test]
    async fn test_close_failure_still_closes_the_rest() {
        let inner = MemoryDestinations::new();
        let factory = FailingDestinations {
            inner: inner.clone(),
            fail_write: None,
            fail_close: Some("01"),
        };
        let mut dist = RoundRobinDistributor::new(factory, 3).unwrap();
        dist.distribute("a\nb\nc\n".as_bytes()).await.unwrap();

        match dist.close().await.unwrap_err() {
            Error::Write { graph, .. } => assert_eq!(graph, "01"),
            other => panic!("expected Write, got: {other}"),
        }
        assert_eq!(inner.close_count("10"), 1);
        assert_eq!(inner.close_count("11"), 1);
        assert!(dist.is_closed());
        // already released; nothing is closed twice
        dist.close().await.unwrap();
        assert_eq!(inner.close_count("10"), 1);
    }

    #[tokio::test]
    async fn test_dropped_distributor_keeps_written_lines() {
        let dir = tempfile::tempdir().unwrap();
        let layout = crate::destination::OutputLayout::new(dir.path(), "data", "nt");
        let mut dist =
            RoundRobinDistributor::new(crate::destination::FileDestinations::new(layout), 1)
                .unwrap();
        dist.submit("a").await.unwrap();
        dist.submit("b").await.unwrap();
        drop(dist);

        let written = std::fs::read_to_string(dir.path().join("data-1.nt")).unwrap();
        assert_eq!(written, "a\nb\n");
    }
}
