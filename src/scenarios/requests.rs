//! Scenarios that issue HTTP requests through a [`Fetcher`].

use std::time::Duration;

use serde::Serialize;

use crate::http::{FetchOptions, Fetcher, HttpClient};
use crate::ops::types::{OpResult, Outcome};
use crate::ops::{Operation, Scope};
use crate::wait::{
    as_completed, drain_windowed, gather, wait, wait_all, BatchSummary, DrainReport, ReturnWhen,
};

/// A request that produced a status outside 2xx.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NonSuccess {
    pub index: usize,
    pub status: u16,
}

/// Partial-success report over a batch of requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GatherReport {
    pub summary: BatchSummary,
    pub statuses: Vec<u16>,
    pub non_success: Vec<NonSuccess>,
    pub errors: Vec<String>,
}

impl GatherReport {
    pub fn from_outcomes(outcomes: &[Outcome<u16>]) -> Self {
        let mut report = Self {
            summary: BatchSummary::from_outcomes(outcomes),
            ..Self::default()
        };

        for (index, outcome) in outcomes.iter().enumerate() {
            match outcome {
                Outcome::Completed(status) => {
                    report.statuses.push(*status);
                    if !(200..300).contains(status) {
                        report.non_success.push(NonSuccess {
                            index,
                            status: *status,
                        });
                    }
                }
                Outcome::Failed(e) => report.errors.push(format!("request {}: {}", index, e)),
                Outcome::Cancelled => report.errors.push(format!("request {}: cancelled", index)),
            }
        }
        report
    }

    /// Requests that errored or returned a non-2xx status.
    pub fn failed_requests(&self) -> usize {
        self.non_success.len() + self.summary.failed + self.summary.cancelled
    }
}

/// Fetch every URL concurrently and report successes and failures together.
pub async fn gather_statuses<C>(fetcher: &Fetcher<C>, scope: &Scope, urls: &[String]) -> GatherReport
where
    C: HttpClient + 'static,
{
    let ops: Vec<Operation<u16>> = urls
        .iter()
        .map(|url| fetcher.spawn(scope, url, FetchOptions::new()))
        .collect();

    let report = GatherReport::from_outcomes(&gather(&ops).await);
    tracing::info!(
        total = report.summary.total,
        failed = report.failed_requests(),
        "Completed batch"
    );
    report
}

/// Result of [`wait_all_with_errors`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WaitAllReport {
    pub done: usize,
    pub pending: usize,
    pub statuses: Vec<u16>,
    pub errors: Vec<String>,
}

/// Wait for every request, then read errors and values off the done set.
///
/// Unlike [`gather_statuses`], results are grouped by outcome rather than
/// listed in submission order.
pub async fn wait_all_with_errors<C>(fetcher: &Fetcher<C>, scope: &Scope, urls: &[String]) -> WaitAllReport
where
    C: HttpClient + 'static,
{
    let ops: Vec<Operation<u16>> = urls
        .iter()
        .map(|url| fetcher.spawn(scope, url, FetchOptions::new()))
        .collect();

    let partition = wait_all(ops).await;
    tracing::info!(done = partition.done.len(), pending = partition.pending.len(), "Wait returned");

    let errors = partition
        .failed()
        .into_iter()
        .map(|(id, e)| {
            tracing::error!(operation_id = %id, error = %e, "Request got an exception");
            e.to_string()
        })
        .collect();

    WaitAllReport {
        done: partition.done.len(),
        pending: partition.pending.len(),
        statuses: partition.succeeded(),
        errors,
    }
}

/// Result of [`first_exception`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FirstExceptionReport {
    pub done: usize,
    pub pending: usize,
    pub statuses: Vec<u16>,
    pub errors: Vec<String>,
    pub cancelled: usize,
}

/// Race a bad request against delayed good ones and stop at the first error.
///
/// Leftover requests are cancelled explicitly once the partition is in hand.
pub async fn first_exception<C>(
    fetcher: &Fetcher<C>,
    scope: &Scope,
    bad_url: &str,
    good_url: &str,
    good_delay: Duration,
) -> FirstExceptionReport
where
    C: HttpClient + 'static,
{
    let delayed = FetchOptions::new().with_delay(good_delay);
    let ops = vec![
        fetcher.spawn(scope, bad_url, FetchOptions::new()),
        fetcher.spawn(scope, good_url, delayed),
        fetcher.spawn(scope, good_url, delayed),
    ];

    let partition = wait(ops, ReturnWhen::FirstException, None).await;
    let mut report = FirstExceptionReport {
        done: partition.done.len(),
        pending: partition.pending.len(),
        ..FirstExceptionReport::default()
    };
    tracing::info!(done = report.done, pending = report.pending, "First exception wait returned");

    for op in &partition.done {
        match op.outcome() {
            Some(Outcome::Completed(status)) => report.statuses.push(status),
            Some(Outcome::Failed(e)) => {
                tracing::error!(error = %e, "Request got an exception");
                report.errors.push(e.to_string());
            }
            _ => {}
        }
    }

    report.cancelled = partition.cancel_pending();
    report
}

/// Fetch `url` `count` times with at most `window` requests in flight.
pub async fn drain_statuses<C>(
    fetcher: &Fetcher<C>,
    scope: &Scope,
    url: &str,
    count: usize,
    window: usize,
) -> DrainReport<u16>
where
    C: HttpClient + 'static,
{
    let jobs = (0..count).map(|_| {
        let fetcher = fetcher.clone();
        let url = url.to_string();
        async move { fetcher.fetch(&url, FetchOptions::new()).await }
    });

    drain_windowed(scope, "fetch", window, jobs, |op| {
        tracing::info!(operation_id = %op.id(), outcome = ?op.outcome(), "Request drained");
    })
    .await
}

/// Result of [`as_completed_statuses`].
#[derive(Debug)]
pub struct AsCompletedReport {
    /// One entry per pull, in completion order.
    pub results: Vec<OpResult<u16>>,
    /// Requests still unobserved when the overall deadline passed.
    pub unfinished: Vec<Operation<u16>>,
}

/// Pull request results in completion order under one overall deadline.
pub async fn as_completed_statuses<C>(
    fetcher: &Fetcher<C>,
    scope: &Scope,
    requests: &[(String, FetchOptions)],
    overall: Duration,
) -> AsCompletedReport
where
    C: HttpClient + 'static,
{
    let ops: Vec<Operation<u16>> = requests
        .iter()
        .map(|(url, options)| fetcher.spawn(scope, url, *options))
        .collect();

    let mut completed = as_completed(ops, Some(overall));
    let mut results = Vec::new();
    while let Some(next) = completed.next().await {
        let result = match next {
            Ok(op) => op.result().await,
            Err(e) => Err(e),
        };
        match &result {
            Ok(status) => tracing::info!(status, "Request finished"),
            Err(e) if e.is_timeout() => tracing::warn!(error = %e, "We got a timeout error"),
            Err(e) => tracing::warn!(error = %e, "Request failed"),
        }
        results.push(result);
    }

    let unfinished = completed.unfinished();
    if !unfinished.is_empty() {
        tracing::info!(unfinished = unfinished.len(), "Requests still running after deadline");
    }
    AsCompletedReport { results, unfinished }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::types::OpError;
    use std::future::Future;

    /// Answers 200 for `/ok`, 500 for `/boom`, after `latency`.
    struct PathClient {
        latency: Duration,
    }

    impl HttpClient for PathClient {
        fn get(&self, url: &str, _timeout: Option<Duration>) -> impl Future<Output = OpResult<u16>> + Send {
            let status = if url.ends_with("/boom") { 500 } else { 200 };
            let latency = self.latency;
            async move {
                tokio::time::sleep(latency).await;
                Ok(status)
            }
        }
    }

    fn fetcher(latency_ms: u64) -> Fetcher<PathClient> {
        Fetcher::new(PathClient {
            latency: Duration::from_millis(latency_ms),
        })
    }

    #[tokio::test]
    async fn test_gather_counts_failures_without_aborting() {
        let scope = Scope::new();
        let urls: Vec<String> = vec![
            "http://localhost/ok".into(),
            "python://localhost/ok".into(),
            "http://localhost/boom".into(),
            "http://localhost/ok".into(),
        ];

        let report = gather_statuses(&fetcher(5), &scope, &urls).await;

        assert_eq!(report.summary.total, 4);
        assert_eq!(report.summary.completed, 3);
        assert_eq!(report.summary.failed, 1);
        assert_eq!(report.non_success, vec![NonSuccess { index: 2, status: 500 }]);
        assert_eq!(report.failed_requests(), 2);
        assert!(report.errors[0].starts_with("request 1:"));
    }

    #[tokio::test]
    async fn test_wait_all_groups_errors_and_values() {
        let scope = Scope::new();
        let urls: Vec<String> = vec!["http://localhost/ok".into(), "python://bad".into()];

        let report = wait_all_with_errors(&fetcher(5), &scope, &urls).await;

        assert_eq!(report.done, 2);
        assert_eq!(report.pending, 0);
        assert_eq!(report.statuses, vec![200]);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].contains("python"));
    }

    #[tokio::test]
    async fn test_first_exception_cancels_leftovers() {
        let scope = Scope::new();
        let report = first_exception(
            &fetcher(5),
            &scope,
            "python://bad.com",
            "http://localhost/ok",
            Duration::from_millis(500),
        )
        .await;

        assert_eq!(report.done, 1);
        assert_eq!(report.pending, 2);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.cancelled, 2);
    }

    #[tokio::test]
    async fn test_drain_statuses() {
        let scope = Scope::new();
        let report = drain_statuses(&fetcher(5), &scope, "http://localhost/ok", 5, 3).await;

        assert_eq!(report.completed.len(), 5);
        assert!(report.peak_in_flight <= 3);
        assert!(report.summary().all_succeeded());
    }

    #[tokio::test]
    async fn test_as_completed_statuses() {
        let scope = Scope::new();
        let requests = vec![
            ("http://localhost/ok".to_string(), FetchOptions::new().with_delay(Duration::from_secs(2))),
            (
                "http://localhost/ok".to_string(),
                FetchOptions::new().with_delay(Duration::from_millis(10)).with_timeout(Duration::from_millis(1)),
            ),
            ("http://localhost/ok".to_string(), FetchOptions::new()),
        ];

        let report = as_completed_statuses(&fetcher(20), &scope, &requests, Duration::from_millis(150)).await;

        assert_eq!(report.results.len(), 3);
        assert!(matches!(report.results[0], Err(OpError::Timeout(d)) if d == Duration::from_millis(1)));
        assert_eq!(report.results[1], Ok(200));
        assert!(matches!(report.results[2], Err(OpError::Timeout(d)) if d == Duration::from_millis(150)));
        assert_eq!(report.unfinished.len(), 1);
        scope.cancel_all();
    }
}
