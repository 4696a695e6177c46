//! Bounded best-effort fan-out
//!
//! Runs independent jobs concurrently and joins every one of them. A failing,
//! panicking or timed-out job becomes a failed outcome for that job only; its
//! siblings keep running.

use crate::error::{AgentError, Result};
use agentmesh_config::{CoordinatorSettings, RegistrySettings};
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Configuration for the fan-out executor
#[derive(Debug, Clone)]
pub struct FanOutConfig {
    /// Maximum number of jobs running at once
    pub max_concurrency: usize,
    /// Per-job timeout in milliseconds; `None` waits indefinitely
    pub timeout_ms: Option<u64>,
}

impl Default for FanOutConfig {
    fn default() -> Self {
        Self {
            max_concurrency: 8,
            timeout_ms: None,
        }
    }
}

impl From<&RegistrySettings> for FanOutConfig {
    fn from(settings: &RegistrySettings) -> Self {
        Self {
            max_concurrency: settings.max_concurrency.max(1),
            timeout_ms: settings.init_timeout_ms,
        }
    }
}

impl From<&CoordinatorSettings> for FanOutConfig {
    fn from(settings: &CoordinatorSettings) -> Self {
        Self {
            max_concurrency: settings.max_concurrency.max(1),
            timeout_ms: settings.init_timeout_ms,
        }
    }
}

/// Outcome of one fanned-out job
#[derive(Debug, Clone)]
pub struct FanOutOutcome<T> {
    /// Caller-supplied key identifying the job
    pub key: String,
    /// Job result
    pub result: Result<T>,
    /// Wall time in milliseconds
    pub duration_ms: u64,
}

impl<T> FanOutOutcome<T> {
    /// Whether the job succeeded
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Fan-out executor
#[derive(Debug, Clone, Default)]
pub struct FanOutExecutor {
    config: FanOutConfig,
}

impl FanOutExecutor {
    /// Create an executor with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an executor with custom configuration
    pub fn with_config(config: FanOutConfig) -> Self {
        Self { config }
    }

    /// Get the current configuration
    pub fn config(&self) -> &FanOutConfig {
        &self.config
    }

    /// Run every job and return one outcome per job, in input order
    pub async fn run<T, Fut>(&self, jobs: Vec<(String, Fut)>) -> Vec<FanOutOutcome<T>>
    where
        T: Send + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        info!(
            job_count = jobs.len(),
            max_concurrency = self.config.max_concurrency,
            "Starting fan-out"
        );

        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrency.max(1)));
        let timeout_ms = self.config.timeout_ms;
        let mut handles = Vec::with_capacity(jobs.len());

        for (key, job) in jobs {
            let semaphore = semaphore.clone();
            let job_key = key.clone();

            let handle = tokio::spawn(async move {
                let _permit = semaphore.acquire_owned().await;
                debug!(key = %job_key, "Job started");
                let start = Instant::now();

                let result = match timeout_ms {
                    Some(ms) => match timeout(Duration::from_millis(ms), job).await {
                        Ok(result) => result,
                        Err(_) => Err(AgentError::timeout(ms)),
                    },
                    None => job.await,
                };

                (result, start.elapsed().as_millis() as u64)
            });

            handles.push((key, handle));
        }

        let mut outcomes = Vec::with_capacity(handles.len());
        for (key, handle) in handles {
            let (result, duration_ms) = match handle.await {
                Ok(joined) => joined,
                Err(e) => (Err(AgentError::internal(format!("job panicked: {}", e))), 0),
            };

            if let Err(e) = &result {
                warn!(key = %key, error = %e, duration_ms = duration_ms, "Job failed");
            }
            outcomes.push(FanOutOutcome {
                key,
                result,
                duration_ms,
            });
        }

        info!(
            completed_count = outcomes.len(),
            success_count = outcomes.iter().filter(|o| o.is_ok()).count(),
            "Fan-out completed"
        );

        outcomes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::pin::Pin;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_all_jobs_succeed_in_input_order() {
        let executor = FanOutExecutor::new();
        let jobs: Vec<(String, _)> = (0..4)
            .map(|i| {
                (format!("job-{}", i), async move {
                    tokio::time::sleep(Duration::from_millis(10 * (4 - i))).await;
                    Ok::<_, AgentError>(i)
                })
            })
            .collect();

        let outcomes = executor.run(jobs).await;
        let keys: Vec<&str> = outcomes.iter().map(|o| o.key.as_str()).collect();
        assert_eq!(keys, vec!["job-0", "job-1", "job-2", "job-3"]);
        assert!(outcomes.iter().all(|o| o.is_ok()));
    }

    type BoxJob<T> = Pin<Box<dyn Future<Output = Result<T>> + Send>>;

    fn boxed<T, F>(fut: F) -> BoxJob<T>
    where
        F: Future<Output = Result<T>> + Send + 'static,
    {
        Box::pin(fut)
    }

    #[tokio::test]
    async fn test_failure_is_isolated() {
        let executor = FanOutExecutor::new();
        let jobs: Vec<(String, BoxJob<i32>)> = vec![
            ("ok".to_string(), boxed(async { Ok(1) })),
            ("bad".to_string(), boxed(async { Err(AgentError::execution_failed("boom")) })),
            ("ok2".to_string(), boxed(async { Ok(2) })),
        ];

        let outcomes = executor.run(jobs).await;
        assert!(outcomes[0].is_ok());
        assert!(!outcomes[1].is_ok());
        assert!(outcomes[2].is_ok());
    }

    #[tokio::test]
    async fn test_panic_is_isolated() {
        let executor = FanOutExecutor::new();
        let jobs: Vec<(String, BoxJob<()>)> = vec![
            (
                "panics".to_string(),
                boxed(async {
                    if true {
                        panic!("job exploded");
                    }
                    Ok(())
                }),
            ),
            ("fine".to_string(), boxed(async { Ok(()) })),
        ];

        let outcomes = executor.run(jobs).await;
        assert!(matches!(outcomes[0].result, Err(AgentError::Internal(_))));
        assert!(outcomes[1].is_ok());
    }

    #[tokio::test]
    async fn test_timeout_marks_job_failed() {
        let executor = FanOutExecutor::with_config(FanOutConfig {
            max_concurrency: 2,
            timeout_ms: Some(20),
        });
        let jobs = vec![(
            "slow".to_string(),
            async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok::<_, AgentError>(())
            },
        )];

        let outcomes = executor.run(jobs).await;
        assert!(matches!(outcomes[0].result, Err(AgentError::Timeout(20))));
    }

    #[tokio::test]
    async fn test_respects_concurrency_limit() {
        let executor = FanOutExecutor::with_config(FanOutConfig {
            max_concurrency: 2,
            timeout_ms: None,
        });
        let running = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let jobs: Vec<(String, _)> = (0..6)
            .map(|i| {
                let running = running.clone();
                let peak = peak.clone();
                (format!("job-{}", i), async move {
                    let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(10)).await;
                    running.fetch_sub(1, Ordering::SeqCst);
                    Ok::<_, AgentError>(())
                })
            })
            .collect();

        let outcomes = executor.run(jobs).await;
        assert_eq!(outcomes.len(), 6);
        assert!(peak.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn test_empty_jobs() {
        let executor = FanOutExecutor::new();
        let jobs: Vec<(String, std::future::Ready<Result<()>>)> = Vec::new();
        assert!(executor.run(jobs).await.is_empty());
    }

    #[test]
    fn test_config_from_settings() {
        let settings = RegistrySettings {
            max_concurrency: 0,
            init_timeout_ms: Some(100),
        };
        let config = FanOutConfig::from(&settings);
        assert_eq!(config.max_concurrency, 1);
        assert_eq!(config.timeout_ms, Some(100));
    }
}
