//! Resilient service invocation
//!
//! The sole path through which the orchestration engine reaches external
//! collaborators. Every call is gated by the service's circuit breaker and
//! its outcome is fed back into the breaker, so concurrent simulations
//! contend correctly on the shared failure/success counters.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;

use super::circuit_breaker::CircuitBreakerRegistry;

/// Failure modes of a resilient call
#[derive(Debug, Error)]
pub enum InvocationError {
    /// The service name is not in the ecosystem catalog
    #[error("service '{service}' is not in the ecosystem catalog")]
    UnknownService { service: String },

    /// The breaker rejected the call; the collaborator was never invoked
    #[error("circuit for '{service}' is open, call rejected")]
    CircuitOpen { service: String },

    /// The collaborator was invoked and failed
    #[error("call to {service}::{operation} failed after {elapsed_ms}ms: {source}")]
    CallFailed {
        service: String,
        operation: String,
        elapsed_ms: u64,
        #[source]
        source: anyhow::Error,
    },
}

impl InvocationError {
    /// True when the failure was a breaker rejection rather than a real call
    pub fn is_circuit_open(&self) -> bool {
        matches!(self, Self::CircuitOpen { .. })
    }
}

/// Wraps collaborator calls with their per-service circuit breaker
pub struct ResilientInvoker {
    registry: Arc<CircuitBreakerRegistry>,
}

impl ResilientInvoker {
    pub fn new(registry: Arc<CircuitBreakerRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &CircuitBreakerRegistry {
        &self.registry
    }

    /// Run `call` against `service`, reporting the outcome to its breaker
    ///
    /// When the breaker is open and not yet eligible for a half-open probe
    /// the call fails fast: `call` is never constructed into a running
    /// future and no latency is incurred.
    pub async fn invoke<T, F, Fut>(
        &self,
        service: &str,
        operation: &str,
        call: F,
    ) -> Result<T, InvocationError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<T>>,
    {
        let breaker = self
            .registry
            .breaker(service)
            .ok_or_else(|| InvocationError::UnknownService {
                service: service.to_string(),
            })?;

        if !breaker.try_acquire() {
            tracing::debug!(service, operation, "circuit open, failing fast");
            return Err(InvocationError::CircuitOpen {
                service: service.to_string(),
            });
        }

        let started = Instant::now();
        match call().await {
            Ok(value) => {
                breaker.on_success();
                tracing::debug!(
                    service,
                    operation,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "call succeeded"
                );
                Ok(value)
            }
            Err(source) => {
                breaker.on_failure();
                let elapsed_ms = started.elapsed().as_millis() as u64;
                tracing::warn!(service, operation, elapsed_ms, error = %source, "call failed");
                Err(InvocationError::CallFailed {
                    service: service.to_string(),
                    operation: operation.to_string(),
                    elapsed_ms,
                    source,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::resilience::circuit_breaker::CircuitBreakerConfig;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    fn invoker(failure_threshold: u32, recovery_ms: u64) -> ResilientInvoker {
        let registry = CircuitBreakerRegistry::with_breakers([(
            "flaky".to_string(),
            CircuitBreakerConfig {
                failure_threshold,
                recovery_timeout: Duration::from_millis(recovery_ms),
                success_threshold: 1,
            },
        )]);
        ResilientInvoker::new(Arc::new(registry))
    }

    #[tokio::test]
    async fn unknown_service_is_rejected() {
        let invoker = invoker(2, 100);
        let result = invoker
            .invoke("unlisted", "op", || async { Ok::<_, anyhow::Error>(1) })
            .await;
        assert!(matches!(result, Err(InvocationError::UnknownService { .. })));
    }

    #[tokio::test]
    async fn open_circuit_never_reaches_the_collaborator() {
        let invoker = invoker(2, 60_000);
        let calls = AtomicU32::new(0);

        for _ in 0..2 {
            let result = invoker
                .invoke("flaky", "op", || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err::<u32, _>(anyhow::anyhow!("boom"))
                })
                .await;
            assert!(matches!(result, Err(InvocationError::CallFailed { .. })));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        let result = invoker
            .invoke("flaky", "op", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<u32, anyhow::Error>(1)
            })
            .await;
        assert!(matches!(result, Err(InvocationError::CircuitOpen { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn recovery_admits_exactly_one_probe_then_closes() {
        let invoker = invoker(2, 50);
        let calls = AtomicU32::new(0);

        for _ in 0..2 {
            let _ = invoker
                .invoke("flaky", "op", || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err::<u32, _>(anyhow::anyhow!("boom"))
                })
                .await;
        }

        tokio::time::sleep(Duration::from_millis(80)).await;

        let result = invoker
            .invoke("flaky", "op", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<u32, anyhow::Error>(7)
            })
            .await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 3);

        // Closed again: the next call goes straight through.
        let result = invoker
            .invoke("flaky", "op", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<u32, anyhow::Error>(8)
            })
            .await;
        assert_eq!(result.unwrap(), 8);
    }
}
