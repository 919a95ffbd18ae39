//! Per-service circuit breakers
//!
//! One breaker guards each ecosystem service. Breakers live for the process
//! lifetime, are shared by every concurrently running simulation, and are
//! never persisted; a restart resets them to CLOSED.
//!
//! State machine:
//! - CLOSED: calls pass through. A success resets the failure counter; once
//!   failures reach `failure_threshold` the breaker opens.
//! - OPEN: calls are rejected without touching the service until
//!   `recovery_timeout` has elapsed since the last failure, at which point
//!   the next caller is admitted as a half-open probe.
//! - HALF_OPEN: a single probe is in flight at a time. Successes accumulate;
//!   at `success_threshold` the breaker closes and resets its counters. Any
//!   failure re-opens it immediately.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::domain::value_objects::{CriticalityTier, ServiceDescriptor};

/// Breaker states, as observed through `status()`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CircuitState {
    Closed,
    Open,
    HalfOpen,
}

impl CircuitState {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Closed => "closed",
            Self::Open => "open",
            Self::HalfOpen => "half_open",
        }
    }
}

/// Thresholds and timeouts for one breaker
#[derive(Debug, Clone)]
pub struct CircuitBreakerConfig {
    /// Consecutive failures in CLOSED before opening
    pub failure_threshold: u32,
    /// How long an open breaker waits before admitting a probe
    pub recovery_timeout: Duration,
    /// Probe successes required to close again
    pub success_threshold: u32,
}

impl CircuitBreakerConfig {
    /// Defaults for services on the main simulation path: fail fast,
    /// recover fast
    pub fn critical() -> Self {
        Self {
            failure_threshold: 3,
            recovery_timeout: Duration::from_secs(15),
            success_threshold: 1,
        }
    }

    /// Defaults for auxiliary services: tolerate more noise before opening
    pub fn best_effort() -> Self {
        Self {
            failure_threshold: 5,
            recovery_timeout: Duration::from_secs(60),
            success_threshold: 2,
        }
    }

    pub fn for_tier(tier: CriticalityTier) -> Self {
        match tier {
            CriticalityTier::Critical => Self::critical(),
            CriticalityTier::BestEffort => Self::best_effort(),
        }
    }
}

/// Snapshot of a breaker for the operational API
#[derive(Debug, Clone, Serialize)]
pub struct BreakerStatus {
    pub service: String,
    pub state: CircuitState,
    pub failure_count: u32,
    pub success_count: u32,
    /// Seconds since the breaker last recorded a failure
    pub seconds_since_last_failure: Option<u64>,
}

#[derive(Debug)]
struct BreakerInner {
    state: CircuitState,
    failure_count: u32,
    success_count: u32,
    last_failure_at: Option<Instant>,
    /// A half-open probe is currently in flight
    probe_in_flight: bool,
}

/// Circuit breaker for one named external service
#[derive(Debug)]
pub struct CircuitBreaker {
    service: String,
    config: CircuitBreakerConfig,
    inner: Mutex<BreakerInner>,
}

impl CircuitBreaker {
    pub fn new(service: impl Into<String>, config: CircuitBreakerConfig) -> Self {
        Self {
            service: service.into(),
            config,
            inner: Mutex::new(BreakerInner {
                state: CircuitState::Closed,
                failure_count: 0,
                success_count: 0,
                last_failure_at: None,
                probe_in_flight: false,
            }),
        }
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    /// Decide whether a call may proceed right now
    ///
    /// An admitted caller MUST report the outcome through `on_success` or
    /// `on_failure`; a half-open probe slot stays taken until it does.
    pub fn try_acquire(&self) -> bool {
        let mut inner = self.lock();
        match inner.state {
            CircuitState::Closed => true,
            CircuitState::Open => {
                let recovered = inner
                    .last_failure_at
                    .map(|at| at.elapsed() >= self.config.recovery_timeout)
                    .unwrap_or(true);
                if recovered {
                    inner.state = CircuitState::HalfOpen;
                    inner.probe_in_flight = true;
                    true
                } else {
                    false
                }
            }
            CircuitState::HalfOpen => {
                if inner.probe_in_flight {
                    false
                } else {
                    inner.probe_in_flight = true;
                    true
                }
            }
        }
    }

    /// Record a successful call
    pub fn on_success(&self) {
        let mut inner = self.lock();
        match inner.state {
            CircuitState::Closed => {
                inner.failure_count = 0;
            }
            CircuitState::HalfOpen => {
                inner.probe_in_flight = false;
                inner.success_count += 1;
                if inner.success_count >= self.config.success_threshold {
                    tracing::info!(service = %self.service, "circuit closed after recovery");
                    inner.state = CircuitState::Closed;
                    inner.failure_count = 0;
                    inner.success_count = 0;
                }
            }
            // A success reported after the breaker re-opened carries no
            // signal worth acting on.
            CircuitState::Open => {}
        }
    }

    /// Record a failed call
    pub fn on_failure(&self) {
        let mut inner = self.lock();
        match inner.state {
            CircuitState::Closed => {
                inner.failure_count += 1;
                if inner.failure_count >= self.config.failure_threshold {
                    tracing::warn!(
                        service = %self.service,
                        failures = inner.failure_count,
                        "circuit opened"
                    );
                    inner.state = CircuitState::Open;
                    inner.last_failure_at = Some(Instant::now());
                }
            }
            CircuitState::HalfOpen => {
                tracing::warn!(service = %self.service, "probe failed, circuit re-opened");
                inner.state = CircuitState::Open;
                inner.probe_in_flight = false;
                inner.success_count = 0;
                inner.last_failure_at = Some(Instant::now());
            }
            CircuitState::Open => {
                inner.last_failure_at = Some(Instant::now());
            }
        }
    }

    /// Operational override: force the breaker back to CLOSED
    pub fn reset(&self) {
        let mut inner = self.lock();
        inner.state = CircuitState::Closed;
        inner.failure_count = 0;
        inner.success_count = 0;
        inner.last_failure_at = None;
        inner.probe_in_flight = false;
    }

    pub fn status(&self) -> BreakerStatus {
        let inner = self.lock();
        BreakerStatus {
            service: self.service.clone(),
            state: inner.state,
            failure_count: inner.failure_count,
            success_count: inner.success_count,
            seconds_since_last_failure: inner.last_failure_at.map(|at| at.elapsed().as_secs()),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BreakerInner> {
        // Counter updates never panic while holding the lock.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// All breakers for this process, one per catalog entry
///
/// Built once at startup and passed explicitly to whoever needs it; there is
/// no global registry.
pub struct CircuitBreakerRegistry {
    breakers: HashMap<String, Arc<CircuitBreaker>>,
}

impl CircuitBreakerRegistry {
    /// Build a registry with tier defaults from the service catalog
    pub fn from_catalog(catalog: &[ServiceDescriptor]) -> Self {
        let breakers = catalog
            .iter()
            .map(|descriptor| {
                let config = CircuitBreakerConfig::for_tier(descriptor.tier);
                (
                    descriptor.name.to_string(),
                    Arc::new(CircuitBreaker::new(descriptor.name, config)),
                )
            })
            .collect();
        Self { breakers }
    }

    /// Build a registry with an explicit config per service (used by tests
    /// and specialized deployments)
    pub fn with_breakers(
        entries: impl IntoIterator<Item = (String, CircuitBreakerConfig)>,
    ) -> Self {
        let breakers = entries
            .into_iter()
            .map(|(name, config)| {
                let breaker = Arc::new(CircuitBreaker::new(name.clone(), config));
                (name, breaker)
            })
            .collect();
        Self { breakers }
    }

    pub fn breaker(&self, service: &str) -> Option<Arc<CircuitBreaker>> {
        self.breakers.get(service).cloned()
    }

    /// Snapshot every breaker, sorted by service name
    pub fn statuses(&self) -> Vec<BreakerStatus> {
        let mut statuses: Vec<_> = self.breakers.values().map(|b| b.status()).collect();
        statuses.sort_by(|a, b| a.service.cmp(&b.service));
        statuses
    }

    /// Operational override: reset one breaker to CLOSED
    pub fn reset(&self, service: &str) -> bool {
        match self.breakers.get(service) {
            Some(breaker) => {
                breaker.reset();
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn breaker(failure_threshold: u32, recovery_ms: u64, success_threshold: u32) -> CircuitBreaker {
        CircuitBreaker::new(
            "test-service",
            CircuitBreakerConfig {
                failure_threshold,
                recovery_timeout: Duration::from_millis(recovery_ms),
                success_threshold,
            },
        )
    }

    #[test]
    fn opens_after_threshold_failures() {
        let breaker = breaker(3, 1000, 1);
        for _ in 0..2 {
            assert!(breaker.try_acquire());
            breaker.on_failure();
        }
        assert_eq!(breaker.status().state, CircuitState::Closed);

        assert!(breaker.try_acquire());
        breaker.on_failure();
        assert_eq!(breaker.status().state, CircuitState::Open);
        assert!(!breaker.try_acquire());
    }

    #[test]
    fn success_resets_failure_count_in_closed() {
        let breaker = breaker(2, 1000, 1);
        breaker.on_failure();
        breaker.on_success();
        breaker.on_failure();
        // Two non-consecutive failures never reach the threshold of 2.
        assert_eq!(breaker.status().state, CircuitState::Closed);
        assert_eq!(breaker.status().failure_count, 1);
    }

    #[test]
    fn admits_single_probe_after_recovery_timeout() {
        let breaker = breaker(1, 10, 1);
        breaker.on_failure();
        assert!(!breaker.try_acquire());

        std::thread::sleep(Duration::from_millis(20));
        assert!(breaker.try_acquire());
        assert_eq!(breaker.status().state, CircuitState::HalfOpen);
        // The probe slot is taken until the outcome is reported.
        assert!(!breaker.try_acquire());

        breaker.on_success();
        assert_eq!(breaker.status().state, CircuitState::Closed);
        assert!(breaker.try_acquire());
    }

    #[test]
    fn probe_failure_reopens_immediately() {
        let breaker = breaker(1, 10, 2);
        breaker.on_failure();
        std::thread::sleep(Duration::from_millis(20));
        assert!(breaker.try_acquire());
        breaker.on_success();
        assert_eq!(breaker.status().state, CircuitState::HalfOpen);
        assert_eq!(breaker.status().success_count, 1);

        assert!(breaker.try_acquire());
        breaker.on_failure();
        assert_eq!(breaker.status().state, CircuitState::Open);
        assert_eq!(breaker.status().success_count, 0);
        assert!(!breaker.try_acquire());
    }

    #[test]
    fn close_requires_success_threshold_probes() {
        let breaker = breaker(1, 10, 2);
        breaker.on_failure();
        std::thread::sleep(Duration::from_millis(20));

        assert!(breaker.try_acquire());
        breaker.on_success();
        assert_eq!(breaker.status().state, CircuitState::HalfOpen);
        assert!(breaker.try_acquire());
        breaker.on_success();
        assert_eq!(breaker.status().state, CircuitState::Closed);
    }

    #[test]
    fn reset_forces_closed() {
        let breaker = breaker(1, 60_000, 1);
        breaker.on_failure();
        assert!(!breaker.try_acquire());
        breaker.reset();
        assert_eq!(breaker.status().state, CircuitState::Closed);
        assert!(breaker.try_acquire());
    }

    #[test]
    fn registry_builds_from_catalog() {
        use crate::domain::value_objects::{ecosystem_catalog, services};
        let registry = CircuitBreakerRegistry::from_catalog(ecosystem_catalog());
        assert!(registry.breaker(services::DOCUMENT_GENERATOR).is_some());
        assert!(registry.breaker("no-such-service").is_none());
        assert_eq!(registry.statuses().len(), ecosystem_catalog().len());
    }

    #[test]
    fn registry_reset_targets_one_service() {
        use crate::domain::value_objects::{ecosystem_catalog, services};
        let registry = CircuitBreakerRegistry::from_catalog(ecosystem_catalog());
        let breaker = registry.breaker(services::DOCUMENT_GENERATOR).unwrap();
        for _ in 0..10 {
            breaker.on_failure();
        }
        assert_eq!(breaker.status().state, CircuitState::Open);
        assert!(registry.reset(services::DOCUMENT_GENERATOR));
        assert_eq!(breaker.status().state, CircuitState::Closed);
        assert!(!registry.reset("no-such-service"));
    }
}
