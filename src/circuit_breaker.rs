//! # Circuit Breaker Module
//!
//! Circuit breaker guarding remote sync operations. When pushes to the
//! document store fail repeatedly, the breaker opens and sync attempts fail
//! fast instead of hammering an endpoint that is already down.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::sync_config::RecoveryConfig;

#[derive(Debug, Default)]
struct BreakerState {
    failure_count: u32,
    last_failure_time: Option<Instant>,
}

/// Circuit breaker for remote sync operations
///
/// # State Machine
///
/// - **Closed**: normal operation, requests pass through
/// - **Open**: failure threshold exceeded, requests fail fast
/// - After the reset timeout the breaker closes again and the next request
///   is allowed through as the recovery probe
///
/// Thresholds come from [`RecoveryConfig`]: `circuit_breaker_threshold`
/// failures open the circuit, `circuit_breaker_reset_secs` later it closes.
#[derive(Debug)]
pub struct CircuitBreaker {
    state: Mutex<BreakerState>,
    config: RecoveryConfig,
}

impl CircuitBreaker {
    /// Create a new circuit breaker with the given configuration
    pub fn new(config: RecoveryConfig) -> Self {
        Self {
            state: Mutex::new(BreakerState::default()),
            config,
        }
    }

    /// Check if the circuit is open (blocking requests).
    ///
    /// Returns `true` while the failure count has reached the threshold and
    /// the reset timeout has not yet elapsed. Once it elapses the breaker
    /// resets itself to closed.
    pub fn is_open(&self) -> bool {
        let mut state = self.state.lock().unwrap();

        if state.failure_count >= self.config.circuit_breaker_threshold {
            if let Some(last_time) = state.last_failure_time {
                if last_time.elapsed() < Duration::from_secs(self.config.circuit_breaker_reset_secs)
                {
                    return true;
                }
                // Reset window elapsed, allow traffic again
                state.failure_count = 0;
                state.last_failure_time = None;
            }
        }
        false
    }

    /// Record a failed sync operation.
    pub fn record_failure(&self) {
        let mut state = self.state.lock().unwrap();
        state.failure_count += 1;
        state.last_failure_time = Some(Instant::now());
    }

    /// Record a successful sync operation, closing the circuit.
    pub fn record_success(&self) {
        let mut state = self.state.lock().unwrap();
        state.failure_count = 0;
        state.last_failure_time = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick_config() -> RecoveryConfig {
        RecoveryConfig {
            circuit_breaker_threshold: 2,
            circuit_breaker_reset_secs: 60,
            ..RecoveryConfig::default()
        }
    }

    #[test]
    fn test_breaker_starts_closed() {
        let breaker = CircuitBreaker::new(quick_config());
        assert!(!breaker.is_open());
    }

    #[test]
    fn test_breaker_opens_at_threshold() {
        let breaker = CircuitBreaker::new(quick_config());
        breaker.record_failure();
        assert!(!breaker.is_open());
        breaker.record_failure();
        assert!(breaker.is_open());
    }

    #[test]
    fn test_success_closes_breaker() {
        let breaker = CircuitBreaker::new(quick_config());
        breaker.record_failure();
        breaker.record_failure();
        assert!(breaker.is_open());

        breaker.record_success();
        assert!(!breaker.is_open());
    }
}
