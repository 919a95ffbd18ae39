//! Resilience - Circuit breakers guarding every outbound call

mod circuit_breaker;
mod invoker;

pub use circuit_breaker::{
    BreakerStatus, CircuitBreaker, CircuitBreakerConfig, CircuitBreakerRegistry, CircuitState,
};
pub use invoker::{InvocationError, ResilientInvoker};
