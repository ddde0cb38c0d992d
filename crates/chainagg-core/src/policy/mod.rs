//! Policy engine: composable reliability wrappers around async operations.
//!
//! The policy stack (applied in order):
//! ```text
//! Request → [ExponentialRetry] → [RateLimiter] → [Transport]
//! ```
//!
//! Both policies are generic over plain async closures; [`layers`] adapts
//! them to [`CallTransport`](crate::CallTransport).

pub mod layers;
pub mod rate_limiter;
pub mod retry;

pub use layers::{RateLimitedTransport, RetryTransport};
pub use rate_limiter::{RateLimited, RateLimiter, RateLimiterConfig};
pub use retry::{ExponentialRetry, RetryConfig};
