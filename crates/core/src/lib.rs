//! `planwise-core` — domain building blocks for production planning.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod error;
pub mod id;
pub mod period;
pub mod value_object;

pub use error::{DomainError, DomainResult, ensure_observations};
pub use id::{ForecastId, ItemId};
pub use period::{Granularity, Period};
pub use value_object::ValueObject;
