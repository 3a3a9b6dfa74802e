//! # annokit Core
//!
//! Shared error taxonomy and measurement helpers used by every annokit crate.

pub mod error;
pub mod units;

pub use error::{AnnotationError, Error, Result};
pub use units::{round_to, MeasurementUnit, DEFAULT_DECIMALS, MAX_DECIMALS};
