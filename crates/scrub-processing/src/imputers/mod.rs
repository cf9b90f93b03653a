//! Imputation module for handling missing values.
//!
//! The resolver picks one strategy per column from its declared type:
//! - Median for numeric columns
//! - Forward then backward fill for temporal columns
//! - Mode for categorical and text columns

mod statistical;

pub use statistical::{MissingValueResolver, ResolveOutcome};
