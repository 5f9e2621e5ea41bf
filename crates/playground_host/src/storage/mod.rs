//! Key-value storage contracts, failure taxonomy, and in-process adapters.

pub mod error;
pub mod key_value;
