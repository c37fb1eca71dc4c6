//! Shared test utilities for serrs integration harnesses.
//!
//! Import everything you need via `mod common; use common::*;` at the top of
//! each harness file. Every fixture uses a fixed timestamp so rendered output
//! is byte-for-byte deterministic.

pub mod assertions;
pub mod builders;
pub mod fixtures;

pub use assertions::*;
pub use builders::*;
pub use fixtures::*;
