//! Shared primitives for the workforce management system.
//!
//! This crate has zero internal dependencies so it can be consumed by the
//! persistence layer, services, and any future CLI tooling alike.

pub mod audit;
pub mod error;
pub mod types;
