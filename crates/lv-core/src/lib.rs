//! # lv-core
//!
//! Core types, traits, and utilities for ledgerview.
//!
//! This crate provides the foundational building blocks used by the table
//! engine and the command line front-end:
//! - Common error types
//! - Result type alias and the upstream response envelope
//! - The record model (`Record`, `FieldValue`)
//! - Seams for time and data sources (`Clock`, `RecordSource`)
//! - Configuration types

pub mod error;
pub mod result;
pub mod traits;
pub mod types;
pub mod config;

pub use error::*;
pub use result::*;
pub use traits::*;
pub use types::*;
