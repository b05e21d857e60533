//! Core types and trait definitions for the manor house registry.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

pub mod error;
pub mod house;
pub mod page;
pub mod patch;
pub mod person;
pub mod relation;
pub mod store;
pub mod time;

pub use error::{Error, Result};
