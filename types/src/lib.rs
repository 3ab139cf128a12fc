//! Fundamental types for fundgov.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! account and proposal names, token symbols, asset amounts, timestamps and the
//! governance parameter record.

pub mod asset;
pub mod error;
pub mod name;
pub mod params;
pub mod time;

pub use asset::{Asset, Symbol};
pub use error::TypesError;
pub use name::Name;
pub use params::GovernanceParams;
pub use time::{Timestamp, SECS_PER_DAY};
