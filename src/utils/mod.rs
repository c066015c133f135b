//! Utils Module - Helper Functions & Shared Utilities
//!
//! Shared helpers used across the application.

pub mod cache;
pub mod constants;
pub mod ignore_list;
pub mod telemetry;
pub mod text;

pub use cache::*;
pub use constants::*;
pub use ignore_list::*;
pub use telemetry::*;
pub use text::*;
