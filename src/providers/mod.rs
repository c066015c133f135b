//! Providers Module - External Services
//!
//! Sentence-embedding backends for the ATS scorer.

pub mod embedding;

pub use embedding::*;
