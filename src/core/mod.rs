//! Core Module - ATS Scoring Engine
//!
//! Section, keyword, formatting and context heuristics, the embedding
//! scorer, resume insights and batch scoring.

pub mod ats_score;
pub mod batch;
pub mod context;
pub mod formatting;
pub mod insights;
pub mod keywords;
pub mod scorer;
pub mod sections;

pub use ats_score::*;
pub use batch::*;
pub use context::*;
pub use formatting::*;
pub use insights::*;
pub use keywords::*;
pub use scorer::*;
pub use sections::*;
