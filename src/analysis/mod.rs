//! Lexical analysis of job postings: keyword extraction, language
//! classification and employer-context derivation.

pub mod context;
pub mod keywords;
pub mod language;

pub use context::JobContext;
pub use keywords::{KeywordExtractor, Vocabulary};
pub use language::{Language, StatisticalDetector};
