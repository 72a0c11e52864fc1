//! Core decision logic: profile adaptation and cover-letter composition.

pub mod adapter;
pub mod composer;

pub use adapter::{AdaptedProfile, ProfileAdapter};
pub use composer::{CoverLetterComposer, CoverLetterContent};
