//! Document output: LaTeX rendering, external compilation, persistence.

pub mod compiler;
pub mod renderer;
pub mod store;

pub use compiler::CompilationOrchestrator;
pub use renderer::DocumentRenderer;
pub use store::{ApplicationRecord, ApplicationStore};
