//! Condition model and clause compilation
//!
//! This module owns the user-authored filter rows and turns each row into a
//! SQL fragment via the operator template registry.

pub mod cache;
mod compiler;
mod model;
mod templates;


pub use compiler::*;
pub use model::*;
pub use templates::{template_for, TemplateFn};
