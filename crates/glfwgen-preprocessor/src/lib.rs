//! glfwgen Preprocessor
//!
//! A small line-oriented C preprocessor, just enough to expand the GLFW
//! header templates: object-like macro definition and substitution,
//! conditional directives with C-style integer expressions, and include
//! resolution against an in-memory fragment table instead of the
//! filesystem.
//!
//! ## Modules
//!
//! - `macros` - macro name -> replacement table
//! - `fragments` - synthetic stand-in text for named includes
//! - `expr` - `#if`/`#elif` expression evaluation
//! - `engine` - the single-pass directive processor

pub mod engine;
pub mod expr;
pub mod fragments;
pub mod macros;

pub use engine::Preprocessor;
pub use fragments::FragmentTable;
pub use macros::{MacroDefinition, MacroTable};
