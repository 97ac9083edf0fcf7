//! glfwgen Headers
//!
//! Assembles platform-specific GLFW3 header text: the platform selector
//! registers the macros and synthetic include fragments for a chosen
//! (window, context) pair, the storage layer locates the versioned
//! template pair on disk, and the composer runs the preprocessor over
//! both templates and concatenates the results.

pub mod composer;
pub mod selector;
pub mod storage;

pub use composer::Composer;
pub use storage::HeaderStorage;
