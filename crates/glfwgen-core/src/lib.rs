//! glfwgen Core
//!
//! Core types shared across the glfwgen workspace: the platform
//! enumerations selecting which native APIs a generated header exposes,
//! the GLFW release/version model, and the common error type.

pub mod error;
pub mod platform;
pub mod version;

pub use error::{Error, Result};
pub use platform::{ContextPlatform, WindowPlatform};
pub use version::{Release, Version, VersionCache};
