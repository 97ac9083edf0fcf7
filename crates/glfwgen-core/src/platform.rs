//! Platform selection axes
//!
//! GLFW exposes native handles along two independent axes: the windowing
//! system and the graphics context API. Each axis is optional; leaving one
//! unset produces a header with no native surface for that axis.

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Windowing-system integration axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowPlatform {
    Win32,
    Cocoa,
    X11,
    Wayland,
}

impl WindowPlatform {
    /// All window platforms, for exhaustive iteration in tests and `verify`
    pub const ALL: [WindowPlatform; 4] = [
        WindowPlatform::Win32,
        WindowPlatform::Cocoa,
        WindowPlatform::X11,
        WindowPlatform::Wayland,
    ];

    /// The `GLFW_EXPOSE_NATIVE_*` macro guarding this platform's section
    /// of `glfw3native.h`
    pub fn expose_macro(&self) -> &'static str {
        match self {
            WindowPlatform::Win32 => "GLFW_EXPOSE_NATIVE_WIN32",
            WindowPlatform::Cocoa => "GLFW_EXPOSE_NATIVE_COCOA",
            WindowPlatform::X11 => "GLFW_EXPOSE_NATIVE_X11",
            WindowPlatform::Wayland => "GLFW_EXPOSE_NATIVE_WAYLAND",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            WindowPlatform::Win32 => "win32",
            WindowPlatform::Cocoa => "cocoa",
            WindowPlatform::X11 => "x11",
            WindowPlatform::Wayland => "wayland",
        }
    }
}

impl std::str::FromStr for WindowPlatform {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "win32" | "windows" => Ok(WindowPlatform::Win32),
            "cocoa" | "macos" => Ok(WindowPlatform::Cocoa),
            "x11" => Ok(WindowPlatform::X11),
            "wayland" => Ok(WindowPlatform::Wayland),
            _ => Err(Error::UnknownPlatform(s.to_string())),
        }
    }
}

impl std::fmt::Display for WindowPlatform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Graphics-context integration axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContextPlatform {
    Wgl,
    Nsgl,
    Glx,
    Egl,
    Osmesa,
}

impl ContextPlatform {
    /// All context platforms, for exhaustive iteration in tests and `verify`
    pub const ALL: [ContextPlatform; 5] = [
        ContextPlatform::Wgl,
        ContextPlatform::Nsgl,
        ContextPlatform::Glx,
        ContextPlatform::Egl,
        ContextPlatform::Osmesa,
    ];

    /// The `GLFW_EXPOSE_NATIVE_*` macro guarding this context's section
    /// of `glfw3native.h`
    pub fn expose_macro(&self) -> &'static str {
        match self {
            ContextPlatform::Wgl => "GLFW_EXPOSE_NATIVE_WGL",
            ContextPlatform::Nsgl => "GLFW_EXPOSE_NATIVE_NSGL",
            ContextPlatform::Glx => "GLFW_EXPOSE_NATIVE_GLX",
            ContextPlatform::Egl => "GLFW_EXPOSE_NATIVE_EGL",
            ContextPlatform::Osmesa => "GLFW_EXPOSE_NATIVE_OSMESA",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ContextPlatform::Wgl => "wgl",
            ContextPlatform::Nsgl => "nsgl",
            ContextPlatform::Glx => "glx",
            ContextPlatform::Egl => "egl",
            ContextPlatform::Osmesa => "osmesa",
        }
    }
}

impl std::str::FromStr for ContextPlatform {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "wgl" => Ok(ContextPlatform::Wgl),
            "nsgl" => Ok(ContextPlatform::Nsgl),
            "glx" => Ok(ContextPlatform::Glx),
            "egl" => Ok(ContextPlatform::Egl),
            "osmesa" => Ok(ContextPlatform::Osmesa),
            _ => Err(Error::UnknownPlatform(s.to_string())),
        }
    }
}

impl std::fmt::Display for ContextPlatform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_platform_from_str() {
        assert_eq!("x11".parse::<WindowPlatform>().unwrap(), WindowPlatform::X11);
        assert_eq!(
            "WIN32".parse::<WindowPlatform>().unwrap(),
            WindowPlatform::Win32
        );
        assert!("haiku".parse::<WindowPlatform>().is_err());
    }

    #[test]
    fn test_context_platform_from_str() {
        assert_eq!("glx".parse::<ContextPlatform>().unwrap(), ContextPlatform::Glx);
        assert!("vulkan".parse::<ContextPlatform>().is_err());
    }

    #[test]
    fn test_serde_uses_lowercase_names() {
        let json = serde_json::to_string(&WindowPlatform::Wayland).unwrap();
        assert_eq!(json, "\"wayland\"");
        let parsed: ContextPlatform = serde_json::from_str("\"osmesa\"").unwrap();
        assert_eq!(parsed, ContextPlatform::Osmesa);
    }

    #[test]
    fn test_expose_macros_are_distinct() {
        let mut names: Vec<&str> = WindowPlatform::ALL.iter().map(|p| p.expose_macro()).collect();
        names.extend(ContextPlatform::ALL.iter().map(|c| c.expose_macro()));
        let before = names.len();
        names.sort();
        names.dedup();
        assert_eq!(before, names.len());
    }
}
