//! Header composer
//!
//! Top-level orchestration: resolve the version, clone the caller's base
//! macro table, apply the platform selector, preprocess the two template
//! files and concatenate the results. Every call starts from fresh
//! tables, so a composer can be shared across threads.

use std::fs;

use glfwgen_core::{ContextPlatform, Error, Result, Version, VersionCache, WindowPlatform};
use glfwgen_preprocessor::{FragmentTable, MacroTable, Preprocessor};
use tracing::debug;

use crate::selector;
use crate::storage::HeaderStorage;

/// Composes platform-specific header text from versioned templates
#[derive(Debug, Clone)]
pub struct Composer {
    storage: HeaderStorage,
    engine: Preprocessor,
}

impl Composer {
    pub fn new(storage: HeaderStorage) -> Self {
        Self {
            storage,
            engine: Preprocessor::new(),
        }
    }

    /// Use a preconfigured engine (include depth, redefinition policy)
    pub fn with_engine(storage: HeaderStorage, engine: Preprocessor) -> Self {
        Self { storage, engine }
    }

    pub fn storage(&self) -> &HeaderStorage {
        &self.storage
    }

    /// Compose the header text for a platform/version selection
    ///
    /// Both template files must already be present in storage; a missing
    /// file is a precondition violation reported as
    /// [`Error::TemplateNotFound`], to be fixed by provisioning (e.g.
    /// [`HeaderStorage::ensure_bundled`]) and retrying. The two templates
    /// share one macro table, so guards defined by `glfw3.h` stay visible
    /// to `glfw3native.h`; each template gets a fresh include-depth
    /// budget. Output is the two expanded texts joined by a single
    /// newline, ending in a newline.
    pub fn create(
        &self,
        window: Option<WindowPlatform>,
        context: Option<ContextPlatform>,
        version: &Version,
        base_macros: Option<&MacroTable>,
    ) -> Result<String> {
        let primary_path = self.storage.header_path(version);
        let native_path = self.storage.native_header_path(version);
        for path in [&primary_path, &native_path] {
            if !path.is_file() {
                return Err(Error::TemplateNotFound(path.display().to_string()));
            }
        }

        debug!(?window, ?context, %version, "composing header");

        let mut macros = base_macros.cloned().unwrap_or_default();
        let mut fragments = FragmentTable::new();
        selector::apply(&mut macros, &mut fragments, window, context)?;

        let primary_source = fs::read_to_string(&primary_path)?;
        let native_source = fs::read_to_string(&native_path)?;

        let primary = self.engine.process(&primary_source, &mut macros, &fragments)?;
        let native = self.engine.process(&native_source, &mut macros, &fragments)?;

        Ok(format!("{}\n{}", primary.trim_end_matches('\n'), native))
    }

    /// Like [`create`](Composer::create), resolving a version token
    /// through the caller's interning cache
    pub fn create_for_token(
        &self,
        window: Option<WindowPlatform>,
        context: Option<ContextPlatform>,
        token: &str,
        cache: &mut VersionCache,
        base_macros: Option<&MacroTable>,
    ) -> Result<String> {
        let version = cache.resolve(token);
        self.create(window, context, &version, base_macros)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glfwgen_core::Release;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn composer_with_bundled(version: &Version) -> (TempDir, Composer) {
        let temp = TempDir::new().unwrap();
        let storage = HeaderStorage::new(temp.path());
        storage.ensure_bundled(version).unwrap();
        (temp, Composer::new(storage))
    }

    #[test]
    fn test_missing_templates_fail() {
        let temp = TempDir::new().unwrap();
        let composer = Composer::new(HeaderStorage::new(temp.path()));
        let err = composer
            .create(None, None, &Version::LATEST, None)
            .unwrap_err();
        assert!(matches!(err, Error::TemplateNotFound(_)));
    }

    #[test]
    fn test_win32_wgl_render() {
        let version = Version::from(Release::V3_3_6);
        let (_temp, composer) = composer_with_bundled(&version);
        let out = composer
            .create(
                Some(WindowPlatform::Win32),
                Some(ContextPlatform::Wgl),
                &version,
                None,
            )
            .unwrap();

        assert!(out.contains("typedef void* HWND;"));
        assert!(out.contains("glfwGetWin32Window"));
        assert!(out.contains("glfwGetWGLContext"));
        assert!(!out.contains("glfwGetX11Window"));
        assert!(!out.contains("GLFWAPI"), "GLFWAPI must expand to nothing");
        assert!(out.ends_with('\n'));
        assert!(!out.ends_with("\n\n"));
    }

    #[test]
    fn test_no_platforms_render_has_no_native_surface() {
        let version = Version::LATEST;
        let (_temp, composer) = composer_with_bundled(&version);
        let out = composer.create(None, None, &version, None).unwrap();

        assert!(out.contains("glfwInit"));
        assert!(!out.contains("glfwGetWin32Window"));
        assert!(!out.contains("glfwGetX11Display"));
        assert!(!out.contains("glfwGetEGLDisplay"));
    }

    #[test]
    fn test_base_macro_table_is_not_mutated() {
        let version = Version::LATEST;
        let (_temp, composer) = composer_with_bundled(&version);

        let mut base = MacroTable::new();
        base.define("GLFW_INCLUDE_NONE", Some("1")).unwrap();
        composer
            .create(Some(WindowPlatform::X11), None, &version, Some(&base))
            .unwrap();

        // The composition defines plenty of macros internally; none may
        // leak back into the caller's table.
        assert_eq!(base.len(), 1);
        assert!(!base.is_defined("GLFW_EXPOSE_NATIVE_X11"));
    }

    #[test]
    fn test_create_for_token_accepts_custom_versions() {
        let version = Version::parse("9.9.9-nightly");
        let (_temp, composer) = composer_with_bundled(&version);
        let mut cache = VersionCache::new();
        let out = composer
            .create_for_token(
                Some(WindowPlatform::Wayland),
                Some(ContextPlatform::Egl),
                "9.9.9-nightly",
                &mut cache,
                None,
            )
            .unwrap();
        assert!(out.contains("glfwGetWaylandDisplay"));
        assert!(out.contains("glfwGetEGLContext"));
    }

    #[test]
    fn test_composition_is_deterministic() {
        let version = Version::LATEST;
        let (_temp, composer) = composer_with_bundled(&version);
        let a = composer
            .create(
                Some(WindowPlatform::X11),
                Some(ContextPlatform::Glx),
                &version,
                None,
            )
            .unwrap();
        let b = composer
            .create(
                Some(WindowPlatform::X11),
                Some(ContextPlatform::Glx),
                &version,
                None,
            )
            .unwrap();
        assert_eq!(a, b);
    }
}
