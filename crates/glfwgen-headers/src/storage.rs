//! Template header storage
//!
//! Locates the two template files for a GLFW version under a storage
//! root: `<root>/<version>/glfw3.h` and `<root>/<version>/glfw3native.h`.
//! The composer only ever reads these paths; provisioning them is this
//! module's job, either from caller-supplied text via [`install`] or from
//! the template pair bundled with the crate via [`ensure_bundled`].
//!
//! [`install`]: HeaderStorage::install
//! [`ensure_bundled`]: HeaderStorage::ensure_bundled

use std::fs;
use std::path::{Path, PathBuf};

use glfwgen_core::{Result, Version};
use tracing::{debug, info};
use walkdir::WalkDir;

/// Primary API template file name
pub const HEADER_FILE: &str = "glfw3.h";
/// Native interop template file name
pub const NATIVE_HEADER_FILE: &str = "glfw3native.h";

const BUNDLED_HEADER: &str = include_str!("../resources/templates/glfw3.h");
const BUNDLED_NATIVE_HEADER: &str = include_str!("../resources/templates/glfw3native.h");

/// Versioned template header storage under one root directory
#[derive(Debug, Clone)]
pub struct HeaderStorage {
    root: PathBuf,
}

impl HeaderStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the primary API template for a version
    pub fn header_path(&self, version: &Version) -> PathBuf {
        self.root.join(version.as_str()).join(HEADER_FILE)
    }

    /// Path of the native interop template for a version
    pub fn native_header_path(&self, version: &Version) -> PathBuf {
        self.root.join(version.as_str()).join(NATIVE_HEADER_FILE)
    }

    /// Whether both template files for a version are present
    pub fn exists(&self, version: &Version) -> bool {
        self.header_path(version).is_file() && self.native_header_path(version).is_file()
    }

    /// Write a template pair for a version, creating directories as needed
    pub fn install(&self, version: &Version, primary: &str, native: &str) -> Result<()> {
        let dir = self.root.join(version.as_str());
        fs::create_dir_all(&dir)?;
        fs::write(dir.join(HEADER_FILE), primary)?;
        fs::write(dir.join(NATIVE_HEADER_FILE), native)?;
        info!("installed template headers for {} in {:?}", version, dir);
        Ok(())
    }

    /// Provision the bundled template pair for a version if missing
    ///
    /// The bundled templates are a trimmed rendition of the upstream
    /// GLFW headers covering the full directive surface; they serve any
    /// version token, known or custom.
    pub fn ensure_bundled(&self, version: &Version) -> Result<()> {
        if self.exists(version) {
            debug!("templates for {} already present", version);
            return Ok(());
        }
        self.install(version, BUNDLED_HEADER, BUNDLED_NATIVE_HEADER)
    }

    /// Version directories under the root that hold a complete template
    /// pair, sorted by version order
    pub fn installed_versions(&self) -> Vec<Version> {
        let mut versions: Vec<Version> = WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_dir())
            .filter_map(|entry| entry.file_name().to_str().map(Version::parse))
            .filter(|version| self.exists(version))
            .collect();
        versions.sort_by(|a, b| a.compare(b));
        versions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glfwgen_core::Release;
    use tempfile::TempDir;

    #[test]
    fn test_deterministic_paths() {
        let storage = HeaderStorage::new("/tmp/headers");
        let version = Version::from(Release::V3_3_6);
        assert_eq!(
            storage.header_path(&version),
            PathBuf::from("/tmp/headers/3.3.6/glfw3.h")
        );
        assert_eq!(
            storage.native_header_path(&version),
            PathBuf::from("/tmp/headers/3.3.6/glfw3native.h")
        );
    }

    #[test]
    fn test_install_and_exists() {
        let temp = TempDir::new().unwrap();
        let storage = HeaderStorage::new(temp.path());
        let version = Version::parse("3.2.1");

        assert!(!storage.exists(&version));
        storage.install(&version, "primary", "native").unwrap();
        assert!(storage.exists(&version));
        assert_eq!(
            fs::read_to_string(storage.header_path(&version)).unwrap(),
            "primary"
        );
    }

    #[test]
    fn test_ensure_bundled_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let storage = HeaderStorage::new(temp.path());
        let version = Version::parse("3.4.0-custom");

        storage.ensure_bundled(&version).unwrap();
        assert!(storage.exists(&version));

        // A second call must not clobber an existing pair
        storage.install(&version, "patched", "patched").unwrap();
        storage.ensure_bundled(&version).unwrap();
        assert_eq!(
            fs::read_to_string(storage.header_path(&version)).unwrap(),
            "patched"
        );
    }

    #[test]
    fn test_installed_versions_sorted() {
        let temp = TempDir::new().unwrap();
        let storage = HeaderStorage::new(temp.path());
        for token in ["3.3.6", "3.0.4", "3.2.1"] {
            storage
                .install(&Version::parse(token), "p", "n")
                .unwrap();
        }
        // Incomplete pair is ignored
        fs::create_dir_all(temp.path().join("3.1.2")).unwrap();
        fs::write(temp.path().join("3.1.2").join(HEADER_FILE), "p").unwrap();

        let versions = storage.installed_versions();
        let tokens: Vec<&str> = versions.iter().map(|v| v.as_str()).collect();
        assert_eq!(tokens, vec!["3.0.4", "3.2.1", "3.3.6"]);
    }
}
