//! Fixed configuration shared across the build chain.
//!
//! The contract surface of the pipeline is a handful of constants: the
//! compilation target, the output directory and base name, the optimizer
//! preset and the dev server port. Three stages read the same output
//! directory and base name; keeping them in one place is what guarantees
//! the artifact hand-off lines up.

use crate::errors::WebforgeError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// WebAssembly compilation target. No host OS/ABI component.
pub const WASM_TARGET: &str = "wasm32-unknown-unknown";

/// Output directory for all web-deployable artifacts, relative to the
/// manifest directory.
pub const OUT_DIR: &str = "web";

/// Base name shared by the generated module and glue files.
pub const OUT_NAME: &str = "app";

/// Optimizer preset: aggressive size-over-speed.
pub const WASM_OPT_LEVEL: &str = "-Oz";

/// Fixed local TCP port for the dev server.
pub const DEV_SERVER_PORT: u16 = 4000;

/// Configuration for one pipeline invocation.
///
/// Everything here is fully specified up front; the pipeline holds no
/// state across invocations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Name of the cargo package being compiled.
    pub package: String,
    /// Directory containing the package's `Cargo.toml`.
    pub manifest_dir: PathBuf,
    /// Output directory for web artifacts, relative to `manifest_dir`.
    pub out_dir: PathBuf,
    /// Base name for the generated module and glue files.
    pub out_name: String,
    /// Optimizer level flag passed to `wasm-opt`.
    pub opt_level: String,
    /// Dev server port.
    pub port: u16,
}

impl BuildConfig {
    /// Creates a config for the named package, rooted at `manifest_dir`,
    /// with the fixed constants for everything else.
    #[must_use]
    pub fn for_package(package: impl Into<String>, manifest_dir: impl Into<PathBuf>) -> Self {
        Self {
            package: package.into(),
            manifest_dir: manifest_dir.into(),
            out_dir: PathBuf::from(OUT_DIR),
            out_name: OUT_NAME.to_string(),
            opt_level: WASM_OPT_LEVEL.to_string(),
            port: DEV_SERVER_PORT,
        }
    }

    /// Resolves the package name from the `Cargo.toml` in `manifest_dir`.
    ///
    /// # Errors
    ///
    /// Returns a [`WebforgeError::Toolchain`] error if the manifest cannot
    /// be read or carries no package name.
    pub fn from_manifest(manifest_dir: impl Into<PathBuf>) -> Result<Self, WebforgeError> {
        let manifest_dir = manifest_dir.into();
        let manifest_path = manifest_dir.join("Cargo.toml");
        let manifest = std::fs::read_to_string(&manifest_path).map_err(|e| {
            WebforgeError::Toolchain(format!(
                "cannot read {}: {e}",
                manifest_path.display()
            ))
        })?;

        let package = parse_package_name(&manifest).ok_or_else(|| {
            WebforgeError::Toolchain(format!(
                "no [package] name found in {}",
                manifest_path.display()
            ))
        })?;

        Ok(Self::for_package(package, manifest_dir))
    }

    /// Absolute output directory.
    #[must_use]
    pub fn out_dir_path(&self) -> PathBuf {
        self.manifest_dir.join(&self.out_dir)
    }

    /// Path of the compiled wasm binary, as defined by the cargo toolchain
    /// for a release build of [`WASM_TARGET`].
    #[must_use]
    pub fn wasm_binary_path(&self) -> PathBuf {
        self.manifest_dir
            .join("target")
            .join(WASM_TARGET)
            .join("release")
            .join(format!("{}.wasm", self.package.replace('-', "_")))
    }

    /// Path of the web-loadable module emitted by the binding generator.
    #[must_use]
    pub fn wasm_module_path(&self) -> PathBuf {
        self.out_dir_path().join(format!("{}_bg.wasm", self.out_name))
    }

    /// Path of the JavaScript glue module emitted by the binding generator.
    #[must_use]
    pub fn js_glue_path(&self) -> PathBuf {
        self.out_dir_path().join(format!("{}.js", self.out_name))
    }

    /// Path a type-declaration file would have. Never generated
    /// (`--no-typescript`); used by tests to assert its absence.
    #[must_use]
    pub fn type_declaration_path(&self) -> PathBuf {
        self.out_dir_path().join(format!("{}.d.ts", self.out_name))
    }
}

/// Extracts the `[package] name` from a Cargo manifest.
fn parse_package_name(manifest: &str) -> Option<String> {
    // Scoped to the [package] table so dependency tables cannot shadow it.
    let start = manifest.find("[package]")?;
    let table = &manifest[start + "[package]".len()..];
    let table = &table[..table.find("\n[").unwrap_or(table.len())];

    let re = regex::Regex::new(r#"(?m)^\s*name\s*=\s*"([^"]+)""#).ok()?;
    re.captures(table).map(|caps| caps[1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::Path;

    #[test]
    fn test_fixed_constants() {
        let config = BuildConfig::for_package("demo", ".");

        assert_eq!(config.out_dir, Path::new("web"));
        assert_eq!(config.out_name, "app");
        assert_eq!(config.opt_level, "-Oz");
        assert_eq!(config.port, 4000);
    }

    #[test]
    fn test_derived_paths() {
        let config = BuildConfig::for_package("winter-scene", "/tmp/proj");

        assert_eq!(
            config.wasm_binary_path(),
            Path::new("/tmp/proj/target/wasm32-unknown-unknown/release/winter_scene.wasm")
        );
        assert_eq!(
            config.wasm_module_path(),
            Path::new("/tmp/proj/web/app_bg.wasm")
        );
        assert_eq!(config.js_glue_path(), Path::new("/tmp/proj/web/app.js"));
        assert_eq!(
            config.type_declaration_path(),
            Path::new("/tmp/proj/web/app.d.ts")
        );
    }

    #[test]
    fn test_parse_package_name() {
        let manifest = r#"
[package]
name = "demo-app"
version = "0.1.0"

[dependencies]
name-collision = "1"
"#;
        assert_eq!(parse_package_name(manifest), Some("demo-app".to_string()));
    }

    #[test]
    fn test_parse_package_name_missing() {
        assert_eq!(parse_package_name("[workspace]\nmembers = []\n"), None);
    }

    #[test]
    fn test_from_manifest() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("Cargo.toml"),
            "[package]\nname = \"scene\"\nversion = \"0.1.0\"\n",
        )
        .unwrap();

        let config = BuildConfig::from_manifest(dir.path()).unwrap();
        assert_eq!(config.package, "scene");
    }

    #[test]
    fn test_from_manifest_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = BuildConfig::from_manifest(dir.path());
        assert!(result.is_err());
    }
}
