//! Python virtual environment scanner
//!
//! Native extension modules live under `site-packages`. The scanner locates
//! every site-packages directory of the environment and collects the shared
//! objects inside them.

use std::collections::HashSet;
use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use osdeps_core::error::OsdepsError;
use osdeps_core::types::{Artifact, ArtifactKind, TargetOs};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::{ScanResult, Scanner};

/// Scanner for Python virtual environments
#[derive(Debug, Clone)]
pub struct PythonVenvScanner {
    /// OS the artifacts are collected for
    target_os: TargetOs,
}

impl PythonVenvScanner {
    /// Create a scanner for the given target OS
    pub fn new(target_os: TargetOs) -> Self {
        Self { target_os }
    }

    /// File suffixes of extension modules on the target OS
    pub fn artifact_suffixes(&self) -> &'static [&'static str] {
        match self.target_os {
            TargetOs::Linux => &[".so"],
            // Extensions are usually .so even on macOS
            TargetOs::Darwin => &[".so", ".dylib"],
        }
    }

    fn is_artifact_name(&self, name: &str) -> bool {
        self.artifact_suffixes()
            .iter()
            .any(|suffix| name.ends_with(suffix))
    }
}

impl Scanner for PythonVenvScanner {
    fn scan(&self, root: &Utf8Path) -> ScanResult<Vec<Artifact>> {
        let root = absolutize(root)?;
        if !root.is_dir() {
            return Err(OsdepsError::scan(root.as_str(), "environment root is not a directory"));
        }

        let site_packages = find_site_packages(&root)?;
        if site_packages.is_empty() {
            return Err(OsdepsError::scan(
                root.as_str(),
                "no site-packages directory found",
            ));
        }
        info!("Found site-packages directories: {:?}", site_packages);

        let mut artifacts = Vec::new();
        let mut seen = HashSet::new();

        for dir in &site_packages {
            debug!("Scanning {}", dir);
            for entry in WalkDir::new(dir).sort_by_file_name() {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        warn!("Error accessing path under {}: {}", dir, e);
                        continue;
                    },
                };

                if !entry.file_type().is_file() {
                    continue;
                }

                let Some(name) = entry.file_name().to_str() else {
                    continue;
                };
                if !self.is_artifact_name(name) {
                    continue;
                }

                let path = match Utf8PathBuf::from_path_buf(entry.into_path()) {
                    Ok(path) => path,
                    Err(path) => {
                        warn!("Skipping non UTF-8 path {}", path.display());
                        continue;
                    },
                };

                if seen.insert(path.clone()) {
                    artifacts.push(Artifact::new(
                        path,
                        ArtifactKind::PythonExtension,
                        self.target_os,
                        std::env::consts::ARCH.to_string(),
                    ));
                }
            }
        }

        info!("Found {} potential artifacts", artifacts.len());
        Ok(artifacts)
    }
}

/// Locate site-packages directories inside a virtual environment
///
/// Looks at `lib/python*/site-packages`, `Lib/python*/site-packages` and a
/// top-level `site-packages`.
pub fn find_site_packages(root: &Utf8Path) -> ScanResult<Vec<Utf8PathBuf>> {
    let mut paths = Vec::new();

    let lib_dir = ["lib", "Lib"]
        .iter()
        .map(|name| root.join(name))
        .find(|dir| dir.is_dir());

    if let Some(lib_dir) = lib_dir {
        let entries = fs::read_dir(&lib_dir).map_err(|e| {
            OsdepsError::scan(root.as_str(), format!("could not read {}: {}", lib_dir, e))
        })?;

        let mut candidates: Vec<Utf8PathBuf> = entries
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("Error reading entry of {}: {}", lib_dir, e);
                    None
                },
            })
            .filter(|entry| entry.file_type().map(|t| t.is_dir()).unwrap_or(false))
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| name.starts_with("python"))
            .map(|name| lib_dir.join(name).join("site-packages"))
            .filter(|path| path.is_dir())
            .collect();
        candidates.sort();
        paths.extend(candidates);
    }

    let top_level = root.join("site-packages");
    if top_level.is_dir() {
        paths.push(top_level);
    }

    if paths.is_empty() {
        warn!("Could not find site-packages using common patterns in {}", root);
    }

    Ok(paths)
}

fn absolutize(root: &Utf8Path) -> ScanResult<Utf8PathBuf> {
    if root.is_absolute() {
        return Ok(root.to_path_buf());
    }

    let cwd = std::env::current_dir().map_err(|e| {
        OsdepsError::scan(root.as_str(), format!("cannot resolve current directory: {}", e))
    })?;
    let cwd = Utf8PathBuf::from_path_buf(cwd).map_err(|p| {
        OsdepsError::scan(root.as_str(), format!("non UTF-8 current directory {}", p.display()))
    })?;
    Ok(cwd.join(root))
}
