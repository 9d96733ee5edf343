//! Per-artifact dependency resolution
//!
//! Raw references come straight from the parser. References carrying a
//! runtime-relative marker (`@rpath/libfoo.dylib`, `$ORIGIN/libbar.so`) are
//! resolved by probing the directories of known artifacts for a file of that
//! name which the same parser accepts. Loader-relative markers
//! (`@loader_path/`, `$ORIGIN/`) only ever look next to the referencing
//! artifact. Unresolvable references are kept verbatim so they stay visible
//! in the output.

use std::collections::{HashMap, HashSet};

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use osdeps_core::types::Artifact;
use osdeps_parser::ArtifactParser;
use tracing::{debug, warn};

use crate::ResolverResult;

/// Directories a symbolic marker may point into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerScope {
    /// Only the referencing artifact's own directory
    Origin,
    /// The artifact's own directory, then every other known directory
    AllKnown,
}

/// Prefixes marking a reference as relative to the loader's search path
pub const SYMBOLIC_MARKERS: &[(&str, MarkerScope)] = &[
    ("@rpath/", MarkerScope::AllKnown),
    ("@loader_path/", MarkerScope::Origin),
    ("@executable_path/", MarkerScope::AllKnown),
    ("$ORIGIN/", MarkerScope::Origin),
];

/// Split a symbolic reference into its target and the scope of its marker
pub fn split_symbolic(reference: &str) -> Option<(&str, MarkerScope)> {
    SYMBOLIC_MARKERS.iter().find_map(|(marker, scope)| {
        reference
            .strip_prefix(marker)
            .filter(|name| !name.is_empty())
            .map(|name| (name, *scope))
    })
}

/// File name a symbolic reference points at, or `None` for plain references
pub fn symbolic_target(reference: &str) -> Option<&str> {
    split_symbolic(reference).map(|(name, _)| name)
}

/// Collapse `.` and `..` components without touching the filesystem
///
/// `..` at the root is dropped; leading `..` of a relative path is kept.
pub fn normalize_path(path: &Utf8Path) -> Utf8PathBuf {
    let mut normalized = Utf8PathBuf::new();
    for component in path.components() {
        match component {
            Utf8Component::CurDir => {},
            Utf8Component::ParentDir => match normalized.components().next_back() {
                Some(Utf8Component::Normal(_)) => {
                    normalized.pop();
                },
                Some(Utf8Component::RootDir) | Some(Utf8Component::Prefix(_)) => {},
                _ => normalized.push(".."),
            },
            other => normalized.push(other.as_str()),
        }
    }
    normalized
}

/// Directories probed when resolving symbolic references
///
/// Holds the distinct containing directories of the scanned artifacts in
/// scan order. Shared read-only by all workers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProbeDirectories {
    dirs: Vec<Utf8PathBuf>,
}

impl ProbeDirectories {
    /// Collect the distinct artifact directories, keeping first-seen order
    pub fn from_artifacts(artifacts: &[Artifact]) -> Self {
        let mut seen = HashSet::new();
        let dirs = artifacts
            .iter()
            .map(|artifact| artifact.directory().to_path_buf())
            .filter(|dir| seen.insert(dir.clone()))
            .collect();
        Self { dirs }
    }

    /// Probe order for an artifact: its own directory, then every other
    /// known directory in scan order
    pub fn ordered_from<'a>(
        &'a self,
        origin: &'a Utf8Path,
    ) -> impl Iterator<Item = &'a Utf8Path> {
        std::iter::once(origin).chain(
            self.dirs
                .iter()
                .map(Utf8PathBuf::as_path)
                .filter(move |dir| *dir != origin),
        )
    }

    pub fn len(&self) -> usize {
        self.dirs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty()
    }
}

/// Outcome of resolving one symbolic reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// First accepted candidate, plus any other candidates that also parsed
    Resolved {
        path: Utf8PathBuf,
        alternatives: Vec<Utf8PathBuf>,
    },
    /// No candidate parsed; the reference is kept as is
    Unresolved,
}

impl Resolution {
    /// Whether more than one directory offered a valid candidate
    pub fn is_ambiguous(&self) -> bool {
        matches!(self, Resolution::Resolved { alternatives, .. } if !alternatives.is_empty())
    }
}

/// Resolved dependency strings of one artifact
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedDependencies {
    /// Dependencies in parser order, symbolic entries replaced where possible
    pub dependencies: Vec<String>,
    /// Symbolic references left unresolved
    pub unresolved: usize,
    /// Symbolic references with more than one valid candidate
    pub ambiguous: usize,
}

/// Resolver owned by a single worker
///
/// Holds the worker's private parser and a memo of probe outcomes; nothing
/// in here is shared across threads.
pub struct DependencyResolver<'a, P> {
    parser: P,
    probes: &'a ProbeDirectories,
    memo: HashMap<(Utf8PathBuf, String), Resolution>,
}

impl<'a, P: ArtifactParser> DependencyResolver<'a, P> {
    /// Create a resolver around a parser instance
    pub fn new(parser: P, probes: &'a ProbeDirectories) -> Self {
        Self {
            parser,
            probes,
            memo: HashMap::new(),
        }
    }

    /// Parse an artifact and resolve its symbolic references
    ///
    /// Parse failures of the artifact itself are returned to the caller;
    /// failures while probing candidates are not.
    pub fn resolve(&mut self, artifact: &Artifact) -> ResolverResult<ResolvedDependencies> {
        let raw = self.parser.parse_dependencies(&artifact.path)?;
        let mut resolved = ResolvedDependencies {
            dependencies: Vec::with_capacity(raw.len()),
            ..Default::default()
        };

        for reference in raw {
            if symbolic_target(&reference).is_none() {
                resolved.dependencies.push(reference);
                continue;
            }

            let resolution = self.resolve_reference(artifact.directory(), &reference);
            if resolution.is_ambiguous() {
                resolved.ambiguous += 1;
            }
            match resolution {
                Resolution::Resolved { path, .. } => {
                    resolved.dependencies.push(path.into_string());
                },
                Resolution::Unresolved => {
                    debug!("Could not resolve {} referenced by {}", reference, artifact.path);
                    resolved.unresolved += 1;
                    resolved.dependencies.push(reference);
                },
            }
        }

        Ok(resolved)
    }

    /// Resolve one symbolic reference as seen from `origin`
    pub fn resolve_reference(&mut self, origin: &Utf8Path, reference: &str) -> Resolution {
        let Some((name, scope)) = split_symbolic(reference) else {
            return Resolution::Unresolved;
        };

        let key = (origin.to_path_buf(), reference.to_string());
        if let Some(cached) = self.memo.get(&key) {
            return cached.clone();
        }

        let resolution = self.probe(origin, name, scope);
        if let Resolution::Resolved { path, alternatives } = &resolution {
            if !alternatives.is_empty() {
                warn!(
                    "Ambiguous reference {}: using {}, also found {:?}",
                    reference, path, alternatives
                );
            }
        }

        self.memo.insert(key, resolution.clone());
        resolution
    }

    fn probe(&self, origin: &Utf8Path, name: &str, scope: MarkerScope) -> Resolution {
        let reach = match scope {
            MarkerScope::Origin => 1,
            MarkerScope::AllKnown => usize::MAX,
        };
        let mut accepted: Vec<Utf8PathBuf> = Vec::new();

        for dir in self.probes.ordered_from(origin).take(reach) {
            let candidate = normalize_path(&dir.join(name));
            if accepted.contains(&candidate) {
                continue;
            }
            // Any parse failure just means "not here"
            if self.parser.parse_dependencies(&candidate).is_ok() {
                accepted.push(candidate);
            }
        }

        let mut candidates = accepted.into_iter();
        match candidates.next() {
            Some(path) => Resolution::Resolved {
                path,
                alternatives: candidates.collect(),
            },
            None => Resolution::Unresolved,
        }
    }
}
