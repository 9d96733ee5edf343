//! Per-OS ignore lists
//!
//! An ignore list names the libraries that ship with the base OS image and
//! therefore never need to be provisioned. The built-in lists are
//! deliberately small; projects extend them through osdeps.toml.

use std::collections::{BTreeMap, BTreeSet};

use osdeps_core::types::TargetOs;

/// Core glibc and compiler runtime libraries present on any Linux image
const LINUX_BASE_LIBRARIES: &[&str] = &[
    "linux-vdso.so.1",
    "libc.so.6",
    "libm.so.6",
    "libdl.so.2",
    "libpthread.so.0",
    "ld-linux-x86-64.so.2",
    "ld-linux-aarch64.so.1",
    "libgcc_s.so.1",
    "libstdc++.so.6",
    "librt.so.1",
];

/// Low-level dylibs present on any macOS install
const DARWIN_BASE_LIBRARIES: &[&str] = &[
    "/usr/lib/libSystem.B.dylib",
    "/usr/lib/libobjc.A.dylib",
    "/usr/lib/libc++.1.dylib",
];

/// Mapping from OS tag to the set of library identifiers to ignore
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IgnoreList {
    lists: BTreeMap<String, BTreeSet<String>>,
}

impl IgnoreList {
    /// Create an ignore list with no entries for any OS
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-in ignore lists for every supported OS
    pub fn defaults() -> Self {
        let mut list = Self::new();
        for os in TargetOs::ALL {
            let entries = match os {
                TargetOs::Linux => LINUX_BASE_LIBRARIES,
                TargetOs::Darwin => DARWIN_BASE_LIBRARIES,
            };
            list.extend(os.as_str(), entries.iter().map(|lib| lib.to_string()));
        }
        list
    }

    /// Ignore set for an OS tag, if one is defined
    pub fn for_os(&self, os: &str) -> Option<&BTreeSet<String>> {
        self.lists.get(os)
    }

    /// Check whether a library is ignored for an OS
    pub fn is_ignored(&self, os: &str, library: &str) -> bool {
        self.lists
            .get(os)
            .map(|set| set.contains(library))
            .unwrap_or(false)
    }

    /// Add entries to an OS list, creating the list if needed
    pub fn extend<I>(&mut self, os: &str, entries: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.lists
            .entry(os.to_string())
            .or_default()
            .extend(entries.into_iter().filter(|entry| !entry.is_empty()));
    }

    /// Replace the list for an OS
    pub fn replace<I>(&mut self, os: &str, entries: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.lists.insert(os.to_string(), BTreeSet::new());
        self.extend(os, entries);
    }

    /// Empty the list for an OS ("no filtering" mode)
    ///
    /// The OS keeps an (empty) entry so the aggregator does not report a
    /// missing list.
    pub fn clear(&mut self, os: &str) {
        self.lists.insert(os.to_string(), BTreeSet::new());
    }
}
