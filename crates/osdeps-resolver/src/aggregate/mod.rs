//! Merging of shard results into the final dependency set

use std::collections::BTreeSet;

use crossbeam_channel::Receiver;
use osdeps_config::IgnoreList;
use tracing::{debug, warn};

use crate::pool::ShardResult;

/// Sorted, de-duplicated list of dependency strings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FinalDependencySet(Vec<String>);

impl FinalDependencySet {
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, dependency: &str) -> bool {
        self.0
            .binary_search_by(|probe| probe.as_str().cmp(dependency))
            .is_ok()
    }
}

impl FromIterator<String> for FinalDependencySet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        let sorted: BTreeSet<String> = iter.into_iter().filter(|dep| !dep.is_empty()).collect();
        Self(sorted.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a FinalDependencySet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Outcome of a full analysis run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalysisReport {
    /// Final set after filtering
    pub dependencies: FinalDependencySet,
    /// Final set before the ignore list was applied
    pub unfiltered: FinalDependencySet,
    /// Shard results merged
    pub shards: usize,
    pub artifacts_parsed: usize,
    pub artifacts_skipped: usize,
    pub unresolved: usize,
    pub ambiguous: usize,
    /// Distinct dependencies removed by the ignore list
    pub ignored: usize,
    /// Whether an ignore list existed for the target OS
    pub filter_applied: bool,
}

/// Incremental merger of shard results
///
/// Shards can arrive in any order; the result only depends on which shards
/// were added.
#[derive(Debug)]
pub struct Aggregator<'a> {
    ignore: Option<&'a BTreeSet<String>>,
    merged: BTreeSet<String>,
    report: AnalysisReport,
}

impl<'a> Aggregator<'a> {
    /// Create an aggregator filtering with the ignore list of `target_os`
    pub fn new(ignore_lists: &'a IgnoreList, target_os: &str) -> Self {
        let ignore = ignore_lists.for_os(target_os);
        if ignore.is_none() {
            warn!(
                "No ignore list found for OS '{}', output is unfiltered",
                target_os
            );
        }

        Self {
            ignore,
            merged: BTreeSet::new(),
            report: AnalysisReport {
                filter_applied: ignore.is_some(),
                ..Default::default()
            },
        }
    }

    /// Fold one shard into the running totals
    pub fn add(&mut self, shard: ShardResult) {
        debug!(
            "Merging shard from worker {} ({} dependencies)",
            shard.worker_id,
            shard.dependencies.len()
        );
        self.report.shards += 1;
        self.report.artifacts_parsed += shard.parsed;
        self.report.artifacts_skipped += shard.skipped;
        self.report.unresolved += shard.unresolved;
        self.report.ambiguous += shard.ambiguous;
        self.merged
            .extend(shard.dependencies.into_iter().filter(|dep| !dep.is_empty()));
    }

    /// Apply the ignore list and produce the report
    pub fn finish(self) -> AnalysisReport {
        let Self {
            ignore,
            merged,
            mut report,
        } = self;

        let kept: Vec<String> = match ignore {
            Some(ignore) => merged
                .iter()
                .filter(|dep| !ignore.contains(dep.as_str()))
                .cloned()
                .collect(),
            None => merged.iter().cloned().collect(),
        };

        report.ignored = merged.len() - kept.len();
        report.dependencies = kept.into_iter().collect();
        report.unfiltered = merged.into_iter().collect();
        report
    }
}

/// Merge a finite collection of shard results
pub fn merge<I>(shards: I, ignore_lists: &IgnoreList, target_os: &str) -> AnalysisReport
where
    I: IntoIterator<Item = ShardResult>,
{
    let mut aggregator = Aggregator::new(ignore_lists, target_os);
    for shard in shards {
        aggregator.add(shard);
    }
    aggregator.finish()
}

/// Consume the result channel until it closes
pub fn drain(
    results: Receiver<ShardResult>,
    ignore_lists: &IgnoreList,
    target_os: &str,
) -> AnalysisReport {
    merge(results.iter(), ignore_lists, target_os)
}
