//! Concurrent dependency resolution for osdeps
//!
//! This crate takes the artifacts found by a scanner and turns them into the
//! final, filtered dependency set:
//! - `pool` partitions the artifacts over a fixed set of worker threads
//! - `resolve` parses each artifact and resolves runtime-relative references
//! - `aggregate` merges the per-worker results, filters and sorts them

pub mod aggregate;
pub mod pool;
pub mod resolve;

// Re-export main types
pub use aggregate::{AnalysisReport, FinalDependencySet};
pub use pool::{effective_workers, ShardResult, WorkerPool};
pub use resolve::{DependencyResolver, ProbeDirectories, Resolution};

use osdeps_config::ScanConfig;
use osdeps_core::error::OsdepsError;
use osdeps_core::types::{Artifact, TargetOs};
use osdeps_parser::ArtifactParser;
use tracing::info;

/// Result type for resolver operations
pub type ResolverResult<T> = Result<T, OsdepsError>;

/// Run the full pipeline from artifacts to the filtered dependency set
///
/// `parser_factory` is invoked once per worker. Individual artifacts that
/// fail to parse are counted in the report instead of aborting the run.
pub fn analyze<F, P>(
    artifacts: Vec<Artifact>,
    config: &ScanConfig,
    target_os: TargetOs,
    requested_workers: i64,
    parser_factory: F,
) -> AnalysisReport
where
    F: Fn() -> P + Send + Sync + 'static,
    P: ArtifactParser,
{
    let pool = WorkerPool::new(artifacts, requested_workers);
    let workers = pool.workers();
    info!(
        "Analyzing {} artifacts with {} workers",
        pool.artifact_count(),
        workers
    );

    let results = pool.start(parser_factory);
    let report = aggregate::drain(results, &config.ignore_lists, target_os.as_str());

    info!(
        "Analysis complete: {} parsed, {} skipped, {} dependencies",
        report.artifacts_parsed,
        report.artifacts_skipped,
        report.dependencies.len()
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use osdeps_config::IgnoreList;
    use osdeps_core::types::ArtifactKind;
    use osdeps_parser::testing::StaticParser;

    fn artifact(path: &str, os: TargetOs) -> Artifact {
        Artifact::new(
            Utf8PathBuf::from(path),
            ArtifactKind::PythonExtension,
            os,
            "x86_64".to_string(),
        )
    }

    fn config_ignoring(os: &str, entries: &[&str]) -> ScanConfig {
        let mut ignore_lists = IgnoreList::new();
        ignore_lists.extend(os, entries.iter().map(|e| e.to_string()));
        ScanConfig { ignore_lists }
    }

    #[test]
    fn test_base_libraries_are_filtered() {
        let artifacts = vec![
            artifact("/env/a.so", TargetOs::Linux),
            artifact("/env/b.so", TargetOs::Linux),
        ];
        let parser = StaticParser::new()
            .with_dependencies("/env/a.so", ["libc.so.6", "libfoo.so"])
            .with_dependencies("/env/b.so", ["libc.so.6"]);
        let config = config_ignoring("linux", &["libc.so.6"]);

        let report = analyze(artifacts, &config, TargetOs::Linux, 2, move || parser.clone());

        assert_eq!(report.dependencies.as_slice(), ["libfoo.so"]);
        assert_eq!(report.artifacts_parsed, 2);
        assert_eq!(report.shards, 2);
    }

    #[test]
    fn test_rpath_reference_resolved_to_sibling() {
        let artifacts = vec![artifact("/env/pkg/ext.so", TargetOs::Darwin)];
        let parser = StaticParser::new()
            .with_dependencies("/env/pkg/ext.so", ["@rpath/libbar", "/usr/lib/libSystem.B.dylib"])
            .with_dependencies("/env/pkg/libbar", Vec::<String>::new());
        let config = config_ignoring("darwin", &["/usr/lib/libSystem.B.dylib"]);

        let report = analyze(artifacts, &config, TargetOs::Darwin, -1, move || parser.clone());

        assert_eq!(report.dependencies.as_slice(), ["/env/pkg/libbar"]);
        assert_eq!(report.unresolved, 0);
    }

    #[test]
    fn test_empty_environment() {
        let report = analyze(
            Vec::new(),
            &ScanConfig::with_defaults(),
            TargetOs::Linux,
            8,
            StaticParser::new,
        );

        assert!(report.dependencies.is_empty());
        assert_eq!(report.shards, 0);
        assert_eq!(report.artifacts_parsed, 0);
    }

    #[test]
    fn test_one_bad_artifact_does_not_abort() {
        let artifacts: Vec<Artifact> = (0..10)
            .map(|i| artifact(&format!("/env/ext{}.so", i), TargetOs::Linux))
            .collect();
        let parser = (0..10).fold(StaticParser::new(), |parser, i| {
            let path = format!("/env/ext{}.so", i);
            if i == 7 {
                parser.with_failure(path, "invalid magic number")
            } else {
                parser.with_dependencies(path, [format!("libdep{}.so", i)])
            }
        });

        let report = analyze(
            artifacts,
            &ScanConfig::with_defaults(),
            TargetOs::Linux,
            3,
            move || parser.clone(),
        );

        assert_eq!(report.artifacts_parsed, 9);
        assert_eq!(report.artifacts_skipped, 1);
        assert_eq!(report.dependencies.len(), 9);
        assert!(!report.dependencies.contains("libdep7.so"));
    }

    #[test]
    fn test_result_independent_of_worker_count() {
        let artifacts: Vec<Artifact> = (0..25)
            .map(|i| artifact(&format!("/env/d{}/ext{}.so", i % 4, i), TargetOs::Linux))
            .collect();
        let parser = artifacts.iter().enumerate().fold(StaticParser::new(), |parser, (i, a)| {
            parser.with_dependencies(
                a.path.clone(),
                [format!("lib{}.so", i % 7), "libc.so.6".to_string()],
            )
        });
        let config = ScanConfig::with_defaults();

        let baseline = {
            let parser = parser.clone();
            analyze(artifacts.clone(), &config, TargetOs::Linux, 1, move || parser.clone())
        };
        for workers in [2, 5, 25, 100, -1] {
            let parser = parser.clone();
            let report = analyze(artifacts.clone(), &config, TargetOs::Linux, workers, move || {
                parser.clone()
            });
            assert_eq!(report.dependencies, baseline.dependencies);
        }
        assert_eq!(baseline.dependencies.len(), 7);
    }
}
