//! Unit tests for CLI commands.

use super::*;
use crate::output::OutputFormat;
use crate::{ArtifactsArgs, IgnoredArgs, ScanArgs};
use osdeps_resolver::AnalysisReport;
use std::fs;
use tempfile::TempDir;

/// Create a test command context in a temporary directory
fn create_test_context(temp_dir: &TempDir) -> CommandContext {
    CommandContext {
        cwd: Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap(),
        output: crate::output::OutputHandler::new(),
    }
}

/// Lay out a venv with the given files under site-packages
fn create_venv(ctx: &CommandContext, files: &[(&str, &str)]) -> Utf8PathBuf {
    let site_packages = ctx.cwd.join("venv/lib/python3.11/site-packages");
    fs::create_dir_all(&site_packages).unwrap();
    for (name, contents) in files {
        let path = site_packages.join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, contents).unwrap();
    }
    Utf8PathBuf::from("venv")
}

fn scan_args(env_path: Utf8PathBuf) -> ScanArgs {
    ScanArgs {
        env_path,
        env_type: "python-venv".to_string(),
        os: "linux".to_string(),
        output_format: "list".to_string(),
        workers: -1,
        debug: false,
        no_filter: false,
        config: None,
    }
}

fn ignored_args(os: &str) -> IgnoredArgs {
    IgnoredArgs {
        os: os.to_string(),
        config: None,
        no_filter: false,
        output_format: "list".to_string(),
    }
}

#[test]
fn test_scan_skips_unparseable_artifacts() {
    let temp_dir = tempfile::tempdir().unwrap();
    let ctx = create_test_context(&temp_dir);
    let env = create_venv(
        &ctx,
        &[("pkg/a.so", "not an elf"), ("pkg/b.so", ""), ("pkg/readme.txt", "hi")],
    );

    let report = scan::run(&scan_args(env), &ctx).unwrap();
    assert_eq!(report.artifacts_parsed, 0);
    assert_eq!(report.artifacts_skipped, 2);
    assert!(report.dependencies.is_empty());
}

#[cfg(target_os = "linux")]
#[test]
fn test_scan_real_elf_filters_libc() {
    let temp_dir = tempfile::tempdir().unwrap();
    let ctx = create_test_context(&temp_dir);
    let env = create_venv(&ctx, &[]);
    fs::copy(
        std::env::current_exe().unwrap(),
        ctx.cwd.join("venv/lib/python3.11/site-packages/_native.so"),
    )
    .unwrap();

    let report = scan::run(&scan_args(env.clone()), &ctx).unwrap();
    assert_eq!(report.artifacts_parsed, 1);
    assert!(!report.dependencies.contains("libc.so.6"));

    let mut unfiltered_args = scan_args(env);
    unfiltered_args.no_filter = true;
    let unfiltered = scan::run(&unfiltered_args, &ctx).unwrap();
    assert!(unfiltered.dependencies.len() >= report.dependencies.len());
}

#[test]
fn test_debug_listing_follows_output_format() {
    let report = AnalysisReport {
        unfiltered: ["libc.so.6", "libfoo.so"].iter().map(|s| s.to_string()).collect(),
        dependencies: ["libfoo.so"].iter().map(|s| s.to_string()).collect(),
        ..Default::default()
    };

    let listed = scan::debug_listing(&report, OutputFormat::List).unwrap();
    assert_eq!(listed, "libc.so.6\nlibfoo.so");

    let json = scan::debug_listing(&report, OutputFormat::Json).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value, serde_json::json!(["libc.so.6", "libfoo.so"]));
}

#[test]
fn test_scan_missing_environment_is_fatal() {
    let temp_dir = tempfile::tempdir().unwrap();
    let ctx = create_test_context(&temp_dir);

    let result = scan::run(&scan_args(Utf8PathBuf::from("no-such-venv")), &ctx);
    assert!(matches!(result, Err(OsdepsError::Scan { .. })));
}

#[test]
fn test_scan_rejects_bad_arguments() {
    let temp_dir = tempfile::tempdir().unwrap();
    let ctx = create_test_context(&temp_dir);
    let env = create_venv(&ctx, &[]);

    let mut args = scan_args(env.clone());
    args.os = "windows".to_string();
    assert!(matches!(scan::run(&args, &ctx), Err(OsdepsError::UnsupportedOs { .. })));

    let mut args = scan_args(env.clone());
    args.env_type = "conda".to_string();
    assert!(matches!(
        scan::run(&args, &ctx),
        Err(OsdepsError::UnsupportedEnvironment { .. })
    ));

    let mut args = scan_args(env);
    args.output_format = "yaml".to_string();
    assert!(matches!(
        scan::execute(args, &ctx),
        Err(OsdepsError::UnsupportedFormat { .. })
    ));
}

#[test]
fn test_artifacts_collects_extensions() {
    let temp_dir = tempfile::tempdir().unwrap();
    let ctx = create_test_context(&temp_dir);
    let env = create_venv(&ctx, &[("pkg/a.so", ""), ("pkg/b.dylib", ""), ("pkg/c.py", "")]);

    let args = ArtifactsArgs {
        env_path: env,
        env_type: "python-venv".to_string(),
        os: "darwin".to_string(),
        output_format: "json".to_string(),
    };
    let artifacts = artifacts::collect(&args, &ctx).unwrap();
    assert_eq!(artifacts.len(), 2);
    assert!(artifacts.iter().all(|a| a.path.starts_with(&ctx.cwd)));
    assert_eq!(artifacts::summary(&artifacts), "2 artifacts found (python-ext-so: 2)");
    assert_eq!(artifacts::summary(&[]), "0 artifacts found");
}

#[test]
fn test_ignored_reflects_project_config() {
    let temp_dir = tempfile::tempdir().unwrap();
    let ctx = create_test_context(&temp_dir);
    fs::write(
        ctx.cwd.join("osdeps.toml"),
        "[ignore-lists]\nlinux = [\"libz.so.1\"]\n",
    )
    .unwrap();

    let entries = ignored::effective_list(&ignored_args("linux"), &ctx).unwrap();
    assert!(entries.contains(&"libz.so.1".to_string()));
    assert!(entries.contains(&"libc.so.6".to_string()));
    assert!(entries.windows(2).all(|w| w[0] < w[1]));

    let mut args = ignored_args("linux");
    args.no_filter = true;
    assert!(ignored::effective_list(&args, &ctx).unwrap().is_empty());
}

#[test]
fn test_ignored_with_missing_explicit_config() {
    let temp_dir = tempfile::tempdir().unwrap();
    let ctx = create_test_context(&temp_dir);

    let mut args = ignored_args("darwin");
    args.config = Some(Utf8PathBuf::from("missing.toml"));
    assert!(matches!(
        ignored::effective_list(&args, &ctx),
        Err(OsdepsError::ConfigValidation { .. })
    ));
}

#[test]
fn test_resolve_path() {
    let temp_dir = tempfile::tempdir().unwrap();
    let ctx = create_test_context(&temp_dir);

    assert_eq!(ctx.resolve_path(Utf8Path::new("/abs/venv")), Utf8PathBuf::from("/abs/venv"));
    assert_eq!(ctx.resolve_path(Utf8Path::new("venv")), ctx.cwd.join("venv"));
}
