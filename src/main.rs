use clap::Parser;
use lazyut::config::Args;
use lazyut::parser::RegexParser;
use lazyut::path::RelPath;
use lazyut::{analyzer, config};
use std::fs;
use std::path::Path;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let env_filter = if args.verbal {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    fmt().with_env_filter(env_filter).with_target(false).compact().init();

    info!(?args, "lazyut starting");
    let config: config::AnalyzerConfig = args.into_config();
    info!(root = %config.root.display(), output = %config.output_dir.display(), "resolved configuration");

    let source_parser = RegexParser;
    let lists = analyzer::run(&config, &source_parser)?;

    write_list(
        &config.output_dir.join("srcs_affected.txt"),
        &rebase_all(&lists.src_affected, &config.root, config.src_base.as_deref()),
    )?;
    write_list(
        &config.output_dir.join("tests_affected.txt"),
        &rebase_all(&lists.test_affected, &config.root, config.test_base.as_deref()),
    )?;
    write_list(&config.output_dir.join("total_affected.txt"), &lists.total_affected)?;
    write_list(
        &config.output_dir.join("srcs_modified.txt"),
        &rebase_all(&lists.src_modified, &config.root, config.src_base.as_deref()),
    )?;
    write_list(
        &config.output_dir.join("tests_modified.txt"),
        &rebase_all(&lists.test_modified, &config.root, config.test_base.as_deref()),
    )?;

    info!("done");
    Ok(())
}

/// Rewrites paths relative to `base` for output, when one is configured.
/// The union list (`total_affected`) is left root-relative since it may
/// mix source and test files with different bases.
fn rebase_all(paths: &[RelPath], root: &Path, base: Option<&Path>) -> Vec<RelPath> {
    match base {
        None => paths.to_vec(),
        Some(b) => paths
            .iter()
            .map(|p| RelPath::relative_to(&root.join(p.to_pathbuf()), b).unwrap_or_else(|| p.clone()))
            .collect(),
    }
}

fn write_list(path: &Path, paths: &[RelPath]) -> anyhow::Result<()> {
    let mut out = String::new();
    for p in paths {
        out.push_str(&p.to_string());
        out.push('\n');
    }
    fs::write(path, out)?;
    Ok(())
}
