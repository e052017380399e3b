//! Explicit configuration record, threaded through the analyzer instead of
//! a process-wide configuration object and module-level constants.

use clap::Parser;
use std::path::PathBuf;

/// Source file extensions recognized when no `--extensions` flag is given.
pub const DEFAULT_EXTENSIONS: &[&str] = &["h", "hpp", "hh", "c", "cc", "cpp", "cxx"];

/// Filename the snapshot is read from and written to, under `input_dir`/`output_dir`.
pub const SNAPSHOT_FILE_NAME: &str = "lazyut.snapshot";

/// Bound on how many test-main candidates `affected::label_test_mains` will
/// record before giving up.
pub const MAX_MAIN_CANDIDATES: usize = 2;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// Project root; all other paths are resolved relative to this.
    #[clap(long, short, default_value = ".")]
    pub root: String,

    /// Source directories, relative to root (repeat flag or comma list).
    #[clap(long, value_delimiter = ',')]
    pub src: Vec<String>,

    /// Test directories, relative to root (repeat flag or comma list).
    #[clap(long, value_delimiter = ',')]
    pub test: Vec<String>,

    /// Where affected-file lists and the new snapshot are written.
    #[clap(long, default_value = "lazyut-out")]
    pub output_dir: String,

    /// Where the prior snapshot is read from (defaults to `output_dir`).
    #[clap(long)]
    pub input_dir: Option<String>,

    /// Recognized source file extensions (repeat flag or comma list).
    #[clap(long, value_delimiter = ',')]
    pub extensions: Vec<String>,

    /// Any path containing one of these substrings is skipped entirely.
    #[clap(long = "ignore", value_delimiter = ',')]
    pub ignore_substrings: Vec<String>,

    /// Extra search roots for bracketed and quoted includes.
    #[clap(long = "include-path", value_delimiter = ',')]
    pub include_paths: Vec<String>,

    /// Rewrite source-affected/modified paths relative to this base.
    #[clap(long)]
    pub src_base: Option<String>,

    /// Rewrite test-affected/modified paths relative to this base.
    #[clap(long)]
    pub test_base: Option<String>,

    /// Path to a JSON file of manually declared extra dependency edges.
    #[clap(long)]
    pub extra_deps: Option<String>,

    /// Exclude test files that declare their own `main`.
    #[clap(long = "no-main")]
    pub no_main: bool,

    /// Emit tracing at debug level instead of info.
    #[clap(long, short = 'v')]
    pub verbal: bool,
}

#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    pub root: PathBuf,
    pub src_dirs: Vec<String>,
    pub test_dirs: Vec<String>,
    pub output_dir: PathBuf,
    pub input_dir: PathBuf,
    pub extensions: Vec<String>,
    pub ignore_substrings: Vec<String>,
    pub include_paths: Vec<PathBuf>,
    pub src_base: Option<PathBuf>,
    pub test_base: Option<PathBuf>,
    pub extra_deps_file: Option<PathBuf>,
    pub no_main: bool,
    pub verbal: bool,
}

impl Args {
    pub fn into_config(self) -> AnalyzerConfig {
        let root = PathBuf::from(&self.root)
            .canonicalize()
            .unwrap_or_else(|_| PathBuf::from(&self.root));

        let output_dir = root.join(&self.output_dir);
        let input_dir = self
            .input_dir
            .map(|d| root.join(d))
            .unwrap_or_else(|| output_dir.clone());

        let extensions = if self.extensions.is_empty() {
            DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect()
        } else {
            self.extensions
        };

        AnalyzerConfig {
            root: root.clone(),
            src_dirs: self.src,
            test_dirs: self.test,
            output_dir,
            input_dir,
            extensions,
            ignore_substrings: self.ignore_substrings,
            include_paths: self.include_paths.into_iter().map(|p| root.join(p)).collect(),
            src_base: self.src_base.map(|p| root.join(p)),
            test_base: self.test_base.map(|p| root.join(p)),
            extra_deps_file: self.extra_deps.map(|p| root.join(p)),
            no_main: self.no_main,
            verbal: self.verbal,
        }
    }
}
