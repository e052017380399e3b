//! Directory traversal collaborator.
//!
//! Walks each configured source/test directory with a git-ignore-aware
//! `ignore::WalkBuilder`, filtering by recognized extension and any
//! configured ignore substring.

use crate::config::AnalyzerConfig;
use crate::error::AnalyzerError;
use crate::path::RelPath;
use crate::tree::node::NodeFlags;
use crate::tree::FileTree;
use ignore::WalkBuilder;
use tracing::warn;

/// Populates `tree` with every recognized source file under `config`'s
/// src and test directories. Test-directory files are additionally
/// flagged `TEST_FILE`; test directories are scanned as sources too.
pub fn read_sources(tree: &mut FileTree, config: &AnalyzerConfig) {
    for dir in &config.src_dirs {
        walk_dir(tree, config, dir, false);
    }
    for dir in &config.test_dirs {
        walk_dir(tree, config, dir, true);
    }
    for include_path in &config.include_paths {
        if let Some(rel) = RelPath::relative_to(include_path, &config.root) {
            tree.add_include_path(&rel);
        }
    }
    tree.state = crate::tree::TreeState::Filled;
}

fn walk_dir(tree: &mut FileTree, config: &AnalyzerConfig, dir_rel: &str, is_test: bool) {
    let abs_dir = config.root.join(dir_rel);
    if !abs_dir.exists() {
        warn!(dir = %abs_dir.display(), "configured directory does not exist; skipping");
        return;
    }

    let mut builder = WalkBuilder::new(&abs_dir);
    builder.git_ignore(true).git_exclude(true).git_global(true).hidden(true);

    let ignore_substrings = config.ignore_substrings.clone();
    builder.filter_entry(move |e| {
        if e.depth() == 0 {
            return true;
        }
        if let Some(name) = e.file_name().to_str() {
            if ignore_substrings.iter().any(|s| name.contains(s.as_str())) {
                return false;
            }
        }
        true
    });

    for entry in builder.build() {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                warn!(%err, "walk error");
                continue;
            }
        };
        if entry.depth() == 0 || !entry.file_type().map(|ft| ft.is_file()).unwrap_or(false) {
            continue;
        }

        let path = entry.path();
        let ext_ok = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|ext| config.extensions.iter().any(|c| c == ext))
            .unwrap_or(false);
        if !ext_ok {
            continue;
        }

        let Some(rel) = RelPath::relative_to(path, &config.root) else {
            warn!(path = %path.display(), "could not compute path relative to root; skipping");
            continue;
        };
        if config.ignore_substrings.iter().any(|s| rel.to_string().contains(s.as_str())) {
            continue;
        }

        let node = tree.add_file(&rel);
        if is_test {
            tree.graph[node].flags |= NodeFlags::TEST_FILE;
        }
    }
}

/// Errors bubbled up here are always `Usage`. A directory configured on
/// the command line that cannot be resolved at all is a CLI mistake, not a
/// per-file IO hiccup.
pub fn validate_config(config: &AnalyzerConfig) -> Result<(), AnalyzerError> {
    if config.src_dirs.is_empty() && config.test_dirs.is_empty() {
        return Err(AnalyzerError::Usage("at least one --src or --test directory is required".into()));
    }
    Ok(())
}
