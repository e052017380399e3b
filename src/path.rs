//! Platform-normalized relative paths.
//!
//! A `RelPath` is a sequence of segments, always stored and compared with
//! forward-slash semantics regardless of the host platform, since the
//! analyzer's output (affected-file lists) is a slash-separated text format
//! that must be stable across the machines that produce and consume it.

use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct RelPath {
    segments: Vec<String>,
}

impl RelPath {
    pub fn root() -> Self {
        RelPath { segments: Vec::new() }
    }

    /// Parses a path string, normalizing separators and collapsing `.`/`..`.
    pub fn parse(s: &str) -> Self {
        let mut segments: Vec<String> = Vec::new();
        for part in s.split(['/', '\\']) {
            match part {
                "" | "." => continue,
                ".." => {
                    segments.pop();
                }
                seg => segments.push(seg.to_string()),
            }
        }
        RelPath { segments }
    }

    pub fn from_segments(segments: Vec<String>) -> Self {
        RelPath { segments }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn file_name(&self) -> Option<&str> {
        self.segments.last().map(|s| s.as_str())
    }

    pub fn parent(&self) -> RelPath {
        let mut segments = self.segments.clone();
        segments.pop();
        RelPath { segments }
    }

    pub fn join(&self, child: &str) -> RelPath {
        let mut segments = self.segments.clone();
        segments.push(child.to_string());
        RelPath { segments }
    }

    pub fn to_pathbuf(&self) -> PathBuf {
        self.segments.iter().collect()
    }

    /// Builds a `RelPath` from `absolute`, stripped of `base`. Used to
    /// rewrite output paths relative to a configured `src_base`/`test_base`.
    pub fn relative_to(absolute: &Path, base: &Path) -> Option<RelPath> {
        let rel = pathdiff::diff_paths(absolute, base)?;
        Some(RelPath::parse(&rel.to_string_lossy()))
    }
}

impl fmt::Display for RelPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("/"))
    }
}
