//! Source parsing collaborator: a regex-based heuristic extractor in place
//! of a real lexer/tokenizer, used as the pragmatic default.

use crate::record::{FileRecord, InheritsFrom};
use crate::symbol::ScopedName;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

/// A parse callback per file. The core only ever talks to this trait;
/// `RegexParser` is the concrete default, but any implementation (a real
/// lexer, a tree-sitter grammar) can be swapped in.
pub trait SourceParser: Send + Sync {
    fn parse(&self, path: &Path, bytes: &[u8]) -> FileRecord;
}

static INCLUDE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^\s*#\s*include\s*(?:"([^"]+)"|<([^>]+)>)"#).unwrap());

static USING_NAMESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*using\s+namespace\s+([A-Za-z_][A-Za-z0-9_:]*)\s*;").unwrap());

static CLASS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:class|struct)\s+([A-Za-z_][A-Za-z0-9_]*)\s*(?::\s*([^{]+))?\{").unwrap()
});

static DECL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*[A-Za-z_][A-Za-z0-9_:<>, \*&]*\s+([A-Za-z_][A-Za-z0-9_]*)\s*\([^;{]*\)\s*;").unwrap()
});

static IMPL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*[A-Za-z_][A-Za-z0-9_:<>, \*&]*\s+((?:[A-Za-z_][A-Za-z0-9_]*::)*[A-Za-z_][A-Za-z0-9_]*)\s*\([^;{]*\)\s*\{",
    )
    .unwrap()
});

static BASE_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:public|private|protected)?\s*([A-Za-z_][A-Za-z0-9_:]*)").unwrap());

/// Regex-based heuristic extractor. Recognizes includes, class/struct
/// declarations (with single and multiple inheritance), declaration-only
/// prototypes, implementations (qualified or file-scope, including a bare
/// `main`), and `using namespace` directives. Each is one independent regex
/// match per physical line, so a malformed line simply contributes nothing
/// rather than aborting the rest of the file; partial facts are kept.
pub struct RegexParser;

impl SourceParser for RegexParser {
    fn parse(&self, _path: &Path, bytes: &[u8]) -> FileRecord {
        let text = String::from_utf8_lossy(bytes);
        let mut record = FileRecord::new();

        for line in text.lines() {
            if let Some(caps) = INCLUDE_RE.captures(line) {
                if let Some(m) = caps.get(1) {
                    record.includes.push(crate::record::IncludeDirective {
                        quoted: true,
                        filename: m.as_str().to_string(),
                    });
                } else if let Some(m) = caps.get(2) {
                    record.includes.push(crate::record::IncludeDirective {
                        quoted: false,
                        filename: m.as_str().to_string(),
                    });
                }
                continue;
            }

            if let Some(caps) = USING_NAMESPACE_RE.captures(line) {
                record.using_namespaces.push(ScopedName::parse(&caps[1]));
                continue;
            }

            if let Some(caps) = CLASS_RE.captures(line) {
                let class_name = ScopedName::parse(&caps[1]);
                if let Some(bases) = caps.get(2) {
                    for base in bases.as_str().split(',') {
                        if let Some(bc) = BASE_NAME_RE.captures(base.trim()) {
                            record.inheritances.push(InheritsFrom {
                                derived: class_name.clone(),
                                base: ScopedName::parse(&bc[1]),
                            });
                        }
                    }
                }
                record.declared_classes.push(class_name);
                continue;
            }

            if let Some(caps) = IMPL_RE.captures(line) {
                record.implementations.push(ScopedName::parse(&caps[1]));
                continue;
            }

            if let Some(caps) = DECL_RE.captures(line) {
                record.declared_functions.push(ScopedName::parse(&caps[1]));
                continue;
            }
        }

        record
    }
}
