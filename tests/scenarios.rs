//! End-to-end scenarios driving the full pipeline (traversal -> hash ->
//! snapshot diff -> parse -> resolve -> install edges -> reachability ->
//! affected-set extraction) against small file trees on disk.

use lazyut::analyzer;
use lazyut::config::{AnalyzerConfig, DEFAULT_EXTENSIONS};
use lazyut::parser::RegexParser;
use lazyut::path::RelPath;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write_files(root: &Path, files: &[(&str, &str)]) {
    for (rel, contents) in files {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, contents).unwrap();
    }
}

fn base_config(root: &Path, out_dir: &Path) -> AnalyzerConfig {
    AnalyzerConfig {
        root: root.to_path_buf(),
        src_dirs: vec!["src".to_string()],
        test_dirs: vec!["test".to_string()],
        output_dir: out_dir.to_path_buf(),
        input_dir: out_dir.to_path_buf(),
        extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
        ignore_substrings: Vec::new(),
        // test files live in a different directory than the headers they
        // quote-include, so the src dir doubles as an include path.
        include_paths: vec![root.join("src")],
        src_base: None,
        test_base: None,
        extra_deps_file: None,
        no_main: false,
        verbal: false,
    }
}

fn rel(path: &str) -> RelPath {
    RelPath::parse(path)
}

/// S1 - single include edit: modifying the header affects both the header
/// and its implementation file, and every test that includes it.
#[test]
fn s1_single_include_edit() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write_files(
        root,
        &[
            ("src/a.h", "void foo();\n"),
            ("src/a.c", "#include \"a.h\"\nvoid foo() {\n}\n"),
            ("test/test_a.c", "#include \"a.h\"\n"),
        ],
    );

    let out = root.join("out");
    let config = base_config(root, &out);
    analyzer::run(&config, &RegexParser).unwrap();

    write_files(root, &[("src/a.h", "void foo();\n// widened contract\n")]);
    let lists = analyzer::run(&config, &RegexParser).unwrap();

    assert_eq!(lists.src_affected, vec![rel("src/a.c"), rel("src/a.h")]);
    assert_eq!(lists.test_affected, vec![rel("test/test_a.c")]);
}

/// S2 - implementation change. `a.h` and `a.c` form a 2-node cycle (`a.c`
/// includes `a.h`; `a.h` depends on its own implementation file), so
/// modifying the implementation marks both affected, same as the reverse.
#[test]
fn s2_implementation_change() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write_files(
        root,
        &[
            ("src/a.h", "void foo();\n"),
            ("src/a.c", "#include \"a.h\"\nvoid foo() {\n}\n"),
            ("test/test_a.c", "#include \"a.h\"\n"),
        ],
    );

    let out = root.join("out");
    let config = base_config(root, &out);
    analyzer::run(&config, &RegexParser).unwrap();

    write_files(root, &[("src/a.c", "#include \"a.h\"\nvoid foo() {\n    return;\n}\n")]);
    let lists = analyzer::run(&config, &RegexParser).unwrap();

    assert_eq!(lists.src_affected, vec![rel("src/a.c"), rel("src/a.h")]);
    assert_eq!(lists.test_affected, vec![rel("test/test_a.c")]);
}

/// S3 - unrelated test: a second, disconnected component must never show up
/// as affected when only the first component changes.
#[test]
fn s3_unrelated_test_not_listed() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write_files(
        root,
        &[
            ("src/a.h", "void foo();\n"),
            ("src/a.c", "#include \"a.h\"\nvoid foo() {\n}\n"),
            ("test/test_a.c", "#include \"a.h\"\n"),
            ("src/b.h", "void bar();\n"),
            ("src/b.c", "#include \"b.h\"\nvoid bar() {\n}\n"),
            ("test/test_b.c", "#include \"b.h\"\n"),
        ],
    );

    let out = root.join("out");
    let config = base_config(root, &out);
    analyzer::run(&config, &RegexParser).unwrap();

    write_files(root, &[("src/a.h", "void foo();\n// widened contract\n")]);
    let lists = analyzer::run(&config, &RegexParser).unwrap();

    assert!(lists.test_affected.contains(&rel("test/test_a.c")));
    assert!(!lists.test_affected.contains(&rel("test/test_b.c")));
    assert!(!lists.src_affected.contains(&rel("src/b.h")));
    assert!(!lists.src_affected.contains(&rel("src/b.c")));
}

/// S4 - inheritance propagation: modifying a base class header affects the
/// derived header, anything including it, and its test, but not unrelated
/// files. No implementation edges are involved, so there is no cycle.
#[test]
fn s4_inheritance_propagation() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write_files(
        root,
        &[
            ("src/base.h", "class Base {\n"),
            ("src/derived.h", "#include \"base.h\"\nclass Derived : public Base {\n"),
            ("src/use.c", "#include \"derived.h\"\n"),
            ("test/test_derived.c", "#include \"derived.h\"\n"),
        ],
    );

    let out = root.join("out");
    let config = base_config(root, &out);
    analyzer::run(&config, &RegexParser).unwrap();

    write_files(root, &[("src/base.h", "class Base {\n// widened contract\n")]);
    let lists = analyzer::run(&config, &RegexParser).unwrap();

    assert_eq!(
        lists.src_affected,
        vec![rel("src/base.h"), rel("src/derived.h"), rel("src/use.c")]
    );
    assert_eq!(lists.test_affected, vec![rel("test/test_derived.c")]);
}

/// S5 - cycle safety: mutually including headers must not hang the
/// reachability pass, and each ends up affected by a change to the other.
#[test]
fn s5_cycle_safety() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write_files(
        root,
        &[("src/x.h", "#include \"y.h\"\n"), ("src/y.h", "#include \"x.h\"\n")],
    );

    let out = root.join("out");
    let config = base_config(root, &out);
    analyzer::run(&config, &RegexParser).unwrap();

    write_files(root, &[("src/x.h", "#include \"y.h\"\n// widened contract\n")]);
    let lists = analyzer::run(&config, &RegexParser).unwrap();

    assert_eq!(lists.src_affected, vec![rel("src/x.h"), rel("src/y.h")]);
}

/// S6 - snapshot-less run: with no prior snapshot, every file is treated as
/// modified and the affected lists equal the full source and test sets.
#[test]
fn s6_snapshot_less_run_affects_everything() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write_files(
        root,
        &[
            ("src/a.h", "void foo();\n"),
            ("src/a.c", "#include \"a.h\"\nvoid foo() {\n}\n"),
            ("test/test_a.c", "#include \"a.h\"\n"),
        ],
    );

    let out = root.join("out");
    let config = base_config(root, &out);
    assert!(!config.input_dir.join("lazyut.snapshot").exists());

    let lists = analyzer::run(&config, &RegexParser).unwrap();

    assert_eq!(lists.src_affected, vec![rel("src/a.c"), rel("src/a.h")]);
    assert_eq!(lists.src_modified, vec![rel("src/a.c"), rel("src/a.h")]);
    assert_eq!(lists.test_affected, vec![rel("test/test_a.c")]);
    assert_eq!(lists.test_modified, vec![rel("test/test_a.c")]);
}

/// Re-running the analyzer with no further edits marks nothing modified and
/// reproduces the same (empty) affected lists.
#[test]
fn rerun_without_changes_yields_no_affected_files() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write_files(
        root,
        &[
            ("src/a.h", "void foo();\n"),
            ("src/a.c", "#include \"a.h\"\nvoid foo() {\n}\n"),
            ("test/test_a.c", "#include \"a.h\"\n"),
        ],
    );

    let out = root.join("out");
    let config = base_config(root, &out);
    analyzer::run(&config, &RegexParser).unwrap();

    let lists = analyzer::run(&config, &RegexParser).unwrap();

    assert!(lists.src_affected.is_empty());
    assert!(lists.test_affected.is_empty());
    assert!(lists.src_modified.is_empty());
    assert!(lists.test_modified.is_empty());
}

/// Extra-deps file installs an edge between files with no textual or
/// symbolic relationship; modifying one source side-affects the other.
#[test]
fn extra_deps_file_installs_manual_edge() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write_files(
        root,
        &[("src/gen.h", "// generated\n"), ("src/consumer.c", "// reads gen.h at codegen time\n")],
    );
    let extra_deps_path = root.join("extra_deps.json");
    fs::write(&extra_deps_path, r#"[{"from": "src/consumer.c", "to": "src/gen.h"}]"#).unwrap();

    let out = root.join("out");
    let mut config = base_config(root, &out);
    config.extra_deps_file = Some(extra_deps_path);
    analyzer::run(&config, &RegexParser).unwrap();

    write_files(root, &[("src/gen.h", "// regenerated\n")]);
    let lists = analyzer::run(&config, &RegexParser).unwrap();

    assert!(lists.src_affected.contains(&rel("src/consumer.c")));
    assert!(lists.src_affected.contains(&rel("src/gen.h")));
}
