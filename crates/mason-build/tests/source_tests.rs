//! Source collection over real directory trees

use mason_build::*;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn create_tree(files: &[&str]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for file in files {
        let full = dir.path().join(file);
        fs::create_dir_all(full.parent().unwrap()).unwrap();
        fs::write(full, "").unwrap();
    }
    dir
}

#[test]
fn test_collect_sources_classifies_and_skips() {
    let temp = create_tree(&[
        "src/z.cpp",
        "src/a/b.hpp",
        "src/a/b.test.cpp",
        "src/tool.main.cpp",
        "src/ver.config.hpp",
        "src/impl.tpp",
        "src/notes.txt",
    ]);
    let root = SourceRoot::new(temp.path().join("src"), RootRole::Src);

    let found: Vec<(String, SourceKind)> = root
        .collect_sources()
        .unwrap()
        .iter()
        .map(|sf| (sf.relative_path().to_string_lossy().into_owned(), sf.kind))
        .collect();

    assert_eq!(
        found,
        vec![
            ("a/b.hpp".to_string(), SourceKind::PrivateHeader),
            ("a/b.test.cpp".to_string(), SourceKind::Test),
            ("impl.tpp".to_string(), SourceKind::HeaderImpl),
            ("tool.main.cpp".to_string(), SourceKind::App),
            ("ver.config.hpp".to_string(), SourceKind::HeaderTemplate),
            ("z.cpp".to_string(), SourceKind::Source),
        ]
    );
}

#[test]
fn test_rescan_is_order_stable() {
    let temp = create_tree(&["src/b.cpp", "src/a.cpp", "src/c/d.cpp", "include/x.hpp"]);
    let first = LibraryRoot::from_directory(temp.path(), "").unwrap();
    let second = LibraryRoot::from_directory(temp.path(), "").unwrap();
    assert_eq!(first.all_sources(), second.all_sources());

    let root = first.src_source_root();
    let lazy: Vec<_> = root.iter().map(Result::unwrap).collect();
    let again: Vec<_> = root.iter().map(Result::unwrap).collect();
    assert_eq!(lazy, again);
}

#[test]
fn test_collect_libraries_finds_libs_subdirs() {
    let temp = create_tree(&[
        "src/root.cpp",
        "libs/beta/include/beta.hpp",
        "libs/alpha/src/alpha.cpp",
    ]);
    fs::write(
        temp.path().join("libs/alpha/library.toml"),
        "name = \"alpha-core\"\nuses = [\"acme/beta\"]\n",
    )
    .unwrap();

    let libs = collect_libraries(temp.path(), "gadgets").unwrap();
    let names: Vec<&str> = libs.iter().map(|l| l.manifest().name.as_str()).collect();

    assert_eq!(names, vec!["gadgets", "alpha-core", "beta"]);
    assert_eq!(libs[0].path_namespace(), Path::new(""));
    assert_eq!(libs[1].path_namespace(), Path::new("libs/alpha"));
    assert_eq!(libs[1].manifest().uses, vec![Usage::new("acme", "beta")]);
}

#[test]
fn test_collect_libraries_on_empty_dir() {
    let temp = TempDir::new().unwrap();
    assert!(collect_libraries(temp.path(), "empty").unwrap().is_empty());
}
