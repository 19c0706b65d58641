//! Library and build plans over fixture libraries

use mason_build::*;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing_test::traced_test;

fn create_library(files: &[&str]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for file in files {
        let full = dir.path().join(file);
        fs::create_dir_all(full.parent().unwrap()).unwrap();
        fs::write(full, "").unwrap();
    }
    fs::write(
        dir.path().join("library.toml"),
        "name = \"widgets\"\nuses = [\"acme/fmt\"]\nlinks = [\"sys/pthread\", \"acme/fmt\"]\n",
    )
    .unwrap();
    dir
}

fn all_params() -> LibraryBuildParams {
    LibraryBuildParams {
        out_subdir: PathBuf::from("out"),
        build_tests: true,
        build_apps: true,
        enable_warnings: true,
        test_uses: vec![Usage::new("catch", "main")],
    }
}

fn rel_sources(plans: &[CompileFilePlan]) -> Vec<PathBuf> {
    plans
        .iter()
        .map(|p| p.source.relative_path().to_path_buf())
        .collect()
}

#[test]
fn test_full_library_plan() {
    let temp = create_library(&[
        "src/widgets/button.cpp",
        "src/widgets/detail.hpp",
        "src/widgets/button.test.cpp",
        "src/widgets/demo.main.cpp",
        "include/widgets/button.hpp",
    ]);
    let lib = LibraryRoot::from_directory(temp.path(), "").unwrap();
    let plan = LibraryPlan::create(&lib, &all_params(), Some("acme/widgets"));
    let tc = Toolchain::default();

    assert_eq!(plan.qualified_name, "acme/widgets");
    assert_eq!(plan.output_dir, PathBuf::from("out"));

    let archive = plan.archive.plan().expect("library has sources");
    assert_eq!(archive.archive_file_path(&tc), PathBuf::from("out/libwidgets.a"));
    assert_eq!(
        archive.object_files(&tc),
        vec![PathBuf::from("out/obj/widgets/button.cpp.o")]
    );

    assert_eq!(
        rel_sources(&plan.header_checks),
        vec![
            PathBuf::from("widgets/detail.hpp"),
            PathBuf::from("widgets/button.hpp"),
        ]
    );
    assert!(plan.header_checks.iter().all(|c| c.rules.syntax_only()));
    assert!(plan.header_checks[0]
        .rules
        .include_dirs()
        .contains(&temp.path().join("src")));
    assert!(!plan.header_checks[1]
        .rules
        .include_dirs()
        .contains(&temp.path().join("src")));

    assert_eq!(
        plan.links,
        vec![Usage::new("acme", "fmt"), Usage::new("sys", "pthread")]
    );

    let apps: Vec<_> = plan.executables_of(ExecutableKind::App).collect();
    let tests: Vec<_> = plan.executables_of(ExecutableKind::Test).collect();
    assert_eq!(apps.len(), 1);
    assert_eq!(tests.len(), 1);
    assert_eq!(apps[0].exe_path(&tc), PathBuf::from("out/widgets/demo"));
    assert_eq!(tests[0].exe_path(&tc), PathBuf::from("out/test/widgets/button"));
    assert!(tests[0].links.contains(&Usage::new("catch", "main")));
    assert!(!apps[0].links.contains(&Usage::new("catch", "main")));
    assert_eq!(
        tests[0].main_compile.object_file_path(&tc),
        PathBuf::from("out/obj/widgets/button.test.cpp.o")
    );
}

#[test]
fn test_header_only_library_has_no_archive() {
    let temp = create_library(&["include/widgets/button.hpp"]);
    let lib = LibraryRoot::from_directory(temp.path(), "").unwrap();
    let plan = LibraryPlan::create(&lib, &all_params(), None);

    assert_eq!(plan.archive, Archive::HeaderOnly);
    assert_eq!(plan.qualified_name, "widgets");
    assert_eq!(plan.header_checks.len(), 1);
}

#[test]
fn test_disabled_tests_and_apps() {
    let temp = create_library(&[
        "src/a.cpp",
        "src/a.hpp",
        "src/a.test.cpp",
        "src/a.main.cpp",
        "include/b.hpp",
    ]);
    let lib = LibraryRoot::from_directory(temp.path(), "").unwrap();
    let params = LibraryBuildParams {
        out_subdir: PathBuf::from("out"),
        ..Default::default()
    };
    let plan = LibraryPlan::create(&lib, &params, None);

    assert!(plan.executables.is_empty());
    assert!(plan.header_checks.is_empty());
    assert!(plan.archive.plan().is_some());
}

#[test]
fn test_templates_add_codegen_include_dir() {
    let temp = create_library(&["src/widgets/version.config.hpp", "src/widgets/a.cpp"]);
    let lib = LibraryRoot::from_directory(temp.path(), "libs/widgets").unwrap();
    let plan = LibraryPlan::create(&lib, &all_params(), None);

    let gen = PathBuf::from("__mason/gen/out/libs/widgets");
    assert_eq!(plan.generated_include_dir(), Some(gen.clone()));
    assert_eq!(plan.templates.len(), 1);
    assert_eq!(
        plan.templates[0].output_file_path(),
        gen.join("widgets/version.hpp")
    );
    let archive = plan.archive.plan().unwrap();
    assert!(archive.compile_files[0].rules.include_dirs().contains(&gen));
}

#[test]
#[traced_test]
fn test_source_in_include_is_a_warning() {
    let temp = create_library(&["include/oops.cpp", "include/ok.hpp"]);
    let lib = LibraryRoot::from_directory(temp.path(), "").unwrap();
    let plan = LibraryPlan::create(&lib, &all_params(), None);

    assert!(logs_contain("Not a header"));
    assert_eq!(plan.archive, Archive::HeaderOnly);
    assert_eq!(rel_sources(&plan.header_checks), vec![PathBuf::from("ok.hpp")]);
}

#[test]
fn test_duplicate_qualified_name_is_rejected() {
    let temp = create_library(&["src/a.cpp"]);
    let manifest = mason_package::PackageManifest::from_str(
        "name = \"widgets\"\nnamespace = \"acme\"\nversion = \"1.0.0\"\n",
    )
    .unwrap();

    let params = all_params();
    let mut plan = BuildPlan::new();
    plan.add_package(plan_package(&manifest, temp.path(), &params).unwrap())
        .unwrap();
    let err = plan
        .add_package(plan_package(&manifest, temp.path(), &params).unwrap())
        .unwrap_err();

    assert!(matches!(err, BuildError::DuplicateLibrary { ref name } if name == "acme/widgets"));
    assert_eq!(plan.packages.len(), 1);
    assert!(plan.find_library("acme/widgets").is_some());
}

#[test]
fn test_object_suffix_follows_toolchain() {
    let temp = create_library(&["src/a.cpp"]);
    let lib = LibraryRoot::from_directory(temp.path(), "").unwrap();
    let plan = LibraryPlan::create(&lib, &all_params(), None);
    let tc = Toolchain {
        object_suffix: ".obj".to_string(),
        archive_prefix: String::new(),
        archive_suffix: ".lib".to_string(),
        ..Toolchain::default()
    };
    let archive = plan.archive.plan().unwrap();

    assert_eq!(archive.archive_file_path(&tc), Path::new("out/widgets.lib"));
    assert_eq!(archive.object_files(&tc), vec![PathBuf::from("out/obj/a.cpp.obj")]);
}

#[test]
fn test_top_level_executables_have_clean_dirs() {
    let temp = create_library(&["src/tool.main.cpp", "src/t.test.cpp", "src/a.cpp"]);
    let lib = LibraryRoot::from_directory(temp.path(), "").unwrap();
    let plan = LibraryPlan::create(&lib, &all_params(), None);

    // Path equality ignores a trailing separator, so compare the text
    assert_eq!(plan.output_dir.to_str(), Some("out"));
    let apps: Vec<_> = plan.executables_of(ExecutableKind::App).collect();
    let tests: Vec<_> = plan.executables_of(ExecutableKind::Test).collect();
    assert_eq!(apps[0].out_subdir.to_str(), Some("out"));
    assert_eq!(tests[0].out_subdir.to_str(), Some("out/test"));
    assert_eq!(
        apps[0].exe_path(&Toolchain::default()).to_str(),
        Some("out/tool")
    );
}
