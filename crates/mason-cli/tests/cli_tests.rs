//! End-to-end tests for the mason binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn mason(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("mason").unwrap();
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env_remove("MASON_OUT_DIR")
        .env_remove("MASON_DEPS_MODE")
        .env_remove("MASON_REPO")
        .env_remove("MASON_LOG");
    cmd
}

fn write_file(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// A project depending on `fmt`, and a repository holding it
fn create_workspace() -> TempDir {
    let temp = TempDir::new().unwrap();
    let project = temp.path().join("app");
    write_file(
        &project.join("package.toml"),
        "name = \"app\"\nnamespace = \"acme\"\nversion = \"0.1.0\"\ndepends = [\"fmt@^7.0.0\"]\n",
    );
    write_file(&project.join("mason.toml"), "[build]\nout_dir = \"out\"\n");
    write_file(&project.join("src/app/core.cpp"), "");
    write_file(&project.join("src/app/core.test.cpp"), "");
    write_file(&project.join("src/app/tool.main.cpp"), "");

    let fmt = temp.path().join("repo/fmt@7.1.3");
    write_file(
        &fmt.join("package.toml"),
        "name = \"fmt\"\nnamespace = \"fmt\"\nversion = \"7.1.3\"\n",
    );
    write_file(&fmt.join("src/fmt/format.cpp"), "");
    write_file(&fmt.join("include/fmt/format.hpp"), "");
    temp
}

#[test]
fn test_plan_lists_libraries() {
    let temp = create_workspace();
    mason(&temp.path().join("app"))
        .args(["plan", "--repo", "../repo"])
        .assert()
        .success()
        .stdout(predicate::str::contains("fmt/fmt: _deps/fmt@7.1.3/libfmt.a"))
        .stdout(predicate::str::contains("acme/app: libapp.a"))
        .stdout(predicate::str::contains("test test/app/core"))
        .stdout(predicate::str::contains("app app/tool"));
}

#[test]
fn test_plan_json() {
    let temp = create_workspace();
    let output = mason(&temp.path().join("app"))
        .args(["plan", "--repo", "../repo", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let plan: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let packages = plan["packages"].as_array().unwrap();
    assert_eq!(packages.len(), 2);
    assert_eq!(packages[0]["name"], "fmt");
    assert_eq!(packages[1]["libraries"][0]["archive"]["kind"], "static");
}

#[test]
fn test_unresolvable_dependency_fails() {
    let temp = create_workspace();
    mason(&temp.path().join("app"))
        .arg("plan")
        .assert()
        .failure()
        .stderr(predicate::str::contains("fmt@^7.0.0"));
}

#[test]
fn test_missing_package_manifest_fails() {
    let temp = TempDir::new().unwrap();
    mason(temp.path())
        .arg("plan")
        .assert()
        .failure()
        .stderr(predicate::str::contains("package.toml"));
}

#[test]
fn test_index_written_to_out_dir() {
    let temp = create_workspace();
    let project = temp.path().join("app");
    mason(&project)
        .args(["index", "--repo", "../repo"])
        .assert()
        .success();

    let index: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(project.join("out/index.json")).unwrap())
            .unwrap();
    assert_eq!(
        index["libraries"]["fmt/fmt"]["archive"],
        "_deps/fmt@7.1.3/libfmt.a"
    );
    assert!(index["libraries"]["acme/app"].is_object());
}

#[test]
fn test_record_deps_then_status() {
    let temp = create_workspace();
    let project = temp.path().join("app");
    let source = project.join("src/app/core.cpp");
    write_file(
        &project.join("core.o.d"),
        &format!("out/obj/app/core.cpp.o: {}\n", source.display()),
    );

    mason(&project)
        .args(["record-deps", "--command", "cc -c core.cpp", "core.o.d"])
        .assert()
        .success();

    mason(&project)
        .args(["status", "out/obj/app/core.cpp.o"])
        .assert()
        .success()
        .stdout(predicate::str::contains("inputs unchanged"))
        .stdout(predicate::str::contains("cc -c core.cpp"));

    fs::remove_file(&source).unwrap();
    let output = mason(&project)
        .args(["status", "out/obj/app/core.cpp.o", "--json"])
        .output()
        .unwrap();
    let status: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(status["built"], true);
    assert_eq!(status["changed"].as_array().unwrap().len(), 1);
}

#[test]
fn test_status_of_unknown_output() {
    let temp = create_workspace();
    mason(&temp.path().join("app"))
        .args(["status", "never.o"])
        .assert()
        .success()
        .stdout(predicate::str::contains("never built"));
}

#[test]
fn test_record_deps_msvc_mode_echoes_clean_output() {
    let temp = create_workspace();
    let project = temp.path().join("app");
    let source = project.join("src/app/core.cpp");
    write_file(
        &project.join("cl.log"),
        &format!(
            "core.cpp\nNote: including file: {}\nwarning C4100: unused\n",
            source.display()
        ),
    );

    mason(&project)
        .env("MASON_DEPS_MODE", "msvc")
        .args([
            "record-deps",
            "--command",
            "cl /c core.cpp",
            "--output",
            "core.obj",
            "cl.log",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("warning C4100"))
        .stdout(predicate::str::contains("Note: including file").not());
}

#[test]
fn test_malformed_listing_forgets_prior_record() {
    let temp = create_workspace();
    let project = temp.path().join("app");
    let source = project.join("src/app/core.cpp");
    write_file(
        &project.join("core.o.d"),
        &format!("out/obj/app/core.cpp.o: {}\n", source.display()),
    );
    write_file(&project.join("bad.d"), "this is not a make rule\n");

    mason(&project)
        .args(["record-deps", "--command", "cc -c core.cpp", "core.o.d"])
        .assert()
        .success();

    mason(&project)
        .args([
            "record-deps",
            "--command",
            "cc -c core.cpp",
            "--output",
            "out/obj/app/core.cpp.o",
            "bad.d",
        ])
        .assert()
        .success();

    mason(&project)
        .args(["status", "out/obj/app/core.cpp.o"])
        .assert()
        .success()
        .stdout(predicate::str::contains("never built"));
}

#[test]
fn test_deps_mode_none_records_nothing() {
    let temp = create_workspace();
    let project = temp.path().join("app");

    mason(&project)
        .env("MASON_DEPS_MODE", "none")
        .args([
            "record-deps",
            "--command",
            "cc -c core.cpp",
            "--output",
            "out/obj/app/core.cpp.o",
        ])
        .assert()
        .success();

    mason(&project)
        .args(["status", "out/obj/app/core.cpp.o"])
        .assert()
        .success()
        .stdout(predicate::str::contains("never built"));
}

#[test]
fn test_malformed_listing_without_output_fails() {
    let temp = create_workspace();
    let project = temp.path().join("app");
    write_file(&project.join("bad.d"), "this is not a make rule\n");

    mason(&project)
        .args(["record-deps", "--command", "cc -c core.cpp", "bad.d"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No output path given"));
}
