use context_copy::test_utils::SnapshotFixture;
use predicates::prelude::*;

use crate::common::TestWorkspace;

fn foo_workspace() -> (TestWorkspace, String) {
    let ws = TestWorkspace::new().unwrap();
    let snapshot = ws.write_snapshot(&SnapshotFixture::foo_class()).unwrap();
    (ws, snapshot.display().to_string())
}

#[test]
fn test_symbols_prints_copy_text() {
    let (ws, snapshot) = foo_workspace();
    ws.ctxcopy()
        .args(["symbols", "--snapshot", &snapshot, "--file", "a.ts", "--line", "2", "--column", "3"])
        .assert()
        .success()
        .stdout(predicate::str::diff(
            "''' a.ts '''\nclass Foo {\n    ...\n    ### lines 2 - 4\n    bar() {\n    return this.baz();\n  }\n\n    ### lines 6 - 8\n    baz() {\n    return 2;\n  }\n",
        ));
}

#[test]
fn test_symbols_imports_report() {
    let (ws, snapshot) = foo_workspace();
    ws.ctxcopy()
        .args(["symbols", "--snapshot", &snapshot, "--file", "a.ts", "--line", "2", "--column", "3"])
        .arg("--imports")
        .assert()
        .success()
        .stdout(predicate::str::diff("No relevant imports found for file: a.ts\n"));
}

#[test]
fn test_symbols_tree_with_glyphs_after_uncheck() {
    let (ws, snapshot) = foo_workspace();
    ws.ctxcopy()
        .args(["symbols", "--snapshot", &snapshot, "--file", "a.ts", "--line", "2", "--column", "3"])
        .args(["--uncheck", "bar/baz", "--tree", "--glyphs"])
        .assert()
        .success()
        .stdout(predicate::str::diff("[x] bar\n└── [ ] baz\n"));
}

#[test]
fn test_repeated_uncheck_stays_unchecked() {
    let (ws, snapshot) = foo_workspace();
    ws.ctxcopy()
        .args(["symbols", "--snapshot", &snapshot, "--file", "a.ts", "--line", "2", "--column", "3"])
        .args(["--uncheck", "bar/baz", "--uncheck", "bar/baz", "--tree", "--glyphs"])
        .assert()
        .success()
        .stdout(predicate::str::diff("[x] bar\n└── [ ] baz\n"));
}

#[test]
fn test_toggle_children_unchecks_callees() {
    let (ws, snapshot) = foo_workspace();
    ws.ctxcopy()
        .args(["symbols", "--snapshot", &snapshot, "--file", "a.ts", "--line", "2", "--column", "3"])
        .args(["--toggle-children", "bar"])
        .assert()
        .success()
        .stdout(predicate::str::contains("### lines 2 - 4").and(predicate::str::contains("baz()").not()));
}

#[test]
fn test_configured_roots_do_not_affect_snapshot_membership() {
    let (ws, snapshot) = foo_workspace();
    ws.write_config("workspace_roots = [\"/elsewhere\"]").unwrap();
    ws.ctxcopy()
        .args(["symbols", "--snapshot", &snapshot, "--file", "a.ts", "--line", "2", "--column", "3"])
        .args(["--tree"])
        .assert()
        .success()
        .stdout(predicate::str::diff("bar\n└── baz\n"));
}

#[test]
fn test_empty_selection_is_not_an_error() {
    let (ws, snapshot) = foo_workspace();
    ws.ctxcopy()
        .args(["symbols", "--snapshot", &snapshot, "--file", "a.ts", "--line", "2", "--column", "3"])
        .args(["--uncheck", "bar"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("No checked dependency items to copy."));
}

#[test]
fn test_unresolvable_position_exits_with_error() {
    let (ws, snapshot) = foo_workspace();
    ws.ctxcopy()
        .args(["symbols", "--snapshot", &snapshot, "--file", "a.ts", "--line", "10"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Could not resolve a symbol or file"));
}

#[test]
fn test_unknown_node_id_exits_with_error() {
    let (ws, snapshot) = foo_workspace();
    ws.ctxcopy()
        .args(["symbols", "--snapshot", &snapshot, "--file", "a.ts", "--line", "2", "--column", "3"])
        .args(["--uncheck", "bar/qux"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("bar/qux"));
}

#[test]
fn test_invalid_snapshot_reported() {
    let ws = TestWorkspace::new().unwrap();
    ws.write_file("bad.json", r##"{"files":[{"path":"a.ts","symbols":[{"name":"f","kind":"function","range":{"start":{"line":0,"column":0},"end":{"line":0,"column":1}},"calls":["#missing"]}]}]}"##)
        .unwrap();
    ws.ctxcopy()
        .args(["symbols", "--snapshot", "bad.json", "--file", "a.ts"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid workspace snapshot"));
}

#[test]
fn test_malformed_config_reported() {
    let (ws, snapshot) = foo_workspace();
    ws.write_config("workspace_roots = 3").unwrap();
    ws.ctxcopy()
        .args(["symbols", "--snapshot", &snapshot, "--file", "a.ts"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("TOML parsing error").and(predicate::str::contains("config file")));
}

#[cfg(unix)]
#[test]
fn test_imports_with_configured_parser() {
    use context_copy::test_utils::ImportFixture;

    let project = ImportFixture::new()
        .file("main.py", "import util")
        .file("util.py", "X = 1")
        .imports("main.py", &[("util", "util.py")])
        .build()
        .unwrap();

    let ws = TestWorkspace::new().unwrap();
    ws.write_config(&format!("python = \"sh\"\nimport_script = \"{}\"\n", project.script.display()))
        .unwrap();
    ws.ctxcopy()
        .arg("imports")
        .arg(project.path("main.py"))
        .arg("--workspace")
        .arg(&project.root)
        .assert()
        .success()
        .stdout(predicate::str::diff("''' main.py '''\nimport util\n\n''' util.py '''\nX = 1\n"));
}
