use assert_cmd::Command;

fn shelf() -> Command {
    let mut cmd = Command::cargo_bin("shelf").unwrap();
    cmd.env("SHELF_CONFIG_DIR", std::env::temp_dir().join("shelf-cli-no-config"))
        .env("SHELF_ENV", "local")
        .env("SHELF_STORE__BACKEND", "memory")
        .env("RUST_LOG", "off");
    cmd
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.assert().success().get_output().stdout.clone();
    String::from_utf8(output).unwrap()
}

fn stderr_of_failure(cmd: &mut Command) -> String {
    let output = cmd.assert().failure().get_output().stderr.clone();
    String::from_utf8(output).unwrap()
}

#[test]
fn help_lists_subcommands() {
    let help = stdout_of(shelf().arg("--help"));
    for command in ["serve", "list", "add", "edit", "delete"] {
        assert!(help.contains(command), "missing {command} in:\n{help}");
    }
}

#[test]
fn add_prints_created_book() {
    let out = stdout_of(shelf().args(["add", "--title", "Atomic Habits", "--author", "James Clear"]));
    assert!(out.contains("Atomic Habits\tJames Clear\tavailable"), "{out}");
}

#[test]
fn list_on_empty_store_prints_nothing() {
    let out = stdout_of(shelf().args(["list", "--search", "dune"]));
    assert!(out.is_empty(), "{out}");
}

#[test]
fn add_without_author_is_rejected() {
    let err = stderr_of_failure(shelf().args(["add", "--title", "Atomic Habits", "--author", ""]));
    assert!(err.contains("author is required"), "{err}");
}

#[test]
fn unknown_status_is_rejected() {
    let err = stderr_of_failure(shelf().args([
        "add", "--title", "Dune", "--author", "Frank Herbert", "--status", "lost",
    ]));
    assert!(err.contains("unknown book status"), "{err}");
}

#[test]
fn editing_unknown_book_fails() {
    let err = stderr_of_failure(shelf().args(["edit", "42", "--title", "Dune"]));
    assert!(err.contains("not found"), "{err}");
}
