use assert_cmd::Command;

#[test]
fn help_lists_subcommands() {
    let output = Command::cargo_bin("bookshelf")
        .unwrap()
        .arg("--help")
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for command in ["serve", "list", "show", "edit"] {
        assert!(stdout.contains(command), "missing {command} in help");
    }
}

#[test]
fn show_requires_an_id() {
    Command::cargo_bin("bookshelf")
        .unwrap()
        .arg("show")
        .assert()
        .failure();
}
