use assert_cmd::Command;
use assert_fs::TempDir;
use assert_fs::prelude::*;
use predicates::prelude::*;
use rstest::{fixture, rstest};

#[fixture]
fn workspace() -> TempDir {
    TempDir::new().expect("temp dir")
}

fn bob(workspace: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("bob").expect("binary built");
    cmd.current_dir(workspace.path())
        .env_remove("BOB_CONFIG")
        .env_remove("BOB_GITHUB_TOKEN")
        .env_remove("BOB_TRAVIS_TOKEN")
        .env_remove("RUST_LOG");
    cmd
}

#[rstest]
fn help_lists_every_command(workspace: TempDir) {
    bob(&workspace)
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("bump")
                .and(predicate::str::contains("align"))
                .and(predicate::str::contains("replace"))
                .and(predicate::str::contains("trigger"))
                .and(predicate::str::contains("check-branch"))
                .and(predicate::str::contains("ls-tree"))
                .and(predicate::str::contains("cat-file")),
        );
}

#[rstest]
fn missing_config_file_is_reported(workspace: TempDir) {
    bob(&workspace)
        .args(["--config", "absent.toml", "bump"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not read config file `absent.toml`"));
}

#[rstest]
fn default_config_is_read_from_the_working_directory(workspace: TempDir) {
    bob(&workspace)
        .arg("ls-tree")
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not read config file `bob.toml`"));
}

#[rstest]
fn empty_token_is_rejected_before_any_request(workspace: TempDir) {
    workspace
        .child("bob.toml")
        .write_str(
            r#"
[github]
repo_url = "https://api.github.com/repos/acme/app"
token = ""
"#,
        )
        .expect("config written");

    bob(&workspace)
        .arg("bump")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no GitHub token configured"));
}

#[rstest]
fn malformed_config_names_the_file(workspace: TempDir) {
    workspace
        .child("broken.toml")
        .write_str("[github\nrepo_url = ")
        .expect("config written");

    bob(&workspace)
        .args(["--config", "broken.toml", "check-branch", "main"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid config file `broken.toml`"));
}

#[rstest]
fn align_requires_a_version(workspace: TempDir) {
    bob(&workspace)
        .arg("align")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("<VERSION>"));
}

#[rstest]
fn replace_requires_a_path(workspace: TempDir) {
    bob(&workspace)
        .args(["replace", "--pattern", "a", "--with", "b"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--path"));
}
