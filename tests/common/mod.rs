#![allow(dead_code)]

use bob::areas::memory::InMemoryRemote;
use bob::areas::repository::Repository;
use bob::artifacts::branch::branch_name::BranchName;
use bob::artifacts::objects::commit::Author;
use bob::config::Config;
use fake::Fake;
use fake::faker::internet::en::FreeEmail;
use fake::faker::name::en::Name;
use rstest::fixture;
use std::io::Write;
use std::sync::{Arc, Mutex};

pub const PLIST_PATH: &str = "Info.plist";
pub const WIDGET_PLIST_PATH: &str = "Widget/Info.plist";
pub const README: &str = "# App\n\nShips builds.\n";
pub const APP_SOURCE: &str = "import UIKit\n";

pub fn plist(version: &str, build: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
	<key>CFBundleIdentifier</key>
	<string>com.example.app</string>
	<key>CFBundleShortVersionString</key>
	<string>{version}</string>
	<key>CFBundleVersion</key>
	<string>{build}</string>
</dict>
</plist>
"#
    )
}

pub fn random_author() -> Author {
    Author::new(Name().fake::<String>(), FreeEmail().fake::<String>())
}

pub fn author_named(name: &str) -> Author {
    Author::new(name.to_string(), format!("{}@example.com", name.to_lowercase()))
}

pub fn branch(name: &str) -> BranchName {
    BranchName::try_parse(name.to_string()).expect("valid branch name")
}

/// `main` holds an `Info.plist` at `1.2 (3)` next to two unrelated files;
/// `release` and `develop` exist for branch matching
#[fixture]
pub fn remote() -> Arc<InMemoryRemote> {
    let remote = InMemoryRemote::new();
    let seed = author_named("Seed");
    let info = plist("1.2", "3");

    remote
        .seed_branch(
            "main",
            &[
                ("README.md", README),
                (PLIST_PATH, info.as_str()),
                ("Sources/App.swift", APP_SOURCE),
            ],
            &seed,
        )
        .expect("seed main");
    remote
        .seed_branch("release", &[(PLIST_PATH, plist("1.1", "9").as_str())], &seed)
        .expect("seed release");
    remote
        .seed_branch("develop", &[(PLIST_PATH, plist("1.3", "1").as_str())], &seed)
        .expect("seed develop");

    Arc::new(remote)
}

pub fn config(plist_paths: &[&str]) -> Config {
    let paths = plist_paths
        .iter()
        .map(|path| format!("\"{path}\""))
        .collect::<Vec<_>>()
        .join(", ");

    Config::parse(&format!(
        r#"
[github]
repo_url = "https://api.github.com/repos/acme/app"
token = "test-token"
max_concurrency = 4

[author]
name = "Bob"
email = "bob@example.com"

[ios]
plist_paths = [{paths}]
"#
    ))
    .expect("valid test config")
}

/// Cloneable writer whose output can be read back after a command ran
#[derive(Clone, Default)]
pub struct SharedWriter(Arc<Mutex<Vec<u8>>>);

impl SharedWriter {
    pub fn contents(&self) -> String {
        String::from_utf8(self.0.lock().expect("writer lock").clone()).expect("utf-8 output")
    }
}

impl Write for SharedWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().expect("writer lock").write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

pub fn repository(remote: Arc<InMemoryRemote>, config: Config) -> (Repository, SharedWriter) {
    let writer = SharedWriter::default();
    let repository =
        Repository::new(config, remote, Box::new(writer.clone())).expect("repository");
    (repository, writer)
}
