use bob::areas::memory::InMemoryRemote;
use bob::artifacts::version::plist;
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::sync::Arc;

mod common;
use common::{PLIST_PATH, README, WIDGET_PLIST_PATH, remote};

fn plist_on(remote: &InMemoryRemote, branch: &str) -> (String, String) {
    let tree = remote.head_tree(branch).expect("branch has a tree");
    let item = tree.find(PLIST_PATH).expect("plist present");
    let content = remote.blob_content(&item.sha).expect("blob stored");
    plist::version_from_plist(PLIST_PATH, &content).expect("valid plist")
}

#[rstest]
#[tokio::test]
async fn bump_reports_the_new_version_and_commit(remote: Arc<InMemoryRemote>) {
    let (repository, output) = common::repository(remote.clone(), common::config(&[PLIST_PATH]));

    repository.bump(None).await.expect("bump succeeds");

    let head = remote.branch_head("main").expect("main exists");
    assert_eq!(
        output.contents(),
        format!(
            "Done. Build number bumped up. New version is 1.2 (4).\n\
             [main {}] [General] Bumps version to 1.2 (4).\n",
            head.to_short_oid()
        )
    );
    assert_eq!(plist_on(&remote, "main"), ("1.2".to_string(), "4".to_string()));
}

#[rstest]
#[tokio::test]
async fn bump_on_another_branch_leaves_main_alone(remote: Arc<InMemoryRemote>) {
    let main_head = remote.branch_head("main");
    let (repository, _) = common::repository(remote.clone(), common::config(&[PLIST_PATH]));

    repository.bump(Some("release")).await.expect("bump succeeds");

    assert_eq!(remote.branch_head("main"), main_head);
    assert_eq!(plist_on(&remote, "release"), ("1.1".to_string(), "10".to_string()));
}

#[rstest]
#[tokio::test]
async fn bump_without_plists_is_rejected(remote: Arc<InMemoryRemote>) {
    let (repository, output) = common::repository(remote.clone(), common::config(&[]));

    let err = repository.bump(None).await.expect_err("nothing to bump");

    assert!(err.to_string().contains("no plist files configured"));
    assert_eq!(output.contents(), "");
    assert_eq!(remote.calls().branches, 0);
}

#[rstest]
#[case(None, "2.0 (1)")]
#[case(Some("7"), "2.0 (7)")]
#[tokio::test]
async fn align_sets_version_and_build(
    remote: Arc<InMemoryRemote>,
    #[case] build: Option<&str>,
    #[case] expected: &str,
) {
    let (repository, output) = common::repository(remote.clone(), common::config(&[PLIST_PATH]));

    repository.align("2.0", build, None).await.expect("align succeeds");

    let head = remote.branch_head("main").expect("main exists");
    assert_eq!(
        output.contents(),
        format!(
            "Done. Version aligned to {expected} on branch main\n\
             [main {}] [General] Aligns version to {expected}.\n",
            head.to_short_oid()
        )
    );
}

#[rstest]
#[tokio::test]
async fn align_missing_plist_reports_the_updater(remote: Arc<InMemoryRemote>) {
    let (repository, _) =
        common::repository(remote.clone(), common::config(&[WIDGET_PLIST_PATH]));

    let err = repository.align("2.0", None, None).await.expect_err("no match");

    assert_eq!(err.to_string(), "the align updater did not match any items to update");
}

#[rstest]
#[case("2 .0", None)]
#[case("2.0", Some("7</string>"))]
#[tokio::test]
async fn align_rejects_values_a_plist_cannot_hold(
    remote: Arc<InMemoryRemote>,
    #[case] version: &str,
    #[case] build: Option<&str>,
) {
    let head = remote.branch_head("main");
    let (repository, output) = common::repository(remote.clone(), common::config(&[PLIST_PATH]));

    let err = repository
        .align(version, build, None)
        .await
        .expect_err("unreadable value");

    assert!(err.to_string().contains("is not a valid plist string value"));
    assert_eq!(output.contents(), "");
    assert_eq!(remote.calls().branches, 0);
    assert_eq!(remote.branch_head("main"), head);
}

#[rstest]
#[tokio::test]
async fn replace_rewrites_the_given_paths(remote: Arc<InMemoryRemote>) {
    let (repository, output) = common::repository(remote.clone(), common::config(&[PLIST_PATH]));

    repository
        .replace(
            &["README.md".to_string()],
            "builds",
            "releases",
            None,
            None,
        )
        .await
        .expect("replace succeeds");

    let head = remote.branch_head("main").expect("main exists");
    assert_eq!(
        output.contents(),
        format!(
            "Done. Updated README.md on branch main\n\
             [main {}] [General] Replaces `builds` with `releases`.\n",
            head.to_short_oid()
        )
    );
    let tree = remote.head_tree("main").expect("tree");
    let readme = tree.find("README.md").expect("readme");
    assert_eq!(
        remote.blob_content(&readme.sha).as_deref(),
        Some("# App\n\nShips releases.\n")
    );
}

#[rstest]
#[tokio::test]
async fn replace_uses_a_trimmed_custom_message(remote: Arc<InMemoryRemote>) {
    let (repository, output) = common::repository(remote.clone(), common::config(&[PLIST_PATH]));

    repository
        .replace(
            &["README.md".to_string()],
            "App",
            "Game",
            Some("  Rename the app\n"),
            None,
        )
        .await
        .expect("replace succeeds");

    let head = remote.branch_head("main").expect("main exists");
    let commit = remote.find_commit(&head).expect("commit stored");
    assert_eq!(commit.message(), "Rename the app");
    assert!(output.contents().ends_with("Rename the app\n"));
}

#[rstest]
#[tokio::test]
async fn check_branch_confirms_an_existing_branch(remote: Arc<InMemoryRemote>) {
    let (repository, output) = common::repository(remote, common::config(&[PLIST_PATH]));

    repository.check_branch("develop").await.expect("branch exists");

    assert_eq!(output.contents(), "Branch `develop` exists.\n");
}

#[rstest]
#[tokio::test]
async fn check_branch_suggests_near_matches(remote: Arc<InMemoryRemote>) {
    let (repository, output) = common::repository(remote, common::config(&[PLIST_PATH]));

    let err = repository.check_branch("relase").await.expect_err("misspelled");

    assert_eq!(
        err.to_string(),
        "branch `relase` doesn't exist. Did you mean one of these:\n • release"
    );
    assert_eq!(output.contents(), "");
}

#[rstest]
#[tokio::test]
async fn ls_tree_lists_every_file(remote: Arc<InMemoryRemote>) {
    let tree = remote.head_tree("main").expect("tree");
    let (repository, output) = common::repository(remote, common::config(&[PLIST_PATH]));

    repository.ls_tree(None).await.expect("listing succeeds");

    let contents = output.contents();
    let lines = contents.lines().collect::<Vec<_>>();
    assert_eq!(lines.len(), 3);
    for path in ["README.md", PLIST_PATH, "Sources/App.swift"] {
        let item = tree.find(path).expect("path present");
        let expected = format!("100644 blob {}\t{}", item.sha, path);
        assert!(lines.contains(&expected.as_str()), "missing `{expected}`");
    }
}

#[rstest]
#[tokio::test]
async fn cat_file_prints_blob_content(remote: Arc<InMemoryRemote>) {
    let tree = remote.head_tree("main").expect("tree");
    let readme = tree.find("README.md").expect("readme").sha.to_string();
    let (repository, output) = common::repository(remote, common::config(&[PLIST_PATH]));

    repository.cat_file(&readme).await.expect("blob exists");

    assert_eq!(output.contents(), README);
}

#[rstest]
#[tokio::test]
async fn cat_file_rejects_a_malformed_sha(remote: Arc<InMemoryRemote>) {
    let (repository, _) = common::repository(remote.clone(), common::config(&[PLIST_PATH]));

    assert!(repository.cat_file("not-a-sha").await.is_err());
    assert_eq!(remote.calls().blob, 0);
}

#[rstest]
#[tokio::test]
async fn trigger_without_travis_is_rejected(remote: Arc<InMemoryRemote>) {
    let (repository, _) = common::repository(remote, common::config(&[PLIST_PATH]));

    let err = repository.trigger(None, None).await.expect_err("no CI");

    assert_eq!(
        err.to_string(),
        "no CI service configured; add a [travis] section"
    );
}
