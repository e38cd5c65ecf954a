use issue_triage::config::loader;
use issue_triage::config::{OneOrMany, Options, TriageConfig};
use issue_triage::domain::{ItemKind, RepoRef};
use issue_triage::infrastructure::gh::MockGh;

fn repo() -> RepoRef {
    RepoRef::new("org", "repo")
}

// ═══════════════════════════════════════════════
// 1. 기본값으로 떨어지는 경우
// ═══════════════════════════════════════════════

#[tokio::test]
async fn no_path_returns_defaults_without_fetching() {
    let gh = MockGh::new();
    let config = loader::resolve(&gh, &repo(), None).await.unwrap();
    assert_eq!(config, TriageConfig::default());
    assert!(gh.fetched_paths.lock().unwrap().is_empty());
}

#[tokio::test]
async fn blank_path_returns_defaults() {
    let gh = MockGh::new();
    let config = loader::resolve(&gh, &repo(), Some("  ")).await.unwrap();
    assert_eq!(config, TriageConfig::default());
}

#[tokio::test]
async fn missing_file_returns_defaults() {
    let gh = MockGh::new();
    // 파일 미설정 → 404 → default
    let config = loader::resolve(&gh, &repo(), Some(".github/triage.yml"))
        .await
        .unwrap();
    assert_eq!(config, TriageConfig::default());
}

#[tokio::test]
async fn empty_file_returns_defaults() {
    let gh = MockGh::new();
    gh.set_file("org/repo", ".github/triage.yml", "");
    let config = loader::resolve(&gh, &repo(), Some(".github/triage.yml"))
        .await
        .unwrap();
    assert_eq!(config, TriageConfig::default());
}

// ═══════════════════════════════════════════════
// 2. 실패 전파
// ═══════════════════════════════════════════════

#[tokio::test]
async fn transport_failure_is_propagated() {
    let gh = MockGh::new();
    gh.fail_path("org/repo", ".github/triage.yml");
    let err = loader::resolve(&gh, &repo(), Some(".github/triage.yml"))
        .await
        .unwrap_err();
    assert!(format!("{err:#}").contains(".github/triage.yml"));
}

#[tokio::test]
async fn invalid_yaml_is_fatal() {
    let gh = MockGh::new();
    gh.set_file("org/repo", ".github/triage.yml", "issue: [unclosed");
    assert!(loader::resolve(&gh, &repo(), Some(".github/triage.yml"))
        .await
        .is_err());
}

#[tokio::test]
async fn wrong_field_type_is_fatal() {
    let gh = MockGh::new();
    gh.set_file("org/repo", ".github/triage.yml", "minTitleLength: lots\n");
    assert!(loader::resolve(&gh, &repo(), Some(".github/triage.yml"))
        .await
        .is_err());
}

// ═══════════════════════════════════════════════
// 3. 딥머지
// ═══════════════════════════════════════════════

#[tokio::test]
async fn partial_issue_section_keeps_everything_else() {
    let gh = MockGh::new();
    gh.set_file(
        "org/repo",
        ".github/triage.yml",
        "issue:\n  badTitleComment: Please say more, @{{author}}\n",
    );
    let config = loader::resolve(&gh, &repo(), Some(".github/triage.yml"))
        .await
        .unwrap();
    let defaults = TriageConfig::default();

    let issue = config.issue.as_ref().unwrap();
    assert_eq!(
        issue.bad_title_comment,
        Some(OneOrMany::One("Please say more, @{{author}}".into()))
    );
    // 미지정 필드는 default 유지
    assert_eq!(issue.bad_titles, defaults.issue.as_ref().unwrap().bad_titles);
    assert_eq!(
        issue.bad_body_comment,
        defaults.issue.as_ref().unwrap().bad_body_comment
    );
    assert_eq!(config.pull_request, defaults.pull_request);
    assert_eq!(config.global, defaults.global);
}

#[test]
fn lists_replace_instead_of_merging() {
    let config = loader::load_str("issue:\n  badTitles: [wip]\nreactions: eyes\n").unwrap();
    assert_eq!(
        config.issue.unwrap().bad_titles,
        Some(vec!["wip".to_string()])
    );
    assert_eq!(config.global.reactions, Some(OneOrMany::One("eyes".into())));
}

#[test]
fn global_overrides_and_per_kind_precedence() {
    let yaml = r#"
labelToAdd: incomplete
minTitleLength: 4
pullRequest:
  minTitleLength: 12
  checkTemplate: false
excludeUsers: [dependabot, renovate]
defaultComment:
  - "Hey {{author}}, more detail please"
  - "{{author}}: could you expand on this?"
"#;
    let config = loader::load_str(yaml).unwrap();

    let issue = Options::resolve(&config, ItemKind::Issue);
    assert_eq!(issue.label_to_add.as_deref(), Some("incomplete"));
    assert_eq!(issue.min_title_length, Some(4));
    assert!(issue.check_template);

    let pr = Options::resolve(&config, ItemKind::PullRequest);
    assert_eq!(pr.min_title_length, Some(12));
    assert!(!pr.check_template);

    assert!(config.is_excluded("renovate"));
    assert!(matches!(config.default_comment, Some(OneOrMany::Many(ref v)) if v.len() == 2));
}

#[test]
fn legacy_mini_title_length_is_honoured() {
    let config = loader::load_str("miniTitleLength: 3\n").unwrap();
    assert_eq!(config.global.min_title_length, Some(3));
}

#[test]
fn unknown_keys_are_ignored() {
    let config = loader::load_str("somethingElse: true\nissue:\n  extra: 1\n").unwrap();
    assert_eq!(config, TriageConfig::default());
}
