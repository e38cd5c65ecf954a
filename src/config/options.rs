use super::models::{OneOrMany, Section, TriageConfig, DEFAULT_MIN_TITLE_LENGTH};
use crate::domain::event::ItemKind;

/// 이슈/PR 종류별로 해석이 끝난 옵션
///
/// 모든 필드는 `종류별 섹션 → 글로벌 → 내장 기본값` 순서로 결정된다.
/// 댓글 문구는 마지막에 `defaultComment`까지 내려간다.
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    pub check_template: bool,
    pub min_title_length: Option<u32>,
    /// trim 후 비어 있으면 None (라벨 처리 생략)
    pub label_to_add: Option<String>,
    pub reactions: Vec<String>,
    pub bad_titles: Vec<String>,
    pub bad_title_comment: Option<OneOrMany>,
    pub bad_body_comment: Option<OneOrMany>,
}

impl Options {
    pub fn resolve(config: &TriageConfig, kind: ItemKind) -> Self {
        let empty = Section::default();
        let own = match kind {
            ItemKind::Issue => config.issue.as_ref(),
            ItemKind::PullRequest => config.pull_request.as_ref(),
        }
        .unwrap_or(&empty);
        let global = &config.global;

        Self {
            check_template: own
                .check_template
                .or(global.check_template)
                .unwrap_or(true),
            min_title_length: own
                .min_title_length
                .or(global.min_title_length)
                .or(Some(DEFAULT_MIN_TITLE_LENGTH)),
            label_to_add: non_blank(own.label_to_add.as_deref())
                .or_else(|| non_blank(global.label_to_add.as_deref())),
            reactions: own
                .reactions
                .as_ref()
                .or(global.reactions.as_ref())
                .map(OneOrMany::to_vec)
                .unwrap_or_default()
                .into_iter()
                .map(|r| r.trim().to_string())
                .filter(|r| !r.is_empty())
                .collect(),
            bad_titles: own
                .bad_titles
                .as_ref()
                .or(global.bad_titles.as_ref())
                .cloned()
                .unwrap_or_default(),
            bad_title_comment: first_comment([
                own.bad_title_comment.as_ref(),
                global.bad_title_comment.as_ref(),
                config.default_comment.as_ref(),
            ]),
            bad_body_comment: first_comment([
                own.bad_body_comment.as_ref(),
                global.bad_body_comment.as_ref(),
                config.default_comment.as_ref(),
            ]),
        }
    }

    /// 대소문자 무시 금지 제목 검사
    pub fn is_bad_title(&self, title: &str) -> bool {
        let title = title.trim().to_lowercase();
        self.bad_titles
            .iter()
            .any(|t| t.trim().to_lowercase() == title)
    }
}

fn first_comment(chain: [Option<&OneOrMany>; 3]) -> Option<OneOrMany> {
    chain.into_iter().flatten().find(|c| !c.is_blank()).cloned()
}

fn non_blank(s: Option<&str>) -> Option<String> {
    s.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn per_kind_value_overrides_global() {
        let mut config = TriageConfig::default();
        config.global.label_to_add = Some("global-label".into());
        config.issue.as_mut().unwrap().label_to_add = Some("issue-label".into());

        let issue = Options::resolve(&config, ItemKind::Issue);
        let pr = Options::resolve(&config, ItemKind::PullRequest);
        assert_eq!(issue.label_to_add.as_deref(), Some("issue-label"));
        assert_eq!(pr.label_to_add.as_deref(), Some("global-label"));
    }

    #[test]
    fn blank_per_kind_label_falls_through_to_global() {
        let mut config = TriageConfig::default();
        config.issue.as_mut().unwrap().label_to_add = Some("   ".into());
        let o = Options::resolve(&config, ItemKind::Issue);
        assert_eq!(o.label_to_add.as_deref(), Some("needs-more-info"));
    }

    #[test]
    fn blank_labels_everywhere_disable_labeling() {
        let mut config = TriageConfig::default();
        config.global.label_to_add = Some(" ".into());
        let o = Options::resolve(&config, ItemKind::PullRequest);
        assert_eq!(o.label_to_add, None);
    }

    #[test]
    fn check_template_false_in_section_wins() {
        let mut config = TriageConfig::default();
        config.pull_request.as_mut().unwrap().check_template = Some(false);
        assert!(!Options::resolve(&config, ItemKind::PullRequest).check_template);
        assert!(Options::resolve(&config, ItemKind::Issue).check_template);
    }

    #[test]
    fn comments_fall_back_to_default_comment() {
        let config = TriageConfig {
            issue: Some(Section::default()),
            default_comment: Some(OneOrMany::One("hi {{author}}".into())),
            ..TriageConfig::default()
        };
        let o = Options::resolve(&config, ItemKind::Issue);
        assert_eq!(o.bad_title_comment, Some(OneOrMany::One("hi {{author}}".into())));
        assert_eq!(o.bad_body_comment, o.bad_title_comment);
    }

    #[test]
    fn missing_sections_use_builtin_fallbacks() {
        let config = TriageConfig {
            global: Section::default(),
            issue: None,
            pull_request: None,
            exclude_users: None,
            default_comment: None,
        };
        let o = Options::resolve(&config, ItemKind::Issue);
        assert!(o.check_template);
        assert_eq!(o.min_title_length, Some(8));
        assert!(o.bad_titles.is_empty());
        assert!(o.reactions.is_empty());
        assert_eq!(o.bad_title_comment, None);
    }

    #[test]
    fn bad_title_match_ignores_case_and_padding() {
        let o = Options::resolve(&TriageConfig::default(), ItemKind::Issue);
        assert!(o.is_bad_title("Update"));
        assert!(o.is_bad_title("UPDATE"));
        assert!(o.is_bad_title("  debug "));
        assert!(!o.is_bad_title("update docs"));
    }
}
