use futures::future::join_all;

use crate::domain::repo::RepoRef;
use crate::infrastructure::gh::Gh;

pub const ISSUE_TEMPLATE_FILE: &str = ".github/ISSUE_TEMPLATE.md";
pub const ISSUE_TEMPLATE_DIR: &str = ".github/ISSUE_TEMPLATE";
pub const PULL_REQUEST_TEMPLATE_FILE: &str = ".github/PULL_REQUEST_TEMPLATE.md";

/// 템플릿 선택 화면 설정 파일 — 템플릿이 아니다
const CHOOSER_CONFIG_FILES: [&str; 2] = ["config.yml", "config.yaml"];

/// 본문이 템플릿을 고치지 않은 복사본인지 판정한다.
///
/// 양쪽을 trim하고 `\r` / `\n`을 모두 지운 뒤, 템플릿이 본문을 포함하면 true.
pub fn matches(body: &str, template: Option<&str>) -> bool {
    let Some(template) = template else {
        return false;
    };
    normalize(template).contains(&normalize(body))
}

fn normalize(s: &str) -> String {
    s.trim().chars().filter(|c| *c != '\r' && *c != '\n').collect()
}

/// 레포(와 조직 `.github` 레포)에서 이슈/PR 템플릿을 찾는다.
///
/// 조회 실패는 모두 "템플릿 없음"으로 취급한다 (best effort).
pub struct TemplateStore<'a> {
    gh: &'a dyn Gh,
}

impl<'a> TemplateStore<'a> {
    pub fn new(gh: &'a dyn Gh) -> Self {
        Self { gh }
    }

    /// 이슈 템플릿 목록
    ///
    /// 단일 파일(레포 → `.github`) 우선, 없으면 레포 디렉토리와 `.github` 디렉토리의
    /// 템플릿을 이 순서로 이어 붙인다.
    pub async fn issue_templates(&self, repo: &RepoRef) -> Vec<String> {
        let fallback = repo.community_health();

        for r in [repo, &fallback] {
            if let Some(t) = self.fetch(r, ISSUE_TEMPLATE_FILE).await {
                return vec![t];
            }
        }

        let mut templates = Vec::new();
        for r in [repo, &fallback] {
            if let Some(paths) = self.list(r, ISSUE_TEMPLATE_DIR).await {
                templates.extend(self.fetch_all(r, &paths).await);
            }
        }
        templates
    }

    /// PR 템플릿 (레포 → `.github`)
    pub async fn pull_request_template(&self, repo: &RepoRef) -> Option<String> {
        if let Some(t) = self.fetch(repo, PULL_REQUEST_TEMPLATE_FILE).await {
            return Some(t);
        }
        self.fetch(&repo.community_health(), PULL_REQUEST_TEMPLATE_FILE)
            .await
    }

    /// 이슈 본문이 어떤 템플릿과도 일치하지 않으면 유효
    pub async fn is_issue_body_valid(&self, repo: &RepoRef, body: &str) -> bool {
        if body.trim().is_empty() {
            return false;
        }
        let templates = self.issue_templates(repo).await;
        tracing::debug!("checking issue body against {} template(s)", templates.len());
        !templates.iter().any(|t| matches(body, Some(t)))
    }

    pub async fn is_pull_request_body_valid(&self, repo: &RepoRef, body: &str) -> bool {
        if body.trim().is_empty() {
            return false;
        }
        let template = self.pull_request_template(repo).await;
        !matches(body, template.as_deref())
    }

    async fn fetch(&self, repo: &RepoRef, path: &str) -> Option<String> {
        match self.gh.file_content(&repo.full_name(), path).await {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!("failed to fetch {path} from {repo}, treating as absent: {e:#}");
                None
            }
        }
    }

    async fn list(&self, repo: &RepoRef, path: &str) -> Option<Vec<String>> {
        match self.gh.list_dir(&repo.full_name(), path).await {
            Ok(paths) => paths,
            Err(e) => {
                tracing::warn!("failed to list {path} in {repo}, treating as absent: {e:#}");
                None
            }
        }
    }

    /// 디렉토리 파일을 동시에 조회하고 목록 순서를 유지한다
    async fn fetch_all(&self, repo: &RepoRef, paths: &[String]) -> Vec<String> {
        let wanted = paths.iter().filter(|p| !is_chooser_config(p));
        join_all(wanted.map(|p| self.fetch(repo, p)))
            .await
            .into_iter()
            .flatten()
            .collect()
    }
}

fn is_chooser_config(path: &str) -> bool {
    let file_name = path.rsplit('/').next().unwrap_or(path);
    CHOOSER_CONFIG_FILES.contains(&file_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_template_never_matches() {
        assert!(!matches("anything", None));
    }

    #[test]
    fn exact_copy_matches() {
        let t = "## Describe the bug\n\n## Steps\n";
        assert!(matches(t, Some(t)));
    }

    #[test]
    fn line_breaks_are_ignored() {
        let template = "## Describe the bug\r\n\r\n## Steps\r\n";
        let body = "## Describe the bug\n## Steps";
        assert!(matches(body, Some(template)));
    }

    #[test]
    fn subset_of_template_matches() {
        assert!(matches("## Steps", Some("## Describe\n## Steps\n## Expected")));
    }

    #[test]
    fn filled_in_body_does_not_match() {
        let template = "## Describe the bug\n\n## Steps\n";
        let body = "## Describe the bug\nThe app crashes when I click save\n## Steps\n1. open";
        assert!(!matches(body, Some(template)));
    }

    #[test]
    fn inner_spacing_still_counts() {
        assert!(!matches("a  b", Some("a b")));
    }

    #[test]
    fn chooser_config_is_skipped() {
        assert!(is_chooser_config(".github/ISSUE_TEMPLATE/config.yml"));
        assert!(!is_chooser_config(".github/ISSUE_TEMPLATE/bug_report.md"));
    }
}
