use std::path::Path;

use anyhow::{Context, Result};

use crate::components::comment::IndexSource;
use crate::components::triage::Triage;
use crate::config::{loader, TriageConfig};
use crate::domain::models::Evaluation;
use crate::domain::{RepoRef, TriageEvent};
use crate::infrastructure::gh::Gh;

/// 호출 1회의 입력 — 전부 명시적으로 받는다 (전역 컨텍스트 없음)
pub struct Invocation<'a> {
    pub event_name: &'a str,
    pub event_path: &'a Path,
    pub repository: &'a str,
    pub config_file: Option<&'a str>,
}

/// 이벤트 처리 결과
#[derive(Debug)]
pub enum Outcome {
    /// 처리 대상이 아닌 이벤트 / 불완전한 페이로드
    Ignored,
    /// 작성자가 excludeUsers에 포함됨
    Excluded,
    Evaluated(Evaluation),
}

/// 이벤트 → 설정 로드 → 판정 → (apply=true면) 실행
pub async fn handle_event(
    gh: &dyn Gh,
    picker: &dyn IndexSource,
    inv: &Invocation<'_>,
    apply: bool,
) -> Result<Outcome> {
    let repo: RepoRef = inv.repository.parse()?;
    let payload = read_payload(inv.event_path)?;

    let Some(event) = TriageEvent::from_payload(inv.event_name, &payload) else {
        return Ok(Outcome::Ignored);
    };
    tracing::info!(
        "{} #{} {} by {}",
        event.kind,
        event.number,
        event.action,
        event.author
    );

    let config = loader::resolve(gh, &repo, inv.config_file).await?;
    tracing::debug!("resolved config: {config:?}");

    let triage = Triage::new(gh, picker);
    let evaluation = if apply {
        triage.run(&event, &repo, &config).await?
    } else {
        triage.evaluate(&event, &repo, &config).await
    };

    Ok(match evaluation {
        Some(e) => Outcome::Evaluated(e),
        None => Outcome::Excluded,
    })
}

/// 판정 결과를 사람이 읽을 수 있는 형태로
pub fn format_outcome(outcome: &Outcome) -> Result<String> {
    Ok(match outcome {
        Outcome::Ignored => "event ignored: not an opened/edited/reopened issue or pull request"
            .to_string(),
        Outcome::Excluded => "author excluded: no action".to_string(),
        Outcome::Evaluated(e) => serde_json::to_string_pretty(e)?,
    })
}

/// 설정 표시 (로컬 파일 머지 결과 또는 기본값) — 네트워크 사용 안 함
pub fn config_show(file: Option<&Path>) -> Result<String> {
    let config = match file {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            loader::load_str(&content)
                .with_context(|| format!("invalid config file {}", path.display()))?
        }
        None => TriageConfig::default(),
    };
    Ok(serde_yaml::to_string(&config)?)
}

/// GitHub Actions 에러 어노테이션 (`::error::`) 한 줄
pub fn error_annotation(message: &str) -> String {
    let escaped = message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A");
    format!("::error::{escaped}")
}

fn read_payload(path: &Path) -> Result<serde_json::Value> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read event payload {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("event payload {} is not valid JSON", path.display()))
}
