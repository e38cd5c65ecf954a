use std::collections::HashMap;

use anyhow::{Context, Result};

use super::comment::{self, IndexSource};
use super::templates::TemplateStore;
use crate::config::{OneOrMany, Options, TriageConfig};
use crate::domain::event::{ItemKind, TriageEvent};
use crate::domain::models::{Evaluation, LabelDecision, PlannedComment};
use crate::domain::repo::RepoRef;
use crate::infrastructure::gh::Gh;

/// 제목의 표시 폭 — 코드 포인트 > 127 이거나 `^`인 문자는 2칸으로 센다
pub fn display_width(title: &str) -> usize {
    title
        .chars()
        .map(|c| if (c as u32) > 127 || c == '^' { 2 } else { 1 })
        .sum()
}

/// 판정 + 실행 — Gh trait와 인덱스 소스를 주입받아 동작
pub struct Triage<'a> {
    gh: &'a dyn Gh,
    picker: &'a dyn IndexSource,
}

impl<'a> Triage<'a> {
    pub fn new(gh: &'a dyn Gh, picker: &'a dyn IndexSource) -> Self {
        Self { gh, picker }
    }

    /// 판정 후 바로 실행한다. 제외 사용자면 아무 호출도 하지 않고 None.
    pub async fn run(
        &self,
        event: &TriageEvent,
        repo: &RepoRef,
        config: &TriageConfig,
    ) -> Result<Option<Evaluation>> {
        let Some(evaluation) = self.evaluate(event, repo, config).await else {
            return Ok(None);
        };
        self.apply(repo, &evaluation).await?;

        tracing::info!(
            "{} #{}: bad_title={} bad_body={} label={:?} comments={}",
            evaluation.kind,
            evaluation.number,
            evaluation.bad_title,
            evaluation.bad_body,
            evaluation.label,
            evaluation.comments.len()
        );
        Ok(Some(evaluation))
    }

    /// 제목/본문을 검사하고 라벨·댓글 결정을 만든다 (쓰기 호출 없음).
    ///
    /// 템플릿 조회만 Gh를 사용한다.
    pub async fn evaluate(
        &self,
        event: &TriageEvent,
        repo: &RepoRef,
        config: &TriageConfig,
    ) -> Option<Evaluation> {
        let mut bad_title = event.title_is_blank();
        let mut bad_body = event.body_is_blank();

        if config.is_excluded(&event.author) {
            tracing::info!("author {} is excluded, skipping", event.author);
            return None;
        }

        let options = Options::resolve(config, event.kind);

        if !bad_title {
            let title = event.title.as_deref().unwrap_or_default().trim();
            if let Some(min) = options.min_title_length {
                tracing::debug!("checking title length");
                bad_title = display_width(title) <= min as usize;
            }
            if !bad_title {
                tracing::debug!("checking bad titles list");
                bad_title = options.is_bad_title(title);
            }
        }

        if !bad_body && options.check_template {
            tracing::debug!("checking body against templates");
            let body = event.body.as_deref().unwrap_or_default();
            let store = TemplateStore::new(self.gh);
            let valid = match event.kind {
                ItemKind::Issue => store.is_issue_body_valid(repo, body).await,
                ItemKind::PullRequest => store.is_pull_request_body_valid(repo, body).await,
            };
            bad_body = !valid;
        }

        let comments = self.plan_comments(event, &options, bad_title, bad_body);

        let mut evaluation = Evaluation {
            kind: event.kind,
            number: event.number,
            bad_title,
            bad_body,
            label: LabelDecision::None,
            comments,
        };
        if let Some(label) = options.label_to_add.clone() {
            evaluation.label = if evaluation.is_bad() {
                LabelDecision::Add(label)
            } else {
                LabelDecision::Remove(label)
            };
        }
        Some(evaluation)
    }

    fn plan_comments(
        &self,
        event: &TriageEvent,
        options: &Options,
        bad_title: bool,
        bad_body: bool,
    ) -> Vec<PlannedComment> {
        let args = HashMap::from([("author", event.author.as_str())]);
        let planned = |spec: &OneOrMany| PlannedComment {
            body: comment::pick(spec, &args, self.picker),
            reactions: options.reactions.clone(),
        };

        let title_spec = options.bad_title_comment.as_ref();
        let body_spec = options.bad_body_comment.as_ref();

        // 같은 문구를 두 번 달지 않는다
        if let (true, true, Some(t), Some(b)) = (bad_title, bad_body, title_spec, body_spec) {
            if t == b {
                return vec![planned(b)];
            }
        }

        let mut comments = Vec::new();
        if let (true, Some(t)) = (bad_title, title_spec) {
            comments.push(planned(t));
        }
        if let (true, Some(b)) = (bad_body, body_spec) {
            comments.push(planned(b));
        }
        comments
    }

    /// 판정 결과를 GitHub에 반영한다: 라벨 → 댓글 → 리액션.
    ///
    /// 부수효과는 트랜잭션이 아니다. 앞 단계가 성공한 뒤 실패해도 되돌리지 않는다.
    pub async fn apply(&self, repo: &RepoRef, evaluation: &Evaluation) -> Result<()> {
        let repo_name = repo.full_name();
        let number = evaluation.number;

        match &evaluation.label {
            LabelDecision::Add(label) => {
                self.gh
                    .label_add(&repo_name, number, label)
                    .await
                    .with_context(|| format!("failed to add label {label} to #{number}"))?;
                tracing::info!("added label {label} to #{number}");
            }
            LabelDecision::Remove(label) => {
                let removed = self
                    .gh
                    .label_remove(&repo_name, number, label)
                    .await
                    .with_context(|| format!("failed to remove label {label} from #{number}"))?;
                if removed {
                    tracing::info!("removed label {label} from #{number}");
                } else {
                    tracing::debug!("label {label} was not on #{number}");
                }
            }
            LabelDecision::None => {}
        }

        for planned in &evaluation.comments {
            let comment_id = self
                .gh
                .create_comment(&repo_name, number, &planned.body)
                .await
                .with_context(|| format!("failed to comment on #{number}"))?;
            tracing::info!("posted comment {comment_id} on #{number}");

            for reaction in &planned.reactions {
                if let Err(e) = self.gh.add_reaction(&repo_name, comment_id, reaction).await {
                    tracing::warn!("failed to add reaction {reaction} to comment {comment_id}: {e:#}");
                }
            }
        }

        Ok(())
    }
}
