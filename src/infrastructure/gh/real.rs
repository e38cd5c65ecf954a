use std::time::Instant;

use anyhow::{Context, Result};
use async_trait::async_trait;

use super::Gh;

/// `gh api` 응답 — 404는 별도 variant로 분리
enum ApiResponse {
    Ok(String),
    NotFound,
}

/// 실제 `gh` CLI를 호출하는 구현체
///
/// 토큰은 `GH_TOKEN` 환경 변수로 하위 프로세스에만 전달한다.
pub struct RealGh {
    token: String,
    host: Option<String>,
}

impl RealGh {
    pub fn new(token: impl Into<String>, host: Option<String>) -> Self {
        Self {
            token: token.into(),
            host,
        }
    }

    async fn api(&self, tag: &str, mut args: Vec<String>) -> Result<ApiResponse> {
        if let Some(h) = &self.host {
            args.push("--hostname".to_string());
            args.push(h.clone());
        }

        tracing::debug!("[gh:{tag}] >>> gh {}", args.join(" "));
        let start = Instant::now();

        let output = tokio::process::Command::new("gh")
            .arg("api")
            .args(&args)
            .env("GH_TOKEN", &self.token)
            .output()
            .await
            .with_context(|| format!("failed to spawn gh for {tag}"))?;

        let elapsed = start.elapsed();

        if output.status.success() {
            let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
            tracing::debug!(
                "[gh:{tag}] <<< OK ({}ms, {} bytes)",
                elapsed.as_millis(),
                stdout.len()
            );
            return Ok(ApiResponse::Ok(stdout));
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        if is_not_found(&stderr) {
            tracing::debug!("[gh:{tag}] <<< 404 ({}ms)", elapsed.as_millis());
            return Ok(ApiResponse::NotFound);
        }

        tracing::warn!(
            "[gh:{tag}] <<< FAILED (exit={}, {}ms): {}",
            output.status.code().unwrap_or(-1),
            elapsed.as_millis(),
            stderr.trim()
        );
        anyhow::bail!("gh api error ({tag}, {}ms): {}", elapsed.as_millis(), stderr.trim());
    }
}

#[async_trait]
impl Gh for RealGh {
    async fn file_content(&self, repo_name: &str, path: &str) -> Result<Option<String>> {
        let args = vec![
            format!("repos/{repo_name}/contents/{}", encode_path(path)),
            "-H".to_string(),
            "Accept: application/vnd.github.raw+json".to_string(),
        ];

        match self.api("file_content", args).await? {
            ApiResponse::Ok(body) => Ok(Some(body)),
            ApiResponse::NotFound => Ok(None),
        }
    }

    async fn list_dir(&self, repo_name: &str, path: &str) -> Result<Option<Vec<String>>> {
        // 파일 경로를 주면 객체가 오므로 배열일 때만 경로를 뽑는다
        let args = vec![
            format!("repos/{repo_name}/contents/{}", encode_path(path)),
            "--jq".to_string(),
            r#"if type == "array" then .[] | select(.type == "file") | .path else empty end"#
                .to_string(),
        ];

        match self.api("list_dir", args).await? {
            ApiResponse::Ok(body) => Ok(Some(
                body.lines()
                    .map(str::trim)
                    .filter(|l| !l.is_empty())
                    .map(String::from)
                    .collect(),
            )),
            ApiResponse::NotFound => Ok(None),
        }
    }

    async fn label_add(&self, repo_name: &str, number: u64, label: &str) -> Result<()> {
        let args = vec![
            format!("repos/{repo_name}/issues/{number}/labels"),
            "--method".to_string(),
            "POST".to_string(),
            "--silent".to_string(),
            "-f".to_string(),
            format!("labels[]={label}"),
        ];

        match self.api("label_add", args).await? {
            ApiResponse::Ok(_) => Ok(()),
            ApiResponse::NotFound => anyhow::bail!("{repo_name}#{number} not found"),
        }
    }

    async fn label_remove(&self, repo_name: &str, number: u64, label: &str) -> Result<bool> {
        let args = vec![
            format!(
                "repos/{repo_name}/issues/{number}/labels/{}",
                encode_segment(label)
            ),
            "--method".to_string(),
            "DELETE".to_string(),
            "--silent".to_string(),
        ];

        match self.api("label_remove", args).await? {
            ApiResponse::Ok(_) => Ok(true),
            ApiResponse::NotFound => Ok(false),
        }
    }

    async fn create_comment(&self, repo_name: &str, number: u64, body: &str) -> Result<u64> {
        let args = vec![
            format!("repos/{repo_name}/issues/{number}/comments"),
            "--method".to_string(),
            "POST".to_string(),
            "-f".to_string(),
            format!("body={body}"),
            "--jq".to_string(),
            ".id".to_string(),
        ];

        match self.api("create_comment", args).await? {
            ApiResponse::Ok(out) => out
                .trim()
                .parse::<u64>()
                .with_context(|| format!("unexpected comment id from gh: {:?}", out.trim())),
            ApiResponse::NotFound => anyhow::bail!("{repo_name}#{number} not found"),
        }
    }

    async fn add_reaction(&self, repo_name: &str, comment_id: u64, reaction: &str) -> Result<()> {
        let args = vec![
            format!("repos/{repo_name}/issues/comments/{comment_id}/reactions"),
            "--method".to_string(),
            "POST".to_string(),
            "--silent".to_string(),
            "-f".to_string(),
            format!("content={reaction}"),
        ];

        match self.api("add_reaction", args).await? {
            ApiResponse::Ok(_) => Ok(()),
            ApiResponse::NotFound => anyhow::bail!("comment {comment_id} not found"),
        }
    }
}

/// gh는 HTTP 상태를 stderr에 `(HTTP 404)` 형태로 남긴다
fn is_not_found(stderr: &str) -> bool {
    stderr.contains("HTTP 404")
}

/// 경로의 각 세그먼트를 퍼센트 인코딩 (`/`는 유지)
fn encode_path(path: &str) -> String {
    path.trim_start_matches('/')
        .split('/')
        .map(encode_segment)
        .collect::<Vec<_>>()
        .join("/")
}

fn encode_segment(segment: &str) -> String {
    urlencoding::encode(segment).into_owned()
}
