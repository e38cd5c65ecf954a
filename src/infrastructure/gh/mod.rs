pub mod mock;
pub mod real;

use anyhow::Result;
use async_trait::async_trait;

pub use mock::MockGh;
pub use real::RealGh;

/// GitHub REST API 추상화 — 트리아지에 필요한 호출만 노출한다.
///
/// "없음"(404)은 에러가 아니라 `None` / `false`로 표현한다.
/// `Err`는 인증·네트워크 등 진짜 실패에만 사용한다.
#[async_trait]
pub trait Gh: Send + Sync {
    /// `GET repos/{repo}/contents/{path}` — 파일 원문. 404면 None
    async fn file_content(&self, repo_name: &str, path: &str) -> Result<Option<String>>;

    /// `GET repos/{repo}/contents/{dir}` — 디렉토리 하위 파일 경로 목록. 404면 None
    async fn list_dir(&self, repo_name: &str, path: &str) -> Result<Option<Vec<String>>>;

    /// `POST repos/{repo}/issues/{number}/labels` — 이미 붙어 있어도 성공
    async fn label_add(&self, repo_name: &str, number: u64, label: &str) -> Result<()>;

    /// `DELETE repos/{repo}/issues/{number}/labels/{label}`
    /// 라벨이 붙어 있지 않았으면 `Ok(false)`
    async fn label_remove(&self, repo_name: &str, number: u64, label: &str) -> Result<bool>;

    /// `POST repos/{repo}/issues/{number}/comments` — 생성된 댓글 id 반환
    async fn create_comment(&self, repo_name: &str, number: u64, body: &str) -> Result<u64>;

    /// `POST repos/{repo}/issues/comments/{id}/reactions`
    async fn add_reaction(&self, repo_name: &str, comment_id: u64, reaction: &str) -> Result<()>;
}
