use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;

use super::Gh;

/// 테스트용 Gh 구현체 — 미리 설정된 파일/디렉토리를 반환하고 쓰기 호출을 기록한다
pub struct MockGh {
    /// key: "{repo_name}/{path}" → 파일 원문
    files: Mutex<HashMap<String, String>>,
    /// key: "{repo_name}/{path}" → 하위 파일 경로
    dirs: Mutex<HashMap<String, Vec<String>>>,
    /// 조회 시 에러를 돌려줄 "{repo_name}/{path}"
    failing_paths: Mutex<HashSet<String>>,
    /// 붙어 있지 않은 것으로 취급할 라벨 (label_remove → false)
    absent_labels: Mutex<HashSet<String>>,
    fail_comments: Mutex<bool>,
    fail_reactions: Mutex<bool>,
    next_comment_id: AtomicU64,
    /// 조회된 파일 기록: "{repo_name}/{path}"
    pub fetched_paths: Mutex<Vec<String>>,
    /// 추가된 라벨 기록: (repo_name, number, label)
    pub added_labels: Mutex<Vec<(String, u64, String)>>,
    /// 제거 요청된 라벨 기록: (repo_name, number, label)
    pub removed_labels: Mutex<Vec<(String, u64, String)>>,
    /// 게시된 댓글 기록: (repo_name, number, body, comment_id)
    pub posted_comments: Mutex<Vec<(String, u64, String, u64)>>,
    /// 추가된 리액션 기록: (repo_name, comment_id, reaction)
    pub reactions: Mutex<Vec<(String, u64, String)>>,
}

impl Default for MockGh {
    fn default() -> Self {
        Self {
            files: Mutex::new(HashMap::new()),
            dirs: Mutex::new(HashMap::new()),
            failing_paths: Mutex::new(HashSet::new()),
            absent_labels: Mutex::new(HashSet::new()),
            fail_comments: Mutex::new(false),
            fail_reactions: Mutex::new(false),
            next_comment_id: AtomicU64::new(1000),
            fetched_paths: Mutex::new(Vec::new()),
            added_labels: Mutex::new(Vec::new()),
            removed_labels: Mutex::new(Vec::new()),
            posted_comments: Mutex::new(Vec::new()),
            reactions: Mutex::new(Vec::new()),
        }
    }
}

impl MockGh {
    pub fn new() -> Self {
        Self::default()
    }

    /// file_content 응답 설정
    pub fn set_file(&self, repo_name: &str, path: &str, content: &str) {
        let key = format!("{repo_name}/{path}");
        self.files.lock().unwrap().insert(key, content.to_string());
    }

    /// list_dir 응답 설정
    pub fn set_dir(&self, repo_name: &str, path: &str, entries: &[&str]) {
        let key = format!("{repo_name}/{path}");
        self.dirs
            .lock()
            .unwrap()
            .insert(key, entries.iter().map(|e| e.to_string()).collect());
    }

    /// 해당 경로 조회를 전송 실패로 만든다
    pub fn fail_path(&self, repo_name: &str, path: &str) {
        let key = format!("{repo_name}/{path}");
        self.failing_paths.lock().unwrap().insert(key);
    }

    /// label_remove가 "붙어 있지 않음"을 돌려주게 한다
    pub fn set_label_absent(&self, label: &str) {
        self.absent_labels.lock().unwrap().insert(label.to_string());
    }

    pub fn fail_comments(&self) {
        *self.fail_comments.lock().unwrap() = true;
    }

    pub fn fail_reactions(&self) {
        *self.fail_reactions.lock().unwrap() = true;
    }

    /// 쓰기 호출(라벨/댓글/리액션)이 하나라도 있었는지
    pub fn has_side_effects(&self) -> bool {
        !self.added_labels.lock().unwrap().is_empty()
            || !self.removed_labels.lock().unwrap().is_empty()
            || !self.posted_comments.lock().unwrap().is_empty()
            || !self.reactions.lock().unwrap().is_empty()
    }

    pub fn comment_bodies(&self) -> Vec<String> {
        self.posted_comments
            .lock()
            .unwrap()
            .iter()
            .map(|(_, _, body, _)| body.clone())
            .collect()
    }

    fn check_failure(&self, key: &str) -> Result<()> {
        if self.failing_paths.lock().unwrap().contains(key) {
            anyhow::bail!("mock transport failure for {key}");
        }
        Ok(())
    }
}

#[async_trait]
impl Gh for MockGh {
    async fn file_content(&self, repo_name: &str, path: &str) -> Result<Option<String>> {
        let key = format!("{repo_name}/{path}");
        self.fetched_paths.lock().unwrap().push(key.clone());
        self.check_failure(&key)?;
        Ok(self.files.lock().unwrap().get(&key).cloned())
    }

    async fn list_dir(&self, repo_name: &str, path: &str) -> Result<Option<Vec<String>>> {
        let key = format!("{repo_name}/{path}");
        self.check_failure(&key)?;
        Ok(self.dirs.lock().unwrap().get(&key).cloned())
    }

    async fn label_add(&self, repo_name: &str, number: u64, label: &str) -> Result<()> {
        self.added_labels
            .lock()
            .unwrap()
            .push((repo_name.to_string(), number, label.to_string()));
        Ok(())
    }

    async fn label_remove(&self, repo_name: &str, number: u64, label: &str) -> Result<bool> {
        self.removed_labels
            .lock()
            .unwrap()
            .push((repo_name.to_string(), number, label.to_string()));
        Ok(!self.absent_labels.lock().unwrap().contains(label))
    }

    async fn create_comment(&self, repo_name: &str, number: u64, body: &str) -> Result<u64> {
        if *self.fail_comments.lock().unwrap() {
            anyhow::bail!("mock failure creating comment on {repo_name}#{number}");
        }
        let id = self.next_comment_id.fetch_add(1, Ordering::SeqCst);
        self.posted_comments.lock().unwrap().push((
            repo_name.to_string(),
            number,
            body.to_string(),
            id,
        ));
        Ok(id)
    }

    async fn add_reaction(&self, repo_name: &str, comment_id: u64, reaction: &str) -> Result<()> {
        if *self.fail_reactions.lock().unwrap() {
            anyhow::bail!("mock failure reacting to comment {comment_id}");
        }
        self.reactions
            .lock()
            .unwrap()
            .push((repo_name.to_string(), comment_id, reaction.to_string()));
        Ok(())
    }
}
