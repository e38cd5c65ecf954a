use serde::Serialize;

use super::event::ItemKind;

/// 라벨 전이 결정
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "label", rename_all = "snake_case")]
pub enum LabelDecision {
    Add(String),
    Remove(String),
    None,
}

/// 게시할 댓글 1건 + 생성 후 붙일 리액션
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedComment {
    pub body: String,
    pub reactions: Vec<String>,
}

/// 이벤트 1건에 대한 판정 결과 (부수효과 실행 전)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Evaluation {
    pub kind: ItemKind,
    pub number: u64,
    pub bad_title: bool,
    pub bad_body: bool,
    pub label: LabelDecision,
    pub comments: Vec<PlannedComment>,
}

impl Evaluation {
    pub fn is_bad(&self) -> bool {
        self.bad_title || self.bad_body
    }
}
