use serde::{Deserialize, Deserializer, Serialize};

pub const DEFAULT_LABEL: &str = "needs-more-info";
pub const DEFAULT_MIN_TITLE_LENGTH: u32 = 8;
pub const DEFAULT_REACTIONS: [&str; 2] = ["-1", "confused"];

const ISSUE_COMMENT: &str =
    "We would appreciate it if you could provide us with more info about this issue!";
const PR_COMMENT: &str =
    "We would appreciate it if you could provide us with more info about this pr!";

/// 설정 파일의 전체 스키마 (`CONFIG_FILE`)
///
/// 글로벌 필드는 `global`에 평탄화되어 있고, `issue` / `pullRequest` 섹션이
/// 종류별로 덮어쓴다. 기본값 위에 레포 설정을 딥머지하여 만든다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriageConfig {
    #[serde(flatten)]
    pub global: Section,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue: Option<Section>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pull_request: Option<Section>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_users: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_comment: Option<OneOrMany>,
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            global: Section {
                check_template: Some(true),
                min_title_length: Some(DEFAULT_MIN_TITLE_LENGTH),
                label_to_add: Some(DEFAULT_LABEL.into()),
                reactions: Some(OneOrMany::Many(
                    DEFAULT_REACTIONS.iter().map(|r| r.to_string()).collect(),
                )),
                ..Section::default()
            },
            issue: Some(Section {
                bad_titles: Some(
                    ["update", "updates", "test", "issue", "debug", "demo"]
                        .iter()
                        .map(|t| t.to_string())
                        .collect(),
                ),
                bad_title_comment: Some(OneOrMany::One(ISSUE_COMMENT.into())),
                bad_body_comment: Some(OneOrMany::One(ISSUE_COMMENT.into())),
                ..Section::default()
            }),
            pull_request: Some(Section {
                bad_titles: Some(
                    ["update", "updates", "test"]
                        .iter()
                        .map(|t| t.to_string())
                        .collect(),
                ),
                bad_title_comment: Some(OneOrMany::One(PR_COMMENT.into())),
                bad_body_comment: Some(OneOrMany::One(PR_COMMENT.into())),
                ..Section::default()
            }),
            exclude_users: None,
            default_comment: None,
        }
    }
}

impl TriageConfig {
    /// 로그인 이름이 `excludeUsers`에 있는지 (대소문자 무시)
    pub fn is_excluded(&self, login: &str) -> bool {
        self.exclude_users
            .as_deref()
            .unwrap_or_default()
            .iter()
            .any(|u| u.trim().eq_ignore_ascii_case(login))
    }
}

/// 글로벌과 종류별 섹션이 공유하는 필드. 모든 필드는 선택적이다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_template: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_title_length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_to_add: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_reactions"
    )]
    pub reactions: Option<OneOrMany>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bad_titles: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bad_title_comment: Option<OneOrMany>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bad_body_comment: Option<OneOrMany>,
}

/// `string | list<string>` 형태의 값 (댓글 문구, 리액션)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    /// 빈 문자열 / 빈 목록은 "미설정"으로 취급한다
    pub fn is_blank(&self) -> bool {
        match self {
            OneOrMany::One(s) => s.is_empty(),
            OneOrMany::Many(v) => v.is_empty(),
        }
    }

    pub fn to_vec(&self) -> Vec<String> {
        match self {
            OneOrMany::One(s) => vec![s.clone()],
            OneOrMany::Many(v) => v.clone(),
        }
    }
}

/// YAML에서 따옴표 없는 `-1` / `+1`은 숫자가 되므로 리액션 이름으로 되돌린다
fn deserialize_reactions<'de, D>(deserializer: D) -> Result<Option<OneOrMany>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    use serde_json::Value;

    fn reaction_name(v: &Value) -> Option<String> {
        match v {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => match n.as_i64() {
                Some(i) if i > 0 => Some(format!("+{i}")),
                Some(i) => Some(i.to_string()),
                None => Some(n.to_string()),
            },
            _ => None,
        }
    }

    let value = Value::deserialize(deserializer)?;
    match &value {
        Value::Null => Ok(None),
        Value::Array(items) => items
            .iter()
            .map(|v| {
                reaction_name(v).ok_or_else(|| D::Error::custom(format!("invalid reaction: {v}")))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(|v| Some(OneOrMany::Many(v))),
        other => reaction_name(other)
            .map(|r| Some(OneOrMany::One(r)))
            .ok_or_else(|| D::Error::custom(format!("invalid reactions: {other}"))),
    }
}
