use serde::Serialize;

/// 트리아지 대상 웹훅 이벤트 이름
pub const ISSUES_EVENT: &str = "issues";
pub const PULL_REQUEST_EVENTS: [&str; 2] = ["pull_request", "pull_request_target"];
/// 처리하는 action
pub const HANDLED_ACTIONS: [&str; 3] = ["opened", "edited", "reopened"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Issue,
    PullRequest,
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemKind::Issue => write!(f, "issue"),
            ItemKind::PullRequest => write!(f, "pull request"),
        }
    }
}

/// 이벤트 페이로드에서 뽑아낸 이슈/PR 스냅샷 (읽기 전용)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriageEvent {
    pub kind: ItemKind,
    pub action: String,
    pub number: u64,
    pub title: Option<String>,
    pub body: Option<String>,
    pub author: String,
}

impl TriageEvent {
    /// 웹훅 이벤트 이름 + 페이로드 JSON으로부터 TriageEvent를 만든다.
    ///
    /// 처리 대상이 아닌 이벤트/action이거나 이슈·PR 객체가 없으면 None.
    /// None은 에러가 아니라 "할 일 없음"이다.
    pub fn from_payload(event_name: &str, payload: &serde_json::Value) -> Option<Self> {
        let (kind, key) = if event_name == ISSUES_EVENT {
            (ItemKind::Issue, "issue")
        } else if PULL_REQUEST_EVENTS.contains(&event_name) {
            (ItemKind::PullRequest, "pull_request")
        } else {
            tracing::info!("ignoring {event_name} event");
            return None;
        };

        let action = payload["action"].as_str().unwrap_or_default();
        if !HANDLED_ACTIONS.contains(&action) {
            tracing::info!("ignoring {event_name} event with action {action:?}");
            return None;
        }

        let item = payload.get(key).filter(|v| v.is_object());
        let Some(item) = item else {
            tracing::info!("{event_name} payload has no {key} object, nothing to do");
            return None;
        };

        let Some(number) = item["number"].as_u64().filter(|n| *n > 0) else {
            tracing::info!("{event_name} payload has no {key} number, nothing to do");
            return None;
        };

        Some(Self {
            kind,
            action: action.to_string(),
            number,
            title: item["title"].as_str().map(String::from),
            body: item["body"].as_str().map(String::from),
            author: item["user"]["login"].as_str().unwrap_or_default().to_string(),
        })
    }

    /// 제목이 없거나 공백뿐인지
    pub fn title_is_blank(&self) -> bool {
        self.title.as_deref().map_or(true, |t| t.trim().is_empty())
    }

    /// 본문이 없거나 공백뿐인지
    pub fn body_is_blank(&self) -> bool {
        self.body.as_deref().map_or(true, |b| b.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn issue_payload(action: &str) -> serde_json::Value {
        json!({
            "action": action,
            "issue": {
                "number": 7,
                "title": "Crash on start",
                "body": "Steps to reproduce",
                "user": {"login": "octocat"}
            }
        })
    }

    #[test]
    fn parses_issue_event() {
        let e = TriageEvent::from_payload("issues", &issue_payload("opened")).unwrap();
        assert_eq!(e.kind, ItemKind::Issue);
        assert_eq!(e.number, 7);
        assert_eq!(e.title.as_deref(), Some("Crash on start"));
        assert_eq!(e.author, "octocat");
    }

    #[test]
    fn parses_pull_request_target_event() {
        let payload = json!({
            "action": "reopened",
            "pull_request": {"number": 3, "title": "Fix", "body": null, "user": {"login": "a"}}
        });
        let e = TriageEvent::from_payload("pull_request_target", &payload).unwrap();
        assert_eq!(e.kind, ItemKind::PullRequest);
        assert_eq!(e.body, None);
        assert!(e.body_is_blank());
    }

    #[test]
    fn ignores_unhandled_actions_and_events() {
        assert!(TriageEvent::from_payload("issues", &issue_payload("closed")).is_none());
        assert!(TriageEvent::from_payload("issues", &issue_payload("labeled")).is_none());
        assert!(TriageEvent::from_payload("push", &issue_payload("opened")).is_none());
    }

    #[test]
    fn missing_item_object_is_a_no_op() {
        let payload = json!({"action": "opened"});
        assert!(TriageEvent::from_payload("issues", &payload).is_none());
        // issues 이벤트인데 pull_request만 있는 경우
        let payload = json!({"action": "opened", "pull_request": {"number": 1}});
        assert!(TriageEvent::from_payload("issues", &payload).is_none());
    }

    #[test]
    fn missing_title_is_kept_as_blank() {
        let payload = json!({"action": "edited", "issue": {"number": 1, "user": {"login": "x"}}});
        let e = TriageEvent::from_payload("issues", &payload).unwrap();
        assert!(e.title_is_blank());
        assert!(e.body_is_blank());
    }
}
