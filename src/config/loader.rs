use anyhow::{Context, Result};
use serde_json::Value;

use super::models::TriageConfig;
use crate::domain::repo::RepoRef;
use crate::infrastructure::gh::Gh;

/// 예전 설정 파일에서 쓰던 키 → 현재 키
const LEGACY_KEYS: [(&str, &str); 1] = [("miniTitleLength", "minTitleLength")];

/// 레포의 `path`에서 설정을 읽어 기본값 위에 딥머지한다.
///
/// - path 없음 / 404 / 빈 문서 → 기본값
/// - 그 외 조회 실패, YAML 파싱 실패 → Err (호출 전체 실패)
pub async fn resolve(gh: &dyn Gh, repo: &RepoRef, path: Option<&str>) -> Result<TriageConfig> {
    let Some(path) = path.map(str::trim).filter(|p| !p.is_empty()) else {
        tracing::debug!("no config path given, using defaults");
        return Ok(TriageConfig::default());
    };

    let content = gh
        .file_content(&repo.full_name(), path)
        .await
        .with_context(|| format!("failed to fetch config {path} from {repo}"))?;

    match content {
        Some(content) => load_str(&content).with_context(|| format!("invalid config file {path}")),
        None => {
            tracing::info!("config {path} not found in {repo}, using defaults");
            Ok(TriageConfig::default())
        }
    }
}

/// YAML 문자열 → 기본값과 머지된 설정
/// Raw Value 단계에서 딥머지 → 최종 역직렬화
pub fn load_str(content: &str) -> Result<TriageConfig> {
    if content.trim().is_empty() {
        return Ok(TriageConfig::default());
    }

    let over: Value = serde_yaml::from_str(content)?;
    let over = match over {
        Value::Null => return Ok(TriageConfig::default()),
        Value::Object(_) => normalize_legacy_keys(over),
        other => anyhow::bail!("config must be a mapping, got {}", kind_of(&other)),
    };

    let base = serde_json::to_value(TriageConfig::default())?;
    let merged = deep_merge(base, over);
    Ok(serde_json::from_value(merged)?)
}

/// JSON Value 딥머지: over에 명시적으로 존재하는 값만 base를 덮어씀
/// 배열과 스칼라는 통째로 교체된다
fn deep_merge(base: Value, over: Value) -> Value {
    match (base, over) {
        (Value::Object(mut b), Value::Object(o)) => {
            for (key, over_val) in o {
                let base_val = b.remove(&key).unwrap_or(Value::Null);
                b.insert(key, deep_merge(base_val, over_val));
            }
            Value::Object(b)
        }
        (base, Value::Null) => base,
        (_, over) => over,
    }
}

/// 최상위와 `issue` / `pullRequest` 섹션의 예전 키 이름을 바꾼다
fn normalize_legacy_keys(mut value: Value) -> Value {
    fn rename(map: &mut serde_json::Map<String, Value>) {
        for (old, new) in LEGACY_KEYS {
            if let Some(v) = map.remove(old) {
                // 둘 다 있으면 현재 키가 이긴다
                map.entry(new.to_string()).or_insert(v);
            }
        }
    }

    if let Value::Object(map) = &mut value {
        rename(map);
        for section in ["issue", "pullRequest"] {
            if let Some(Value::Object(inner)) = map.get_mut(section) {
                rename(inner);
            }
        }
    }
    value
}

fn kind_of(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}
