use std::collections::HashMap;
use std::sync::LazyLock;

use handlebars::Handlebars;
use rand::Rng;

use crate::config::OneOrMany;

/// strict mode 꺼짐 — 없는 키는 빈 문자열로 렌더링된다
static RENDERER: LazyLock<Handlebars<'static>> = LazyLock::new(Handlebars::new);

/// 목록형 댓글에서 인덱스를 고르는 소스 — 테스트에서 고정값을 주입한다
pub trait IndexSource: Send + Sync {
    /// `0..len` 범위의 인덱스 (len > 0)
    fn index(&self, len: usize) -> usize;
}

/// 스레드 로컬 난수 생성기 사용
pub struct ThreadRandom;

impl IndexSource for ThreadRandom {
    fn index(&self, len: usize) -> usize {
        rand::rng().random_range(0..len)
    }
}

/// 항상 같은 인덱스를 돌려주는 소스
pub struct FixedIndex(pub usize);

impl IndexSource for FixedIndex {
    fn index(&self, _len: usize) -> usize {
        self.0
    }
}

/// 댓글 문구 하나를 고르고 `{{key}}`를 치환한다
pub fn pick(spec: &OneOrMany, args: &HashMap<&str, &str>, source: &dyn IndexSource) -> String {
    let chosen = match spec {
        OneOrMany::One(s) => s.as_str(),
        OneOrMany::Many(options) if options.is_empty() => "",
        OneOrMany::Many(options) => {
            let pos = source.index(options.len());
            options.get(pos).unwrap_or(&options[0]).as_str()
        }
    };
    render(chosen, args)
}

/// `{{key}}`는 HTML 이스케이프, `{{{key}}}`는 그대로, 모르는 키는 빈 문자열.
/// 문법이 깨진 문구는 원문 그대로 게시한다.
pub fn render(template: &str, args: &HashMap<&str, &str>) -> String {
    match RENDERER.render_template(template, args) {
        Ok(rendered) => rendered,
        Err(e) => {
            tracing::warn!("failed to render comment template, posting it verbatim: {e}");
            template.to_string()
        }
    }
}
