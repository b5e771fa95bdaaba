use crate::provider::transport::{BLOGGER_ENDPOINT, DEFAULT_TIMEOUT_SECONDS};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Blogger API 키로 비어 있을 경우 클라이언트를 생성할 수 없다.
    key: String,

    /// 블로그 조회 시 URL을 지정하지 않았을 때 사용할 기본 블로그 URL
    url: Option<String>,

    /// 요청 타임아웃(초), 설정하지 않을 시 기본값은 10초
    timeout_secs: Option<u64>,

    /// API 엔드포인트로 테스트 서버를 사용할 때만 지정한다.
    endpoint: Option<String>,
}

impl Config {
    pub fn new<S: Into<String>>(key: S, url: Option<String>) -> Self {
        Config {
            key: key.into(),
            url,
            timeout_secs: None,
            endpoint: None,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECONDS)
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_deref().unwrap_or(BLOGGER_ENDPOINT)
    }

    pub fn with_endpoint<S: Into<String>>(mut self, endpoint: S) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c: Config = serde_json::from_str(r#"{"key":"secret"}"#).unwrap();

        assert_eq!(c.key(), "secret");
        assert_eq!(c.url(), None);
        assert_eq!(c.timeout_secs(), DEFAULT_TIMEOUT_SECONDS);
        assert_eq!(c.endpoint(), BLOGGER_ENDPOINT);
    }

    #[test]
    fn overrides() {
        let c: Config = serde_json::from_str(
            r#"{"key":"secret","url":"https://example.blogspot.com","timeout_secs":3,"endpoint":"http://localhost:1234/"}"#,
        ).unwrap();

        assert_eq!(c.url(), Some("https://example.blogspot.com"));
        assert_eq!(c.timeout_secs(), 3);
        assert_eq!(c.endpoint(), "http://localhost:1234/");
    }
}
