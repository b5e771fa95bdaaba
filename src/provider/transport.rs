use crate::provider::error::ClientError;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_ENCODING};
use reqwest::{blocking, Url};
use std::time::Duration;

/// Blogger API v3 블로그 엔드포인트 URL
pub const BLOGGER_ENDPOINT: &'static str = "https://www.googleapis.com/blogger/v3/blogs/";
/// API 요청 시 기본 타임아웃 시간(초)
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

const USER_AGENT: &'static str = "blogger-api (gzip)";

/// 상태 코드와 본문만 담은 HTTP 응답
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

/// GET 요청을 수행하는 전송 계층
///
/// 200 이외의 상태 코드는 에러가 아니며 그대로 [`RawResponse`]로 반환 되어야 한다.
/// 연결 실패, 타임아웃 등 응답 자체를 받지 못한 경우만 에러로 반환한다.
pub trait Transport {
    fn get(&self, path: &str, query: &[(String, String)]) -> Result<RawResponse, ClientError>;
}

/// `reqwest` 블로킹 클라이언트 기반 전송 계층
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: blocking::Client,
    base_url: Url,
}

impl HttpTransport {
    pub fn new() -> Result<Self, ClientError> {
        Self::with_base_url(BLOGGER_ENDPOINT, Duration::from_secs(DEFAULT_TIMEOUT_SECONDS))
    }

    /// `base_url`은 `/`로 끝나도록 보정 되며, 요청 경로는 그 뒤에 그대로 이어 붙는다.
    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let base_url = match base_url.ends_with('/') {
            true => Url::parse(base_url),
            false => Url::parse(&format!("{}/", base_url)),
        };
        let base_url = base_url.map_err(|_| ClientError::InvalidBaseUrl)?;

        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidBaseUrl);
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("gzip"));

        let client = blocking::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()
            .map_err(|e| ClientError::RequestFailed(format!("클라이언트 생성 실패: {}", e)))?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn resolve(&self, path: &str) -> Result<Url, ClientError> {
        Url::parse(&format!("{}{}", self.base_url.as_str(), path))
            .map_err(|_| ClientError::InvalidBaseUrl)
    }
}

impl Transport for HttpTransport {
    fn get(&self, path: &str, query: &[(String, String)]) -> Result<RawResponse, ClientError> {
        let url = self.resolve(path)?;
        let response = self.client.get(url)
            .query(query)
            .send()
            .map_err(|e| ClientError::RequestFailed(format!("PATH: {}, ERROR: {:?}", path, e)))?;

        let status = response.status().as_u16();
        let body = response.text()
            .map_err(|e| ClientError::ResponseTextExtractionFailed(format!("PATH: {}, ERROR: {:?}", path, e)))?;

        Ok(RawResponse { status, body })
    }
}
