use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum ClientError {
    MissingApiKey,                      // API 키가 설정 되지 않음
    InvalidUrl(String),                 // 절대 URL 형식이 아닌 블로그 주소
    InvalidBaseUrl,
    RequestFailed(String),
    ResponseTextExtractionFailed(String),
    NotImplemented(&'static str),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::MissingApiKey => write!(f, "API Key is not defined."),
            ClientError::InvalidUrl(url) => write!(f, "Invalid URL given. ({})", url),
            ClientError::InvalidBaseUrl => write!(f, "Invalid base URL"),
            ClientError::RequestFailed(message) => write!(f, "Request failed, {}", message),
            ClientError::ResponseTextExtractionFailed(message) => write!(f, "Response text extraction failed, {}", message),
            ClientError::NotImplemented(operation) => write!(f, "{} is not implemented", operation),
        }
    }
}

impl std::error::Error for ClientError {}

/// 200 이외의 응답 혹은 전송 실패를 나타내는 진단 정보
///
/// 호출자에게 에러로 반환 되지 않고 로그로 기록된 뒤 [`crate::provider::model::Fetched`]에 첨부된다.
/// 전송 자체가 실패한 경우 `status`는 0이다.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamError {
    pub status: u16,
    pub message: String,
    pub context: BTreeMap<String, String>,
}

impl UpstreamError {
    pub fn new<S: Into<String>>(status: u16, message: S, context: BTreeMap<String, String>) -> Self {
        UpstreamError {
            status,
            message: message.into(),
            context,
        }
    }
}

impl fmt::Display for UpstreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}: {} {:?}", self.status, self.message, self.context)
    }
}
