//! Blogger API v3 읽기 전용 클라이언트
//!
//! 블로그 정보, 게시글, 페이지 조회를 각각 하나의 GET 요청으로 처리한다.
//! 업스트림 에러 응답은 로그로 남기고 디코딩된 본문과 함께 [`provider::model::Fetched`]로 반환한다.

pub mod config;
pub mod provider;

pub use provider::blogger::Client;
pub use provider::error::{ClientError, UpstreamError};
pub use provider::model::{Blog, Entry, Fetched, Page, Post, ResourceList};
pub use provider::path::derive_path;
pub use provider::transport::{HttpTransport, RawResponse, Transport};
