use crate::config;
use crate::provider::error::{ClientError, UpstreamError};
use crate::provider::model::{Blog, Entry, ErrorBody, Fetched, Page, Post, Resource, ResourceList};
use crate::provider::transport::{HttpTransport, RawResponse, Transport};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, error, warn};

type Context = BTreeMap<String, String>;

/// Blogger API v3 클라이언트
///
/// 모든 호출은 독립적인 GET 요청 하나로 처리되며, 200 이외의 응답은 에러로 반환하지 않고
/// 로그를 남긴 뒤 [`Fetched::diagnostic`]에 담아 디코딩된 본문과 함께 반환한다.
#[derive(Debug, Clone)]
pub struct Client<T = HttpTransport> {
    key: String,
    default_blog_url: String,
    blog_id: String,
    transport: T,
}

impl Client<HttpTransport> {
    pub fn new<K: Into<String>>(key: K, default_blog_url: Option<&str>) -> Result<Self, ClientError> {
        Client::with_transport(key, default_blog_url, HttpTransport::new()?)
    }

    pub fn from_config(c: &config::blogger::Config) -> Result<Self, ClientError> {
        let transport = HttpTransport::with_base_url(
            c.endpoint(),
            Duration::from_secs(c.timeout_secs()),
        )?;
        Client::with_transport(c.key(), c.url(), transport)
    }
}

impl<T: Transport> Client<T> {
    pub fn with_transport<K: Into<String>>(key: K, default_blog_url: Option<&str>, transport: T) -> Result<Self, ClientError> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(ClientError::MissingApiKey);
        }

        Ok(Client {
            key,
            default_blog_url: default_blog_url.unwrap_or_default().to_owned(),
            blog_id: String::new(),
            transport,
        })
    }

    /// 블로그 ID를 명시하지 않은 호출에서 사용할 블로그를 설정한 클라이언트를 반환한다.
    pub fn set_blog<S: Into<String>>(mut self, blog_id: S) -> Self {
        self.blog_id = blog_id.into();
        self
    }

    pub fn blog_id(&self) -> &str {
        &self.blog_id
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// URL로 블로그 정보를 조회한다.
    ///
    /// URL을 생략하거나 빈 문자열을 넘기면 설정된 기본 블로그 URL로 조회한다.
    /// 빈 `url` 파라미터를 그대로 보내지 않는다.
    pub fn blog(&self, url: Option<&str>) -> Result<Fetched<Option<Entry<Blog>>>, ClientError> {
        let url = match url.filter(|u| !u.is_empty()) {
            Some(u) => {
                validate_url(u)?;
                u
            }
            None => self.default_blog_url.as_str(),
        };

        let context = context([("url", url)]);
        let fetched = self.fetch("byurl", &[("url", url)], context, "Blog not found.");
        let blog = fetched.value.map(|body| {
            let mut blog = Entry::<Blog>::from_value(body);
            blog.attach_path();
            blog
        });

        Ok(Fetched::with_diagnostic(blog, fetched.diagnostic))
    }

    pub fn posts(&self, blog_id: Option<&str>) -> Fetched<ResourceList<Post>> {
        let blog_id = self.resolve_blog_id(blog_id);
        let context = context([("blog_id", blog_id)]);

        self.fetch_list(&format!("{}/posts", blog_id), &[], context, "Posts not found.")
    }

    pub fn post_by_id(&self, post_id: &str, blog_id: Option<&str>) -> Fetched<Option<Entry<Post>>> {
        let blog_id = self.resolve_blog_id(blog_id);
        let context = context([("post_id", post_id), ("blog_id", blog_id)]);

        self.fetch_resource(&format!("{}/posts/{}", blog_id, post_id), &[], context, "Post not found.")
    }

    pub fn post_by_path(&self, path: &str, blog_id: Option<&str>) -> Fetched<Option<Entry<Post>>> {
        let blog_id = self.resolve_blog_id(blog_id);
        let context = context([("path", path), ("blog_id", blog_id)]);

        self.fetch_resource(&format!("{}/posts/bypath", blog_id), &[("path", path)], context, "Post not found.")
    }

    pub fn search(&self, keyword: &str, blog_id: Option<&str>) -> Fetched<ResourceList<Post>> {
        let blog_id = self.resolve_blog_id(blog_id);
        let context = context([("q", keyword), ("blog_id", blog_id)]);

        self.fetch_list(&format!("{}/posts/search", blog_id), &[("q", keyword)], context, "Posts not found.")
    }

    pub fn pages(&self, blog_id: Option<&str>) -> Fetched<ResourceList<Page>> {
        let blog_id = self.resolve_blog_id(blog_id);
        let context = context([("blog_id", blog_id)]);

        self.fetch_list(&format!("{}/pages", blog_id), &[], context, "Pages not found.")
    }

    pub fn page(&self, page_id: &str, blog_id: Option<&str>) -> Fetched<Option<Entry<Page>>> {
        let blog_id = self.resolve_blog_id(blog_id);
        let context = context([("page_id", page_id), ("blog_id", blog_id)]);

        self.fetch_resource(&format!("{}/pages/{}", blog_id, page_id), &[], context, "Page not found.")
    }

    /// 댓글 목록 조회는 지원하지 않는다.
    pub fn comments(&self, _post_id: &str, _blog_id: &str) -> Result<Fetched<Value>, ClientError> {
        Err(ClientError::NotImplemented("comments"))
    }

    /// 댓글 단건 조회는 지원하지 않는다.
    pub fn comment(&self, _comment_id: &str, _post_id: &str, _blog_id: &str) -> Result<Fetched<Value>, ClientError> {
        Err(ClientError::NotImplemented("comment"))
    }

    fn resolve_blog_id<'a>(&'a self, blog_id: Option<&'a str>) -> &'a str {
        match blog_id {
            Some(id) if !id.is_empty() => id,
            _ => self.blog_id.as_str(),
        }
    }

    fn fetch_resource<R>(&self, path: &str, query: &[(&str, &str)], context: Context, fallback: &str) -> Fetched<Option<Entry<R>>>
    where
        R: Resource + DeserializeOwned,
    {
        let fetched = self.fetch(path, query, context, fallback);
        let entry = fetched.value.map(|body| {
            let mut entry = Entry::<R>::from_value(body);
            if entry.has_parent() {
                entry.attach_path();
            }
            entry
        });

        Fetched::with_diagnostic(entry, fetched.diagnostic)
    }

    fn fetch_list<R>(&self, path: &str, query: &[(&str, &str)], context: Context, fallback: &str) -> Fetched<ResourceList<R>>
    where
        R: Resource + DeserializeOwned,
    {
        let fetched = self.fetch(path, query, context, fallback);
        let mut list = match fetched.value {
            Some(body) => serde_json::from_value::<ResourceList<R>>(body).unwrap_or_else(|e| {
                warn!("목록 응답의 형식이 올바르지 않아 빈 목록을 반환 합니다. => {} (PATH: {})", e, path);
                ResourceList::empty()
            }),
            None => ResourceList::empty(),
        };
        list.items.iter_mut().for_each(|item| item.attach_path());

        Fetched::with_diagnostic(list, fetched.diagnostic)
    }

    /// 요청을 보내고 응답 본문을 JSON 값으로 반환한다. 200 이외의 응답은 로그를 남기고 진단 정보로 첨부한다.
    fn fetch(&self, path: &str, query: &[(&str, &str)], context: Context, fallback: &str) -> Fetched<Option<Value>> {
        let query = merge_query(&self.key, query);
        debug!("Blogger API 요청 => {} {:?}", path, context);

        let response = match self.transport.get(path, &query) {
            Ok(response) => response,
            Err(e) => {
                let diagnostic = UpstreamError::new(0, e.to_string(), context);
                error!(status = diagnostic.status, context = ?diagnostic.context, "{}", diagnostic.message);
                return Fetched::with_diagnostic(None, Some(diagnostic));
            }
        };

        let Some(body) = decode_body(&response) else {
            return Fetched::ok(None);
        };

        if response.status == 200 {
            return Fetched::ok(Some(body));
        }

        let message = ErrorBody::deserialize(&body)
            .ok()
            .and_then(|b| b.message().map(str::to_owned))
            .unwrap_or_else(|| fallback.to_owned());
        let diagnostic = UpstreamError::new(response.status, message, context);
        error!(status = diagnostic.status, context = ?diagnostic.context, "{}", diagnostic.message);

        Fetched::with_diagnostic(Some(body), Some(diagnostic))
    }
}

/// 본문이 비어 있거나 JSON이 아니거나 빈 값(`null`, `{}`, `[]`)이면 `None`
fn decode_body(response: &RawResponse) -> Option<Value> {
    let body: Value = serde_json::from_str(&response.body).ok()?;
    match &body {
        Value::Null => None,
        Value::Object(map) if map.is_empty() => None,
        Value::Array(arr) if arr.is_empty() => None,
        _ => Some(body),
    }
}

/// 요청 쿼리 앞에 API 키를 추가한다. 같은 이름의 파라미터가 있으면 요청 쿼리가 우선한다.
fn merge_query(key: &str, query: &[(&str, &str)]) -> Vec<(String, String)> {
    let mut merged = Vec::with_capacity(query.len() + 1);
    if !query.iter().any(|(name, _)| *name == "key") {
        merged.push(("key".to_owned(), key.to_owned()));
    }
    merged.extend(query.iter().map(|(name, value)| (name.to_string(), value.to_string())));
    merged
}

fn validate_url(url: &str) -> Result<(), ClientError> {
    match Url::parse(url) {
        Ok(parsed) if parsed.has_host() => Ok(()),
        _ => Err(ClientError::InvalidUrl(url.to_owned())),
    }
}

fn context<const N: usize>(pairs: [(&str, &str); N]) -> Context {
    pairs.into_iter()
        .map(|(k, v)| (k.to_owned(), v.to_owned()))
        .collect()
}
