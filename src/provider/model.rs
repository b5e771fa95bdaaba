use crate::provider::error::UpstreamError;
use crate::provider::path::derive_path;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

/// 모델에 정의 되지 않은 응답 필드로 직렬화 시 그대로 다시 출력된다.
pub type Extra = Map<String, Value>;

/// 정규 URL로부터 `path`를 파생할 수 있는 리소스
pub trait Resource {
    fn canonical_url(&self) -> &str;

    fn path(&self) -> &str;

    fn set_path(&mut self, path: String);

    /// 리소스가 자신이 속한 블로그 참조(`blog`)를 포함하고 있는지 여부
    fn has_parent(&self) -> bool;

    fn attach_path(&mut self) {
        let path = derive_path(self.canonical_url());
        self.set_path(path);
    }
}

/// API 호출 결과로 항상 값을 반환하며, 업스트림 에러가 있었다면 진단 정보를 함께 담는다.
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched<T> {
    pub value: T,
    pub diagnostic: Option<UpstreamError>,
}

impl<T> Fetched<T> {
    pub fn ok(value: T) -> Self {
        Fetched { value, diagnostic: None }
    }

    pub fn with_diagnostic(value: T, diagnostic: Option<UpstreamError>) -> Self {
        Fetched { value, diagnostic }
    }

    pub fn is_clean(&self) -> bool {
        self.diagnostic.is_none()
    }

    pub fn into_value(self) -> T {
        self.value
    }
}

/// 디코딩된 리소스 하나
///
/// 모델에 맞지 않는 값은 버리지 않고 원본 JSON 그대로 `Raw`로 보관한다.
/// `Raw`가 객체라면 `path`는 객체의 `path` 키로 추가된다.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Entry<T> {
    Typed(T),
    Raw(Value),
}

impl<T: DeserializeOwned> Entry<T> {
    pub fn from_value(value: Value) -> Self {
        match T::deserialize(&value) {
            Ok(typed) => Entry::Typed(typed),
            Err(e) => {
                warn!("모델과 맞지 않는 응답 항목을 원본 그대로 반환 합니다. => {}", e);
                Entry::Raw(value)
            }
        }
    }
}

impl<T> Entry<T> {
    pub fn typed(&self) -> Option<&T> {
        match self {
            Entry::Typed(typed) => Some(typed),
            Entry::Raw(_) => None,
        }
    }

    pub fn into_typed(self) -> Option<T> {
        match self {
            Entry::Typed(typed) => Some(typed),
            Entry::Raw(_) => None,
        }
    }

    pub fn raw(&self) -> Option<&Value> {
        match self {
            Entry::Typed(_) => None,
            Entry::Raw(value) => Some(value),
        }
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Entry<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Entry::from_value)
    }
}

impl<T: Resource> Resource for Entry<T> {
    fn canonical_url(&self) -> &str {
        match self {
            Entry::Typed(typed) => typed.canonical_url(),
            Entry::Raw(value) => value.get("url").and_then(Value::as_str).unwrap_or_default(),
        }
    }

    fn path(&self) -> &str {
        match self {
            Entry::Typed(typed) => typed.path(),
            Entry::Raw(value) => value.get("path").and_then(Value::as_str).unwrap_or_default(),
        }
    }

    fn set_path(&mut self, path: String) {
        match self {
            Entry::Typed(typed) => typed.set_path(path),
            Entry::Raw(Value::Object(map)) => {
                map.insert("path".to_owned(), Value::String(path));
            }
            Entry::Raw(_) => {}
        }
    }

    fn has_parent(&self) -> bool {
        match self {
            Entry::Typed(typed) => typed.has_parent(),
            Entry::Raw(value) => value.get("blog").is_some_and(|blog| !blog.is_null()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blog {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub url: String,
    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub published: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub posts: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<Value>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub path: String,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Resource for Blog {
    fn canonical_url(&self) -> &str {
        &self.url
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn set_path(&mut self, path: String) {
        self.path = path;
    }

    fn has_parent(&self) -> bool {
        false
    }
}

/// 게시글, 페이지가 포함하는 상위 블로그 참조
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlogRef {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub display_name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub url: String,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub content: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub url: String,
    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub published: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<Author>,
    #[serde(default, deserialize_with = "lenient::strings", skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blog: Option<BlogRef>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub path: String,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Resource for Post {
    fn canonical_url(&self) -> &str {
        &self.url
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn set_path(&mut self, path: String) {
        self.path = path;
    }

    fn has_parent(&self) -> bool {
        self.blog.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub content: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub url: String,
    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub published: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<Author>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blog: Option<BlogRef>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub path: String,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Resource for Page {
    fn canonical_url(&self) -> &str {
        &self.url
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn set_path(&mut self, path: String) {
        self.path = path;
    }

    fn has_parent(&self) -> bool {
        self.blog.is_some()
    }
}

/// 게시글, 페이지 목록 응답으로 페이지 토큰은 가공하지 않고 그대로 전달한다.
///
/// 각 항목은 독립적으로 디코딩 되어 한 항목이 모델과 맞지 않아도 나머지 항목과 토큰은 유지된다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", bound(deserialize = "T: DeserializeOwned"))]
pub struct ResourceList<T> {
    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default = "Vec::new", deserialize_with = "lenient::entries")]
    pub items: Vec<Entry<T>>,
    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub prev_page_token: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl<T> ResourceList<T> {
    pub fn empty() -> Self {
        ResourceList {
            kind: None,
            items: Vec::new(),
            next_page_token: None,
            prev_page_token: None,
            extra: Extra::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn typed(&self) -> impl Iterator<Item = &T> {
        self.items.iter().filter_map(Entry::typed)
    }
}

impl<T> Default for ResourceList<T> {
    fn default() -> Self {
        ResourceList::empty()
    }
}

/// Blogger API 에러 응답 (`{"error": {"message": ..}}`)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<ErrorDetail>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorDetail {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub message: Option<String>,
}

impl ErrorBody {
    pub fn message(&self) -> Option<&str> {
        self.error
            .as_ref()
            .and_then(|e| e.message.as_deref())
            .filter(|m| !m.is_empty())
    }
}

/// `null`, 숫자, 불리언 값을 문자열 필드로 받아들이는 역직렬화 함수들
mod lenient {
    use super::Entry;
    use serde::de::{DeserializeOwned, Error};
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    fn scalar<E: Error>(value: Value) -> Result<Option<String>, E> {
        match value {
            Value::Null => Ok(None),
            Value::String(s) => Ok(Some(s)),
            Value::Number(n) => Ok(Some(n.to_string())),
            Value::Bool(b) => Ok(Some(b.to_string())),
            other => Err(E::custom(format!("expected a scalar value, found {}", other))),
        }
    }

    pub fn string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        scalar(Value::deserialize(deserializer)?).map(Option::unwrap_or_default)
    }

    pub fn opt_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
        scalar(Value::deserialize(deserializer)?)
    }

    pub fn strings<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(Vec::new()),
            Value::Array(values) => Ok(values.into_iter()
                .filter_map(|v| scalar::<D::Error>(v).ok().flatten())
                .collect()),
            other => scalar(other).map(|s| s.into_iter().collect()),
        }
    }

    pub fn entries<'de, D, T>(deserializer: D) -> Result<Vec<Entry<T>>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(Vec::new()),
            Value::Array(values) => Ok(values.into_iter().map(Entry::from_value).collect()),
            other => Err(D::Error::custom(format!("expected an array of items, found {}", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_keeps_unknown_fields() {
        let post: Post = serde_json::from_str(
            r#"{"id":"1","title":"Hello","url":"https://example.com/2024/01/hello.html","replies":{"totalItems":"3"}}"#,
        ).unwrap();

        assert_eq!(post.title, "Hello");
        assert!(post.extra.contains_key("replies"));

        let json = serde_json::to_value(&post).unwrap();
        assert_eq!(json["replies"]["totalItems"], "3");
    }

    #[test]
    fn post_accepts_null_and_numeric_scalars() {
        let post: Post = serde_json::from_str(
            r#"{"id":5,"title":null,"url":"https://example.com/a.html","labels":["rust",2024,null],"published":null}"#,
        ).unwrap();

        assert_eq!(post.id, "5");
        assert_eq!(post.title, "");
        assert_eq!(post.labels, vec!["rust".to_owned(), "2024".to_owned()]);
        assert_eq!(post.published, None);
    }

    #[test]
    fn post_attach_path() {
        let mut post = Post {
            url: "https://example.com/2024/01/hello.html".to_string(),
            ..Post::default()
        };
        post.attach_path();
        assert_eq!(post.path, "/2024/01/hello.html");
    }

    #[test]
    fn post_has_parent_only_with_blog_reference() {
        let orphan: Post = serde_json::from_str(r#"{"url":""}"#).unwrap();
        assert!(!orphan.has_parent());

        let child: Post = serde_json::from_str(r#"{"url":"","blog":{"id":"42"}}"#).unwrap();
        assert!(child.has_parent());
        assert_eq!(child.blog.unwrap().id, "42");
    }

    #[test]
    fn entry_keeps_raw_value_when_model_does_not_fit() {
        let mut entry: Entry<Post> = serde_json::from_str(
            r#"{"title":{"rendered":"Hello"},"url":"https://example.com/2024/01/hello.html","blog":{"id":"1"}}"#,
        ).unwrap();

        assert!(entry.typed().is_none());
        assert!(entry.has_parent());

        entry.attach_path();
        assert_eq!(entry.path(), "/2024/01/hello.html");
        assert_eq!(entry.raw().unwrap()["title"]["rendered"], "Hello");
    }

    #[test]
    fn raw_entry_without_object_has_no_path() {
        let mut entry: Entry<Post> = serde_json::from_str(r#""just a string""#).unwrap();
        entry.attach_path();

        assert_eq!(entry.path(), "");
        assert!(!entry.has_parent());
    }

    #[test]
    fn resource_list_passes_page_tokens_through() {
        let list: ResourceList<Page> = serde_json::from_str(
            r#"{"kind":"blogger#pageList","items":[{"id":"7"}],"nextPageToken":"abc"}"#,
        ).unwrap();

        assert_eq!(list.len(), 1);
        assert_eq!(list.next_page_token.as_deref(), Some("abc"));
        assert_eq!(list.prev_page_token, None);
    }

    #[test]
    fn resource_list_decodes_items_independently() {
        let list: ResourceList<Post> = serde_json::from_str(
            r#"{"items":[{"id":"1"},{"title":["odd"]},{"id":3}],"nextPageToken":"n"}"#,
        ).unwrap();

        assert_eq!(list.len(), 3);
        assert_eq!(list.typed().map(|p| p.id.as_str()).collect::<Vec<_>>(), vec!["1", "3"]);
        assert!(list.items[1].raw().is_some());
        assert_eq!(list.next_page_token.as_deref(), Some("n"));
    }

    #[test]
    fn resource_list_without_items() {
        let list: ResourceList<Post> = serde_json::from_str(r#"{"kind":"blogger#postList","items":null}"#).unwrap();
        assert!(list.is_empty());
    }

    #[test]
    fn raw_entry_serializes_as_original_json() {
        let entry: Entry<Post> = Entry::Raw(serde_json::json!({"title": ["odd"]}));
        assert_eq!(serde_json::to_string(&entry).unwrap(), r#"{"title":["odd"]}"#);
    }

    #[test]
    fn error_body_message() {
        let body: ErrorBody = serde_json::from_str(r#"{"error":{"code":404,"message":"Not Found"}}"#).unwrap();
        assert_eq!(body.message(), Some("Not Found"));

        let body: ErrorBody = serde_json::from_str(r#"{"error":{"message":""}}"#).unwrap();
        assert_eq!(body.message(), None);
    }
}
