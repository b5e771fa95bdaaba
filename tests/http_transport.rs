use blogger_api::config::blogger::Config;
use blogger_api::provider::model::{Entry, Resource};
use blogger_api::{Client, ClientError, Transport};
use mockito::Matcher;

fn config(server: &mockito::Server) -> Config {
    Config::new("secret", Some("https://example.blogspot.com/".to_owned()))
        .with_endpoint(format!("{}/blogger/v3/blogs/", server.url()))
}

#[test]
fn posts_request_carries_key_and_headers() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/blogger/v3/blogs/123/posts")
        .match_query(Matcher::UrlEncoded("key".into(), "secret".into()))
        .match_header("accept-encoding", "gzip")
        .match_header("user-agent", "blogger-api (gzip)")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"kind":"blogger#postList","items":[{"id":"1","url":"https://example.blogspot.com/2024/01/hello.html"}]}"#)
        .create();

    let client = Client::from_config(&config(&server)).unwrap().set_blog("123");
    let fetched = client.posts(None);

    mock.assert();
    assert!(fetched.is_clean());
    assert_eq!(fetched.value.items.len(), 1);
    assert_eq!(fetched.value.items[0].path(), "/2024/01/hello.html");
}

#[test]
fn blog_by_default_url() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/blogger/v3/blogs/byurl")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("key".into(), "secret".into()),
            Matcher::UrlEncoded("url".into(), "https://example.blogspot.com/".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"id":"42","name":"Example","url":"https://example.blogspot.com/"}"#)
        .create();

    let client = Client::from_config(&config(&server)).unwrap();
    let blog = client.blog(None).unwrap().into_value().and_then(Entry::into_typed).unwrap();

    mock.assert();
    assert_eq!(blog.id, "42");
    assert_eq!(blog.name, "Example");
}

#[test]
fn search_sends_keyword() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/blogger/v3/blogs/9/posts/search")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("key".into(), "secret".into()),
            Matcher::UrlEncoded("q".into(), "rust lang".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"items":[]}"#)
        .create();

    let client = Client::from_config(&config(&server)).unwrap();
    let fetched = client.search("rust lang", Some("9"));

    mock.assert();
    assert!(fetched.value.is_empty());
}

#[test]
fn not_found_is_logged_and_returned() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/blogger/v3/blogs/9/pages/5")
        .match_query(Matcher::Any)
        .with_status(404)
        .with_body(r#"{"error":{"code":404,"message":"Not Found"}}"#)
        .create();

    let client = Client::from_config(&config(&server)).unwrap();
    let fetched = client.page("5", Some("9"));

    mock.assert();
    let diagnostic = fetched.diagnostic.unwrap();
    assert_eq!(diagnostic.status, 404);
    assert_eq!(diagnostic.message, "Not Found");

    let page = fetched.value.and_then(Entry::into_typed).unwrap();
    assert!(page.extra.contains_key("error"));
}

#[test]
fn non_success_status_is_not_a_transport_error() {
    let mut server = mockito::Server::new();
    server
        .mock("GET", "/blogger/v3/blogs/1/posts")
        .match_query(Matcher::Any)
        .with_status(500)
        .with_body("")
        .create();

    let client = Client::from_config(&config(&server)).unwrap();
    let response = client.transport()
        .get("1/posts", &[("key".to_owned(), "secret".to_owned())])
        .unwrap();

    assert_eq!(response.status, 500);
    assert_eq!(response.body, "");
}

#[test]
fn unreachable_server_yields_empty_result() {
    let config = Config::new("secret", None).with_endpoint("http://127.0.0.1:9/blogger/v3/blogs/");
    let client = Client::from_config(&config).unwrap();

    let fetched = client.pages(Some("1"));
    assert!(fetched.value.is_empty());
    assert_eq!(fetched.diagnostic.unwrap().status, 0);
}

#[test]
fn empty_key_is_rejected() {
    let err = Client::from_config(&Config::new("", None)).unwrap_err();
    assert_eq!(err, ClientError::MissingApiKey);
}
