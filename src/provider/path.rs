use reqwest::Url;

/// 리소스의 정규 URL(`url` 필드)에서 경로 부분만 추출한다.
///
/// URL이 비어 있거나 해석할 수 없는 경우 빈 문자열을 반환한다.
/// 스킴과 호스트가 없는 `/`로 시작하는 값은 쿼리와 프래그먼트를 제외한 나머지를 그대로 경로로 사용한다.
pub fn derive_path(canonical_url: &str) -> String {
    let canonical_url = canonical_url.trim();
    if canonical_url.is_empty() {
        return String::new();
    }

    match Url::parse(canonical_url) {
        Ok(url) => url.path().to_owned(),
        Err(_) if canonical_url.starts_with('/') => {
            let end = canonical_url.find(['?', '#']).unwrap_or(canonical_url.len());
            canonical_url[..end].to_owned()
        }
        Err(_) => String::new(),
    }
}
