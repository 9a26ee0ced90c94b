use crate::error::{ApiError, Result};
use reqwest::{Client, Response, Url};
use serde::Serialize;
use serde_json::Value;

/// JSON client bound to one API base URL.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base: Url,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let trimmed = base_url.trim().trim_end_matches('/');
        let parsed =
            Url::parse(trimmed).map_err(|_| ApiError::InvalidBaseUrl(base_url.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApiError::InvalidBaseUrl(base_url.to_string()));
        }

        let http = Client::builder()
            .user_agent(concat!("hpl/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| ApiError::Network {
                method: "INIT",
                path: String::new(),
                message: err.to_string(),
            })?;

        Ok(Self {
            http,
            base: parsed,
            base_url: trimmed.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Appends `segments` to the base path; each one is percent-encoded.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        // http(s) URLs always have a path to extend.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    pub async fn get_json(&self, segments: &[&str]) -> Result<Value> {
        let path = display_path(segments);
        let url = self.url(segments);
        log::debug!("GET {url}");
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|err| network_error("GET", &path, &err))?;
        finish("GET", &path, response).await
    }

    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        segments: &[&str],
        body: &B,
        token: Option<&str>,
    ) -> Result<Value> {
        let path = display_path(segments);
        let url = self.url(segments);
        log::debug!("POST {url}");
        let mut request = self.http.post(url).json(body);
        if let Some(token) = token.filter(|t| !t.is_empty()) {
            request = request.bearer_auth(token);
        }
        let response = request
            .send()
            .await
            .map_err(|err| network_error("POST", &path, &err))?;
        finish("POST", &path, response).await
    }
}

fn display_path(segments: &[&str]) -> String {
    format!("/{}", segments.join("/"))
}

async fn finish(method: &'static str, path: &str, response: Response) -> Result<Value> {
    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|err| network_error(method, path, &err))?;

    if !status.is_success() {
        log::debug!("{method} {path} -> {}", status.as_u16());
        return Err(ApiError::http(method, path, status.as_u16(), &text));
    }

    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    let payload: Value = serde_json::from_str(&text)
        .map_err(|err| ApiError::contract(format!("{method} {path} response"), err))?;
    Ok(unwrap_envelope(payload))
}

fn network_error(method: &'static str, path: &str, err: &reqwest::Error) -> ApiError {
    let kind = if err.is_timeout() {
        "timeout"
    } else if err.is_connect() {
        "connection failed"
    } else {
        "request failed"
    };
    ApiError::Network {
        method,
        path: path.to_string(),
        message: format!("{kind}: {err}"),
    }
}

/// `{ "ok": true, "data": X }` becomes `X`; any other payload is returned
/// unchanged.
pub fn unwrap_envelope(payload: Value) -> Value {
    match payload {
        Value::Object(mut map)
            if map.get("ok") == Some(&Value::Bool(true)) && map.contains_key("data") =>
        {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unwraps_only_ok_true_with_data() {
        assert_eq!(
            unwrap_envelope(json!({ "ok": true, "data": [1, 2] })),
            json!([1, 2])
        );
        assert_eq!(
            unwrap_envelope(json!({ "ok": true, "data": null })),
            Value::Null
        );

        let upsert = json!({ "ok": true, "slug": "a", "action": "created" });
        assert_eq!(unwrap_envelope(upsert.clone()), upsert);

        let failed = json!({ "ok": false, "data": { "x": 1 } });
        assert_eq!(unwrap_envelope(failed.clone()), failed);

        let bare = json!([{ "slug": "a" }]);
        assert_eq!(unwrap_envelope(bare.clone()), bare);
    }

    #[test]
    fn base_url_is_normalized_and_validated() {
        let client = ApiClient::new("https://api.example.com/").expect("client");
        assert_eq!(client.base_url(), "https://api.example.com");
        assert_eq!(
            client.url(&["lab-notes"]).as_str(),
            "https://api.example.com/lab-notes"
        );
        let nested = ApiClient::new("http://localhost:8080/api/").expect("client");
        assert_eq!(
            nested.url(&["admin", "notes"]).as_str(),
            "http://localhost:8080/api/admin/notes"
        );

        assert!(matches!(
            ApiClient::new("not a url"),
            Err(ApiError::InvalidBaseUrl(_))
        ));
        assert!(matches!(
            ApiClient::new("ftp://example.com"),
            Err(ApiError::InvalidBaseUrl(_))
        ));
    }

    #[test]
    fn path_segments_are_percent_encoded() {
        let client = ApiClient::new("https://api.example.com").expect("client");
        assert_eq!(
            client.url(&["lab-notes", "plain-slug_1.0~"]).as_str(),
            "https://api.example.com/lab-notes/plain-slug_1.0~"
        );
        assert_eq!(
            client.url(&["lab-notes", "a b/c"]).path(),
            "/lab-notes/a%20b%2Fc"
        );
        assert_eq!(client.url(&["lab-notes", "é"]).path(), "/lab-notes/%C3%A9");
        assert_eq!(display_path(&["lab-notes", "a b"]), "/lab-notes/a b");
    }
}
