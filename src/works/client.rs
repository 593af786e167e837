//! Thin HTTP client for the external works backend.
//!
//! Speaks minimal HTTP/1.1 over a TCP stream, one request per connection
//! (`Connection: close`). No retry, no pagination, no idempotency
//! guarantees: a failure is mapped into `WorksError`, logged, surfaced to
//! the user once, and the operation is abandoned.

use log::debug;
use thiserror::Error;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use super::model::{Work, WorkForm};
use crate::params::WorksApiConfig;

const MULTIPART_BOUNDARY: &str = "----wavescape-form-7d93b1c4";

/// Works API failure taxonomy
#[derive(Debug, Error)]
pub enum WorksError {
    #[error("request failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("server returned {status}")]
    Http { status: u16, body: String },
    #[error("malformed response body: {0}")]
    Json(#[from] serde_json::Error),
    #[error("malformed response: bad status line")]
    BadResponse,
}

struct Response {
    status: u16,
    body: Vec<u8>,
}

/// Client for the portfolio works REST API
pub struct WorksClient {
    config: WorksApiConfig,
}

impl WorksClient {
    pub fn new(config: WorksApiConfig) -> Self {
        Self { config }
    }

    /// `GET /api/works`
    pub async fn list(&self) -> Result<Vec<Work>, WorksError> {
        let path = self.config.base_path.clone();
        let response = self.request("GET", &path, None, &[]).await?;
        Ok(serde_json::from_slice(&response.body)?)
    }

    /// `POST /api/works` (multipart form)
    pub async fn create(&self, form: &WorkForm) -> Result<(), WorksError> {
        let body = self.form_body(form).await?;
        let path = self.config.base_path.clone();
        self.request("POST", &path, Some(multipart_content_type()), &body)
            .await?;
        Ok(())
    }

    /// `PUT /api/works/:id` (multipart form, same shape as create)
    pub async fn update(&self, id: &str, form: &WorkForm) -> Result<(), WorksError> {
        let body = self.form_body(form).await?;
        let path = format!("{}/{}", self.config.base_path, id);
        self.request("PUT", &path, Some(multipart_content_type()), &body)
            .await?;
        Ok(())
    }

    /// `DELETE /api/works/:id`
    pub async fn delete(&self, id: &str) -> Result<(), WorksError> {
        let path = format!("{}/{}", self.config.base_path, id);
        self.request("DELETE", &path, None, &[]).await?;
        Ok(())
    }

    /// `PATCH /api/works/:id/featured`
    pub async fn toggle_featured(&self, id: &str) -> Result<(), WorksError> {
        let path = format!("{}/{}/featured", self.config.base_path, id);
        self.request("PATCH", &path, None, &[]).await?;
        Ok(())
    }

    /// Assemble the multipart body, reading the image file when present
    async fn form_body(&self, form: &WorkForm) -> Result<Vec<u8>, WorksError> {
        let image = match &form.image {
            Some(path) => {
                let bytes = tokio::fs::read(path).await?;
                let filename = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "image".to_string());
                Some((filename, bytes))
            }
            None => None,
        };
        Ok(encode_multipart(form, image))
    }

    async fn request(
        &self,
        method: &str,
        path: &str,
        content_type: Option<String>,
        body: &[u8],
    ) -> Result<Response, WorksError> {
        debug!("{method} {path} ({} bytes)", body.len());

        let mut stream = TcpStream::connect(self.config.socket_addr()).await?;

        let mut head = format!(
            "{method} {path} HTTP/1.1\r\nHost: {}\r\nConnection: close\r\nAccept: application/json\r\n",
            self.config.host
        );
        if let Some(content_type) = content_type {
            head.push_str(&format!("Content-Type: {content_type}\r\n"));
        }
        head.push_str(&format!("Content-Length: {}\r\n\r\n", body.len()));

        stream.write_all(head.as_bytes()).await?;
        stream.write_all(body).await?;

        let mut raw = Vec::new();
        stream.read_to_end(&mut raw).await?;

        let response = parse_response(&raw)?;
        if response.status >= 400 {
            return Err(WorksError::Http {
                status: response.status,
                body: String::from_utf8_lossy(&response.body).into_owned(),
            });
        }
        Ok(response)
    }
}

fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}")
}

/// Encode the form fields (and optional image file) as multipart/form-data
fn encode_multipart(form: &WorkForm, image: Option<(String, Vec<u8>)>) -> Vec<u8> {
    let mut body = Vec::new();
    let featured = form.featured.to_string();
    let fields = [
        ("title", form.title.as_str()),
        ("category", form.category.as_str()),
        ("description", form.description.as_str()),
        ("link", form.link.as_str()),
        ("featured", featured.as_str()),
    ];
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{MULTIPART_BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }

    if let Some((filename, bytes)) = image {
        body.extend_from_slice(
            format!(
                "--{MULTIPART_BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{filename}\"\r\nContent-Type: {}\r\n\r\n",
                mime_for(&filename)
            )
            .as_bytes(),
        );
        body.extend_from_slice(&bytes);
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}--\r\n").as_bytes());
    body
}

fn mime_for(filename: &str) -> &'static str {
    match filename.rsplit_once('.').map(|(_, ext)| ext) {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

fn parse_response(raw: &[u8]) -> Result<Response, WorksError> {
    let header_end = raw
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .ok_or(WorksError::BadResponse)?;
    let head = std::str::from_utf8(&raw[..header_end]).map_err(|_| WorksError::BadResponse)?;

    // Status line: HTTP/1.1 200 OK
    let status = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|code| code.parse().ok())
        .ok_or(WorksError::BadResponse)?;

    Ok(Response {
        status,
        body: raw[header_end + 4..].to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    /// Serve one canned HTTP response on a loopback port, returning the raw
    /// request bytes the client sent
    async fn one_shot_server(
        status_line: &'static str,
        body: &'static str,
    ) -> (WorksApiConfig, tokio::task::JoinHandle<Vec<u8>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            // Read until the headers (and any Content-Length body) are in
            loop {
                let n = stream.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
                if let Some(header_end) = request.windows(4).position(|w| w == b"\r\n\r\n") {
                    let head = String::from_utf8_lossy(&request[..header_end]).into_owned();
                    let expected: usize = head
                        .lines()
                        .find(|l| l.to_ascii_lowercase().starts_with("content-length:"))
                        .and_then(|l| l.split(':').nth(1))
                        .and_then(|v| v.trim().parse().ok())
                        .unwrap_or(0);
                    if request.len() >= header_end + 4 + expected {
                        break;
                    }
                }
            }
            let response = format!(
                "{status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.unwrap();
            request
        });

        let config = WorksApiConfig {
            host: addr.ip().to_string(),
            port: addr.port(),
            base_path: "/api/works".to_string(),
        };
        (config, handle)
    }

    #[tokio::test]
    async fn test_list_parses_works() {
        let body = r#"[{"_id":"1","title":"A","category":"SEO","description":"d","featured":false}]"#;
        let (config, server) = one_shot_server("HTTP/1.1 200 OK", body).await;

        let works = WorksClient::new(config).list().await.unwrap();
        assert_eq!(works.len(), 1);
        assert_eq!(works[0].title, "A");

        let request = String::from_utf8(server.await.unwrap()).unwrap();
        assert!(request.starts_with("GET /api/works HTTP/1.1\r\n"));
    }

    #[tokio::test]
    async fn test_toggle_featured_hits_patch_route() {
        let (config, server) = one_shot_server("HTTP/1.1 200 OK", "{}").await;

        WorksClient::new(config).toggle_featured("66f0a1").await.unwrap();

        let request = String::from_utf8(server.await.unwrap()).unwrap();
        assert!(request.starts_with("PATCH /api/works/66f0a1/featured HTTP/1.1\r\n"));
    }

    #[tokio::test]
    async fn test_server_error_surfaces_status() {
        let (config, _server) =
            one_shot_server("HTTP/1.1 500 Internal Server Error", "boom").await;

        let err = WorksClient::new(config).list().await.unwrap_err();
        match err {
            WorksError::Http { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "boom");
            }
            other => panic!("expected Http error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_create_sends_multipart_fields() {
        let (config, server) = one_shot_server("HTTP/1.1 201 Created", "{}").await;

        let form = WorkForm {
            title: "Neon rebrand".to_string(),
            category: "Branding".to_string(),
            description: "Full refresh".to_string(),
            link: "https://example.com".to_string(),
            featured: true,
            image: None,
        };
        WorksClient::new(config).create(&form).await.unwrap();

        let request = String::from_utf8(server.await.unwrap()).unwrap();
        assert!(request.starts_with("POST /api/works HTTP/1.1\r\n"));
        assert!(request.contains("multipart/form-data; boundary="));
        assert!(request.contains("name=\"title\"\r\n\r\nNeon rebrand\r\n"));
        assert!(request.contains("name=\"featured\"\r\n\r\ntrue\r\n"));
    }

    #[test]
    fn test_multipart_image_part_framing() {
        let form = WorkForm {
            title: "t".to_string(),
            category: "Creative".to_string(),
            ..WorkForm::default()
        };
        let body = encode_multipart(&form, Some(("shot.png".to_string(), vec![1, 2, 3])));
        let text = String::from_utf8_lossy(&body);

        assert!(text.contains("name=\"image\"; filename=\"shot.png\""));
        assert!(text.contains("Content-Type: image/png"));
        assert!(text.ends_with(&format!("--{MULTIPART_BOUNDARY}--\r\n")));
    }

    #[test]
    fn test_parse_response_rejects_garbage() {
        assert!(matches!(
            parse_response(b"not http at all"),
            Err(WorksError::BadResponse)
        ));
    }
}
