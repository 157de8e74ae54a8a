//! libcurl-backed transport.
//!
//! Each request runs a blocking `curl::easy::Easy` transfer on tokio's
//! blocking pool. Redirects are followed; only the final response's headers
//! are kept.

use super::{HttpRequest, HttpResponse, Method, Transport, TransportError};
use crate::config::HttpConfig;
use std::future::Future;
use std::str;
use std::time::Duration;

#[derive(Debug, Clone, Copy)]
pub struct CurlTransport {
    connect_timeout: Duration,
    request_timeout: Duration,
}

impl Default for CurlTransport {
    fn default() -> Self {
        Self::from_config(&HttpConfig::default())
    }
}

impl CurlTransport {
    pub fn from_config(cfg: &HttpConfig) -> Self {
        Self {
            connect_timeout: Duration::from_secs(cfg.connect_timeout_secs),
            request_timeout: Duration::from_secs(cfg.request_timeout_secs),
        }
    }

    /// Performs the request in the current thread.
    fn perform(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut header_lines: Vec<String> = Vec::new();
        let mut body: Vec<u8> = Vec::new();

        let mut easy = curl::easy::Easy::new();
        easy.url(&request.url)?;
        easy.follow_location(true)?;
        easy.max_redirections(5)?;
        easy.connect_timeout(self.connect_timeout)?;
        easy.timeout(self.request_timeout)?;

        match request.method {
            Method::Get => easy.get(true)?,
            Method::Post => {
                easy.post(true)?;
                if let Some(payload) = &request.body {
                    easy.post_fields_copy(payload)?;
                }
            }
        }

        let mut list = curl::easy::List::new();
        for (k, v) in &request.headers {
            list.append(&format!("{}: {}", k.trim(), v.trim()))?;
        }
        if !request.headers.is_empty() {
            easy.http_headers(list)?;
        }

        {
            let mut transfer = easy.transfer();
            transfer.header_function(|data| {
                if let Ok(s) = str::from_utf8(data) {
                    let line = s.trim_end();
                    // A new status line starts a new response (redirect hop).
                    if line.starts_with("HTTP/") {
                        header_lines.clear();
                    }
                    header_lines.push(line.to_string());
                }
                true
            })?;
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let status = easy.response_code()?;
        Ok(HttpResponse {
            status,
            headers: parse_header_lines(&header_lines),
            body,
        })
    }
}

impl Transport for CurlTransport {
    fn send(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send {
        let this = *self;
        async move {
            tracing::debug!("{:?} {}", request.method, request.url);
            tokio::task::spawn_blocking(move || this.perform(&request))
                .await
                .map_err(|e| TransportError::Task(e.to_string()))?
        }
    }
}

/// Parse collected header lines into (name, value) pairs, skipping the status line.
fn parse_header_lines(lines: &[String]) -> Vec<(String, String)> {
    lines
        .iter()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty() && !l.starts_with("HTTP/"))
        .filter_map(|l| l.split_once(':'))
        .map(|(name, value)| (name.trim().to_string(), value.trim().to_string()))
        .collect()
}
