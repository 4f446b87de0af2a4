use log::{debug, warn};

/// Log sink for HTTP exchanges with the detection server.
#[derive(Debug, Clone, Copy)]
pub struct RequestLog;

impl RequestLog {
    pub fn new() -> Self {
        Self
    }

    pub fn record_exchange(&self, url: &str, status: u16, content_type: Option<&str>) {
        debug!(
            "GET {} -> status {}, content type {}",
            url,
            status,
            content_type.unwrap_or("N/A")
        );
    }

    pub fn record_body(&self, url: &str, body: &str) {
        debug!("GET {} body: {}", url, body);
    }

    pub fn record_rejection(&self, url: &str, status: u16, content_type: Option<&str>) {
        warn!(
            "invalid response from {}: status {}, content type {}",
            url,
            status,
            content_type.unwrap_or("N/A")
        );
    }
}

impl Default for RequestLog {
    fn default() -> Self {
        Self::new()
    }
}
