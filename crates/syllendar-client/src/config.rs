use std::time::Duration;

/// Configuration for the Syllendar API client.
///
/// The base endpoint is an explicit, injected value resolved once at startup;
/// nothing in the client reads the environment ad hoc.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Base URL of the Syllendar backend.
    pub base_url: String,
    /// Default HTTP timeout for requests, including streamed ones.
    pub timeout: Duration,
}

const DEFAULT_BASE_URL: &str = "http://localhost:8000";

impl ClientConfig {
    /// Creates a config pointing at the given base URL with default timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(120),
        }
    }

    /// Builds a config from `SYLLENDAR_API_URL`, falling back to the local
    /// development backend when unset.
    pub fn from_env() -> Self {
        let base_url = std::env::var("SYLLENDAR_API_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self::new(base_url)
    }

    /// Overrides the default HTTP timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn join(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.trim_end_matches('/'))
    }

    pub(crate) fn analyze_stream_url(&self) -> String {
        self.join("/pdf/analyze-stream")
    }

    pub(crate) fn analyze_url(&self) -> String {
        self.join("/pdf/analyze")
    }

    pub(crate) fn analyze_image_url(&self) -> String {
        self.join("/generate/analyze-image")
    }

    pub(crate) fn chat_stream_url(&self) -> String {
        self.join("/generate/chat-stream")
    }

    pub(crate) fn chat_url(&self) -> String {
        self.join("/generate/chat")
    }

    pub(crate) fn calendar_url(&self) -> String {
        self.join("/generate/generate-ics")
    }

    pub(crate) fn calendar_selected_url(&self) -> String {
        self.join("/generate/generate-ics-selected")
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_are_joined_without_duplicate_slashes() {
        let config = ClientConfig::new("http://api.example.com/");
        assert_eq!(
            config.analyze_stream_url(),
            "http://api.example.com/pdf/analyze-stream"
        );
        assert_eq!(
            config.chat_url(),
            "http://api.example.com/generate/chat"
        );
    }

    #[test]
    fn default_points_at_local_backend() {
        assert_eq!(ClientConfig::default().base_url, "http://localhost:8000");
    }
}
