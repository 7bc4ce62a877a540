//! Standalone text utilities exposed alongside search.

use crate::error::FetchError;

pub const DEFAULT_READER_PREFIX: &str = "https://r.jina.ai/";

/// Number of characters (Unicode scalar values) in `text`
pub fn count_characters(text: &str) -> usize {
    text.chars().count()
}

/// Fetches pages as rendered text through a reader proxy
#[derive(Clone)]
pub struct ReaderClient {
    client: reqwest::Client,
    prefix: String,
}

impl ReaderClient {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            prefix: prefix.into(),
        }
    }

    /// Proxy url for `url`; urls already routed through the proxy pass unchanged
    pub fn reader_url(&self, url: &str) -> String {
        if url.starts_with(&self.prefix) {
            url.to_string()
        } else {
            format!("{}{}", self.prefix, url)
        }
    }

    pub async fn download_content(&self, url: &str) -> Result<String, FetchError> {
        let reader_url = self.reader_url(url);
        tracing::debug!("Fetching {}", reader_url);

        let response = self.client.get(&reader_url).send().await?;
        if !response.status().is_success() {
            return Err(FetchError::Status {
                url: reader_url,
                status: response.status(),
            });
        }
        Ok(response.text().await?)
    }
}

impl Default for ReaderClient {
    fn default() -> Self {
        Self::new(DEFAULT_READER_PREFIX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_characters() {
        assert_eq!(count_characters("Hello World"), 11);
        assert_eq!(count_characters("Multi\nline\ntext"), 15);
        assert_eq!(count_characters("Special chars: !@#$%^&*()"), 25);
        assert_eq!(count_characters("héllo"), 5);
        assert_eq!(count_characters(""), 0);
    }

    #[test]
    fn test_reader_url() {
        let reader = ReaderClient::default();
        assert_eq!(
            reader.reader_url("https://example.com"),
            "https://r.jina.ai/https://example.com"
        );
        assert_eq!(
            reader.reader_url("https://r.jina.ai/https://example.com"),
            "https://r.jina.ai/https://example.com"
        );
    }
}
