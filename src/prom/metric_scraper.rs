use anyhow::{Context, Result};

/// Blocking fetch of one exposition document from a metrics endpoint.
///
/// Transport problems (unreachable host, non-success status) are the only
/// errors this layer surfaces; what the body contains is the parser's
/// business.
#[derive(Debug)]
pub struct MetricScraper {
    endpoint: String,
    client: reqwest::blocking::Client,
}

impl MetricScraper {
    pub fn new(endpoint: String) -> MetricScraper {
        MetricScraper {
            endpoint,
            client: reqwest::blocking::Client::new(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn fetch(&self) -> Result<String> {
        let response = self
            .client
            .get(&self.endpoint)
            .send()
            .with_context(|| format!("failed to reach {}", self.endpoint))?
            .error_for_status()
            .with_context(|| format!("metrics endpoint {} answered with an error", self.endpoint))?;
        response
            .text()
            .with_context(|| format!("failed to read the response body from {}", self.endpoint))
    }
}
