//! Network-backed capabilities: weather lookup and web search

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::json;
use std::time::Duration;

use crate::capability::implementation::{CapabilityHandler, HandlerError, HandlerOutput, StepInput};
use crate::core::types::{Language, Params};
use crate::plan::{Plan, Step};

/// Fetches a one-line weather report over HTTP
pub struct WeatherHandler {
    client: Client,
    base_url: String,
}

impl WeatherHandler {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Report URL for a city: the city is a path segment, the format a query
    pub fn report_url(&self, city: &str) -> Result<Url, HandlerError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| HandlerError::Failed(format!("invalid weather url: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| HandlerError::Failed("weather url cannot take a path".into()))?
            .pop_if_empty()
            .push(city.trim());
        url.query_pairs_mut().append_pair("format", "3");
        Ok(url)
    }
}

#[async_trait]
impl CapabilityHandler for WeatherHandler {
    async fn invoke(&self, input: StepInput) -> Result<HandlerOutput, HandlerError> {
        let city = input.str_param("city")?;
        let url = self.report_url(city)?;
        tracing::debug!("Fetching weather from {}", url);

        let report = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        let report = report.trim().to_string();
        if report.is_empty() {
            return Err(HandlerError::Failed(format!("no weather report for {}", city)));
        }

        Ok(HandlerOutput::new(report.clone())
            .with_output("city", json!(city))
            .with_output("report", json!(report)))
    }
}

/// Turns a query into a search-engine URL and delegates to `open_url`
pub struct SearchHandler {
    template: String,
}

impl SearchHandler {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    pub fn search_url(&self, query: &str) -> String {
        self.template
            .replace("{query}", &urlencoding::encode(query.trim()))
    }
}

#[async_trait]
impl CapabilityHandler for SearchHandler {
    async fn invoke(&self, input: StepInput) -> Result<HandlerOutput, HandlerError> {
        let query = input.str_param("query")?;
        let url = self.search_url(query);

        let mut params = Params::new();
        params.insert("url".into(), json!(url));
        let step = Step::new(1, "open_url", params).with_description(format!("open {}", url));
        let language = Language::detect(query);

        Ok(HandlerOutput::delegate(
            Plan::single(step, language),
            format!("Searching for {}", query),
        )
        .with_output("query", json!(query))
        .with_output("url", json!(url)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_url() {
        let h = WeatherHandler::new("https://wttr.in", Duration::from_secs(1));
        let url = h.report_url("New York").unwrap();
        assert_eq!(url.as_str(), "https://wttr.in/New%20York?format=3");

        let h = WeatherHandler::new("https://wttr.in/", Duration::from_secs(1));
        assert_eq!(
            h.report_url("Dubai").unwrap().as_str(),
            "https://wttr.in/Dubai?format=3"
        );
    }

    #[test]
    fn test_report_url_rejects_bad_base() {
        let h = WeatherHandler::new("not a url", Duration::from_secs(1));
        assert!(h.report_url("Cairo").is_err());
    }

    #[tokio::test]
    async fn test_search_delegates_to_open_url() {
        let h = SearchHandler::new("https://duckduckgo.com/?q={query}");
        let mut params = Params::new();
        params.insert("query".into(), json!("rust async"));
        let out = h.invoke(StepInput::new("web_search", params)).await.unwrap();

        let plan = out.nested.expect("nested plan");
        assert_eq!(plan.steps().len(), 1);
        assert_eq!(plan.steps()[0].capability, "open_url");
        assert_eq!(
            plan.steps()[0].param_str("url"),
            Some("https://duckduckgo.com/?q=rust%20async")
        );
    }

    #[test]
    fn test_search_encodes_arabic() {
        let h = SearchHandler::new("https://example.com/search?q={query}");
        let url = h.search_url("مطاعم");
        assert!(url.starts_with("https://example.com/search?q=%D9%85"));
    }
}
