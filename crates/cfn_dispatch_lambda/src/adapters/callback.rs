use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};

use crate::runtime::contract::OutcomeReport;

pub trait ResponseSender {
    fn send_response(&self, response_url: &str, report: &OutcomeReport) -> Result<(), String>;
}

pub fn render_report_body(report: &OutcomeReport) -> Result<String, String> {
    serde_json::to_string(report)
        .map_err(|error| format!("failed to serialize outcome report: {error}"))
}

/// Sends the outcome report to the pre-signed S3 `ResponseURL` with a single
/// PUT. The URL is signed without a content type, so the header is sent
/// empty.
#[derive(Debug, Clone)]
pub struct HttpResponseSender {
    client: reqwest::Client,
}

impl HttpResponseSender {
    pub fn new() -> Result<Self, String> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|error| format!("failed to build callback http client: {error}"))?;
        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    pub fn build_request(&self, response_url: &str, body: String) -> Result<reqwest::Request, String> {
        self.client
            .put(response_url)
            .header(CONTENT_TYPE, "")
            .header(CONTENT_LENGTH, body.len())
            .body(body)
            .build()
            .map_err(|error| format!("invalid callback request for '{response_url}': {error}"))
    }
}

impl ResponseSender for HttpResponseSender {
    fn send_response(&self, response_url: &str, report: &OutcomeReport) -> Result<(), String> {
        let body = render_report_body(report)?;
        let request = self.build_request(response_url, body)?;
        let client = self.client.clone();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                client
                    .execute(request)
                    .await
                    .and_then(|response| response.error_for_status())
                    .map(|_| ())
                    .map_err(|error| format!("failed to send outcome report: {error}"))
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use cfn_dispatch_core::contract::OutcomeStatus;
    use serde_json::Map;

    use super::*;

    fn sample_report() -> OutcomeReport {
        OutcomeReport {
            status: OutcomeStatus::Failed,
            reason: "Missing required parameters".to_string(),
            stack_id: "stack".to_string(),
            request_id: "request".to_string(),
            logical_resource_id: "Resource".to_string(),
            physical_resource_id: "S3.create_bucket".to_string(),
            data: Map::new(),
        }
    }

    #[test]
    fn builds_put_with_empty_content_type_and_length() {
        let sender = HttpResponseSender::with_client(reqwest::Client::new());
        let body = render_report_body(&sample_report()).expect("report should render");
        let expected_length = body.len().to_string();

        let request = sender
            .build_request("https://callback.example/presigned?sig=abc", body.clone())
            .expect("request should build");

        assert_eq!(request.method(), reqwest::Method::PUT);
        assert_eq!(
            request.url().as_str(),
            "https://callback.example/presigned?sig=abc"
        );
        assert_eq!(
            request
                .headers()
                .get(CONTENT_TYPE)
                .expect("content type header"),
            ""
        );
        assert_eq!(
            request
                .headers()
                .get(CONTENT_LENGTH)
                .expect("content length header"),
            expected_length.as_str()
        );
        assert_eq!(
            request.body().and_then(|value| value.as_bytes()),
            Some(body.as_bytes())
        );
    }

    #[test]
    fn rejects_unparseable_callback_url() {
        let sender = HttpResponseSender::with_client(reqwest::Client::new());
        let error = sender
            .build_request("not a url", "{}".to_string())
            .expect_err("invalid url should fail");
        assert!(error.contains("invalid callback request for 'not a url'"));
    }

    #[test]
    fn rendered_body_is_the_report_json() {
        let body = render_report_body(&sample_report()).expect("report should render");
        let parsed: serde_json::Value = serde_json::from_str(&body).expect("body is json");
        assert_eq!(parsed["Status"], "FAILED");
        assert_eq!(parsed["PhysicalResourceId"], "S3.create_bucket");
        assert_eq!(parsed["Data"], serde_json::json!({}));
    }
}
