use anyhow::{anyhow, Result};
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use std::time::Duration;

/// Build an HTTP client, with a request timeout only when one is configured
pub fn build_client(timeout: Option<Duration>) -> Result<Client> {
    let mut builder = Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    Ok(builder.build()?)
}

/// Turn a provider HTTP response into its JSON body, or an error naming the status
pub async fn handle_response(response: Response) -> Result<Value> {
    match response.status() {
        status if status.is_success() => Ok(response.json().await?),
        status if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() => {
            Err(anyhow!("Server error: {}", status))
        }
        status => {
            let body = response.text().await.unwrap_or_default();
            Err(anyhow!("Request failed: {}\nResponse: {}", status, body))
        }
    }
}
