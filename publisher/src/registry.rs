//! Minimal schema registry client: registers the device schema and returns
//! the id that prefixes every payload.

use crate::errors::{Error, Result};
use crate::schema::DeviceSchema;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

const REGISTRY_CONTENT_TYPE: &str = "application/vnd.schemaregistry.v1+json";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Serialize)]
struct RegisterRequest<'a> {
    schema: &'a str,
}

#[derive(Debug, Deserialize)]
struct RegisterResponse {
    id: u32,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    message: String,
}

/// Value subject for `topic` under the topic-name strategy.
pub fn subject_for(topic: &str) -> String {
    format!("{}-value", topic)
}

pub struct SchemaRegistry {
    client: Client,
    base_url: String,
}

impl SchemaRegistry {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Registers `schema` under `subject`. Registering an identical schema
    /// again returns the existing id.
    pub async fn register(&self, subject: &str, schema: &DeviceSchema) -> Result<u32> {
        let url = format!("{}/subjects/{}/versions", self.base_url, subject);
        debug!("Registering schema at {}", url);

        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, REGISTRY_CONTENT_TYPE)
            .json(&RegisterRequest {
                schema: schema.text(),
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.message)
                .unwrap_or(body);
            return Err(Error::Registry {
                status: status.as_u16(),
                message,
            });
        }

        let registered: RegisterResponse = response.json().await?;
        info!(subject, schema_id = registered.id, "Schema registered");
        Ok(registered.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::serve_responses;
    use tokio::net::TcpListener;

    #[test]
    fn test_subject_for_topic() {
        assert_eq!(subject_for("devices"), "devices-value");
    }

    #[test]
    fn test_register_returns_id() {
        tokio_test::block_on(async {
            let (url, server) = serve_responses(vec![("200 OK", r#"{"id": 42}"#)]).await;
            let registry = SchemaRegistry::new(&format!("{}/", url)).unwrap();
            let schema = DeviceSchema::embedded().unwrap();

            let id = registry.register("devices-value", &schema).await.unwrap();
            assert_eq!(id, 42);

            let requests = server.await.unwrap();
            let request = &requests[0];
            assert!(request.starts_with("POST /subjects/devices-value/versions HTTP/1.1"));
            assert!(request
                .to_ascii_lowercase()
                .contains("content-type: application/vnd.schemaregistry.v1+json"));

            let body = &request[request.find("\r\n\r\n").unwrap() + 4..];
            let sent: serde_json::Value = serde_json::from_str(body).unwrap();
            let sent_schema = sent["schema"].as_str().unwrap();
            assert!(DeviceSchema::parse(sent_schema).is_ok());
        });
    }

    #[test]
    fn test_register_rejected() {
        tokio_test::block_on(async {
            let (url, server) = serve_responses(vec![(
                "409 Conflict",
                r#"{"error_code": 409, "message": "Schema being registered is incompatible"}"#,
            )])
            .await;
            let registry = SchemaRegistry::new(&url).unwrap();
            let schema = DeviceSchema::embedded().unwrap();

            let result = registry.register("devices-value", &schema).await;
            match result {
                Err(Error::Registry { status, message }) => {
                    assert_eq!(status, 409);
                    assert_eq!(message, "Schema being registered is incompatible");
                }
                other => panic!("unexpected result {:?}", other),
            }
            server.await.unwrap();
        });
    }

    #[test]
    fn test_register_unreachable() {
        tokio_test::block_on(async {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            let url = format!("http://{}", listener.local_addr().unwrap());
            drop(listener);

            let registry = SchemaRegistry::new(&url).unwrap();
            let schema = DeviceSchema::embedded().unwrap();

            let result = registry.register("devices-value", &schema).await;
            assert!(matches!(result, Err(Error::Http(_))));
        });
    }
}
