use serde::Serialize;
use tokio::task::JoinHandle;

pub const SOURCE_BSS: &str = "BSS";
pub const FLOW_SYNC_OFFERS: &str = "SYNC_OFFERS";
const ACTION_REQUEST: &str = "REQUEST";
const JSON_CONTENT: &str = "application/json";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingMessage {
    pub endpoint: String,
    pub body: String,
}

/// Запись журнала обмена для внешнего сервиса трекинга
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingRequest {
    pub tracking_id: String,
    pub source: String,
    pub flow: String,
    pub content_type: String,
    pub action: String,
    pub message: TrackingMessage,
}

impl TrackingRequest {
    /// Входящий JSON-запрос указанного потока
    pub fn inbound(source: &str, flow: &str, body: String) -> Self {
        Self {
            tracking_id: uuid::Uuid::new_v4().to_string(),
            source: source.to_string(),
            flow: flow.to_string(),
            content_type: JSON_CONTENT.to_string(),
            action: ACTION_REQUEST.to_string(),
            message: TrackingMessage {
                endpoint: String::new(),
                body,
            },
        }
    }
}

/// Клиент сервиса трекинга. Без адреса в конфигурации ничего не отправляет.
#[derive(Clone)]
pub struct TrackingClient {
    client: reqwest::Client,
    endpoint: Option<String>,
}

impl TrackingClient {
    pub fn new(endpoint: Option<String>) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.filter(|url| !url.trim().is_empty()),
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.endpoint.is_some()
    }

    /// Отправить запись в фоне; ошибки доставки только пишутся в лог
    pub fn send(&self, request: TrackingRequest) -> Option<JoinHandle<()>> {
        let endpoint = self.endpoint.clone()?;
        let client = self.client.clone();

        Some(tokio::spawn(async move {
            match client.post(&endpoint).json(&request).send().await {
                Ok(resp) if resp.status().is_success() => {
                    tracing::debug!(
                        tracking_id = %request.tracking_id,
                        "Tracking record delivered"
                    );
                }
                Ok(resp) => {
                    tracing::warn!(
                        "Tracking service {} answered HTTP {}",
                        endpoint,
                        resp.status().as_u16()
                    );
                }
                Err(e) => {
                    tracing::warn!("Tracking service {} is unreachable: {}", endpoint, e);
                }
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::State, routing::post, Json, Router};
    use tokio::net::TcpListener;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn without_endpoint_nothing_is_sent() {
        let client = TrackingClient::new(None).unwrap();
        assert!(!client.is_enabled());
        assert!(client
            .send(TrackingRequest::inbound(SOURCE_BSS, FLOW_SYNC_OFFERS, "{}".into()))
            .is_none());

        let blank = TrackingClient::new(Some("  ".into())).unwrap();
        assert!(!blank.is_enabled());
    }

    #[tokio::test]
    async fn record_is_posted_as_json() {
        let (tx, mut rx) = mpsc::unbounded_channel::<serde_json::Value>();
        let app = Router::new()
            .route(
                "/track",
                post(
                    |State(tx): State<mpsc::UnboundedSender<serde_json::Value>>,
                     Json(body): Json<serde_json::Value>| async move {
                        let _ = tx.send(body);
                    },
                ),
            )
            .with_state(tx);
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let client = TrackingClient::new(Some(format!("http://{}/track", addr))).unwrap();
        client
            .send(TrackingRequest::inbound(
                SOURCE_BSS,
                FLOW_SYNC_OFFERS,
                r#"{"syncOffers":[]}"#.into(),
            ))
            .unwrap()
            .await
            .unwrap();

        let received = rx.recv().await.unwrap();
        assert_eq!(received["source"], "BSS");
        assert_eq!(received["flow"], "SYNC_OFFERS");
        assert_eq!(received["action"], "REQUEST");
        assert_eq!(received["contentType"], "application/json");
        assert_eq!(received["message"]["body"], r#"{"syncOffers":[]}"#);
        assert!(!received["trackingId"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unreachable_service_does_not_fail_the_caller() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = TrackingClient::new(Some(format!("http://{}/track", addr))).unwrap();
        let handle = client
            .send(TrackingRequest::inbound(SOURCE_BSS, FLOW_SYNC_OFFERS, "{}".into()))
            .unwrap();

        assert!(handle.await.is_ok());
    }
}
