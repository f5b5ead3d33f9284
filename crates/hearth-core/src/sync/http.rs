//! HTTP/WebSocket implementation of the remote service boundary.

use futures_util::StreamExt;
use reqwest::StatusCode;
use serde::Deserialize;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use crate::collection::Collection;
use crate::config::RemoteConfig;
use crate::error::{Error, Result};
use crate::util::{compact_text, is_http_url};

use super::remote::{LiveFeed, RemoteEvent, RemoteService, WireRecord};

const LIVE_EVENT_BUFFER: usize = 256;

/// Remote data service client speaking REST for pull/push and WebSocket for
/// live updates
#[derive(Clone)]
pub struct HttpRemote {
    base_url: String,
    realtime_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl HttpRemote {
    pub fn new(config: &RemoteConfig) -> Result<Self> {
        let base_url = config
            .url
            .clone()
            .filter(|url| is_http_url(url))
            .ok_or_else(|| {
                Error::InvalidInput("remote url must include http:// or https://".to_string())
            })?;
        let realtime_url = config.realtime_url().ok_or_else(|| {
            Error::InvalidInput("remote url must include http:// or https://".to_string())
        })?;
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| Error::InvalidInput("remote api key is required".to_string()))?;

        Ok(Self {
            base_url,
            realtime_url,
            api_key,
            client: reqwest::Client::builder()
                .build()
                .map_err(|error| Error::Remote(error.to_string()))?,
        })
    }

    fn rest_url(&self, collection: Collection) -> String {
        format!("{}/rest/{}", self.base_url, collection.table())
    }

    async fn classify_failure(
        collection: Collection,
        response: reqwest::Response,
    ) -> Error {
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Error::SchemaNotProvisioned(collection);
        }

        let body = response.text().await.unwrap_or_default();
        Error::Remote(parse_api_error(status, &body))
    }
}

impl RemoteService for HttpRemote {
    async fn pull_since(&self, collection: Collection, cursor: i64) -> Result<Vec<WireRecord>> {
        let response = self
            .client
            .get(self.rest_url(collection))
            .query(&[
                ("updated_at", format!("gt.{cursor}")),
                ("order", "updated_at.asc".to_string()),
            ])
            .header("apikey", &self.api_key)
            .send()
            .await
            .map_err(|error| Error::Remote(error.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::classify_failure(collection, response).await);
        }

        response
            .json::<Vec<WireRecord>>()
            .await
            .map_err(|error| Error::Remote(error.to_string()))
    }

    async fn push_upserts(&self, collection: Collection, records: Vec<WireRecord>) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }

        let response = self
            .client
            .post(self.rest_url(collection))
            .header("apikey", &self.api_key)
            .header("Prefer", "resolution=merge-duplicates")
            .json(&records)
            .send()
            .await
            .map_err(|error| Error::Remote(error.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::classify_failure(collection, response).await);
        }
        Ok(())
    }

    async fn push_deletes(&self, collection: Collection, ids: Vec<String>) -> Result<()> {
        if ids.is_empty() {
            return Ok(());
        }

        let response = self
            .client
            .delete(self.rest_url(collection))
            .query(&[("id", format!("in.({})", ids.join(",")))])
            .header("apikey", &self.api_key)
            .send()
            .await
            .map_err(|error| Error::Remote(error.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::classify_failure(collection, response).await);
        }
        Ok(())
    }

    async fn subscribe(&self, collection: Collection) -> Result<LiveFeed> {
        let url = format!(
            "{}/realtime/{}?apikey={}",
            self.realtime_url,
            collection.table(),
            self.api_key
        );
        let (stream, _response) = connect_async(url.as_str())
            .await
            .map_err(|error| Error::Remote(error.to_string()))?;

        let (sender, events) = mpsc::channel(LIVE_EVENT_BUFFER);
        tokio::spawn(forward_events(stream, sender));

        Ok(LiveFeed { collection, events })
    }
}

/// Read the socket until it closes or the consumer goes away
async fn forward_events(
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
    sender: mpsc::Sender<RemoteEvent>,
) {
    let (_write, mut read) = stream.split();

    while let Some(message) = read.next().await {
        match message {
            Ok(Message::Text(text)) => match serde_json::from_str::<WireEvent>(&text) {
                Ok(event) => {
                    if sender.send(event.into()).await.is_err() {
                        break;
                    }
                }
                Err(error) => tracing::warn!("Dropping malformed live event: {error}"),
            },
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(error) => {
                tracing::warn!("Live stream error: {error}");
                break;
            }
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum WireEvent {
    Upsert { record: WireRecord },
    Delete { id: String, updated_at: i64 },
}

impl From<WireEvent> for RemoteEvent {
    fn from(event: WireEvent) -> Self {
        match event {
            WireEvent::Upsert { record } => Self::Upserted(record),
            WireEvent::Delete { id, updated_at } => Self::Deleted { id, updated_at },
        }
    }
}

#[derive(Debug, Deserialize)]
struct RemoteErrorBody {
    error: Option<String>,
    message: Option<String>,
}

fn parse_api_error(status: StatusCode, body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<RemoteErrorBody>(body) {
        if let Some(message) = payload.message.or(payload.error) {
            return format!("{} ({})", message.trim(), status.as_u16());
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        format!("{} ({})", compact_text(trimmed), status.as_u16())
    }
}
