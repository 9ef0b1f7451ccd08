use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tty2rpi_bridge::SourceError;

pub const STATE_PATH: &str = "/api/currentState";

/// Body of `GET /api/currentState`.
///
/// Firmware revisions disagree on types (`rssi` as a number or a string,
/// `currentSize` as "8MB" or 8), so the telemetry fields are parsed leniently
/// and dropped when unusable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CurrentState {
    #[serde(rename = "currentMode", default)]
    pub current_mode: Option<String>,
    #[serde(rename = "gameName", default)]
    pub game_name: Option<String>,
    #[serde(rename = "gameID", default)]
    game_id_camel: Option<String>,
    #[serde(rename = "game_id", default)]
    game_id_snake: Option<String>,
    #[serde(rename = "currentChannel", default, deserialize_with = "lenient_u32")]
    pub current_channel: Option<u32>,
    #[serde(default, deserialize_with = "lenient_i32")]
    pub rssi: Option<i32>,
    #[serde(rename = "currentSize", default, deserialize_with = "text_or_number")]
    pub current_size: Option<String>,
}

impl CurrentState {
    /// `game_id` when present and non-empty, otherwise `gameID`.
    pub fn game_id(&self) -> Option<&str> {
        non_empty(self.game_id_snake.as_deref()).or_else(|| non_empty(self.game_id_camel.as_deref()))
    }

    pub fn game_name(&self) -> Option<&str> {
        non_empty(self.game_name.as_deref())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_i64(deserializer)?.and_then(|v| u32::try_from(v).ok()))
}

fn lenient_i32<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_i64(deserializer)?.and_then(|v| i32::try_from(v).ok()))
}

fn text_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Thin HTTP client for the MemCard Pro status API.
#[derive(Clone)]
pub struct MemCardProClient {
    http: Client,
}

impl MemCardProClient {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { http })
    }

    /// `host` may carry a port (`192.168.1.60` or `127.0.0.1:8080`).
    pub fn state_url(host: &str) -> String {
        format!("http://{}{}", host.trim_end_matches('/'), STATE_PATH)
    }

    pub async fn current_state(&self, host: &str) -> Result<CurrentState, SourceError> {
        let url = Self::state_url(host);
        let res = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|err| SourceError::Unavailable(format!("{url}: {err}")))?;

        let status = res.status();
        if !status.is_success() {
            return Err(SourceError::Unavailable(format!("{url} answered {status}")));
        }

        let body = res
            .bytes()
            .await
            .map_err(|err| SourceError::Unavailable(format!("{url}: {err}")))?;
        serde_json::from_slice(&body)
            .map_err(|err| SourceError::Malformed(format!("{url}: {err}")))
    }
}
