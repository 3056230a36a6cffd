//! Bridge implementation for the v2 resource-graph HTTP API.
//!
//! Entities live under `/clip/v2/resource/...` and are addressed by opaque
//! resource ids. The target grouped-light id is bound once at startup; a
//! missing id surfaces as `NotConfigured` on first use. Brightness travels as
//! a percentage on the wire and is converted to and from the native 0..=254
//! scale at this boundary. Scene recall and scene dynamics are both updates to
//! the scene resource itself.

use crate::bridge::{native_to_percent, percent_to_native, Bridge, GroupState, StateUpdate};
use crate::config::Config;
use crate::error::{HuedialError, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

/// Bridge client speaking the v2 resource-graph API.
pub struct V2Bridge {
    http: reqwest::Client,
    base: String,
    group_rid: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResourceEnvelope<T> {
    data: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct GroupedLightGet {
    on: OnState,
    #[serde(default)]
    dimming: Option<Dimming>,
}

#[derive(Debug, Serialize, Deserialize)]
struct OnState {
    on: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct Dimming {
    brightness: f64,
}

#[derive(Debug, Serialize)]
struct GroupedLightPut {
    on: OnState,
    #[serde(skip_serializing_if = "Option::is_none")]
    dimming: Option<Dimming>,
}

#[derive(Debug, Default, Serialize)]
struct ScenePut {
    #[serde(skip_serializing_if = "Option::is_none")]
    recall: Option<SceneRecall>,
    #[serde(skip_serializing_if = "Option::is_none")]
    auto_dynamic: Option<bool>,
}

#[derive(Debug, Serialize)]
struct SceneRecall {
    action: &'static str,
}

impl V2Bridge {
    /// Build a client for the configured host, application key and
    /// grouped-light resource id.
    pub fn new(config: &Config) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(&config.username)
            .map_err(|_| HuedialError::config("application key contains invalid characters"))?;
        headers.insert("hue-application-key", key);

        // The bridge serves the v2 API over TLS with a self-signed
        // certificate tied to its bridge id.
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .default_headers(headers)
            .danger_accept_invalid_certs(true)
            .build()?;

        let group_rid = if config.group.is_empty() {
            None
        } else {
            Some(config.group.clone())
        };

        Ok(Self {
            http,
            base: format!("https://{}/clip/v2", config.host),
            group_rid,
        })
    }

    fn group_rid(&self) -> Result<&str> {
        self.group_rid
            .as_deref()
            .ok_or_else(|| HuedialError::not_configured("no grouped-light resource id bound"))
    }

    fn check_status(status: StatusCode, id: &str) -> Result<()> {
        if status == StatusCode::NOT_FOUND {
            return Err(HuedialError::not_found(id));
        }
        if !status.is_success() {
            return Err(HuedialError::unreachable(format!(
                "bridge returned {status} for {id}"
            )));
        }
        Ok(())
    }

    async fn put_scene(&self, scene_id: &str, body: &ScenePut) -> Result<()> {
        let url = format!("{}/resource/scene/{}", self.base, scene_id);
        let response = self.http.put(&url).json(body).send().await?;
        Self::check_status(response.status(), scene_id)
    }
}

/// Translate a grouped-light update to its wire form.
///
/// A requested brightness of exactly 0 doubles as the "unspecified" sentinel
/// on this path and is not forwarded; the write then changes power state only.
fn grouped_light_body(update: &StateUpdate) -> GroupedLightPut {
    let dimming = match update.brightness {
        Some(native) if native > 0 => Some(Dimming {
            brightness: native_to_percent(native),
        }),
        _ => None,
    };
    GroupedLightPut {
        on: OnState { on: update.on },
        dimming,
    }
}

#[async_trait]
impl Bridge for V2Bridge {
    async fn get_group_state(&self) -> Result<GroupState> {
        let rid = self.group_rid()?;
        let url = format!("{}/resource/grouped_light/{}", self.base, rid);
        let response = self.http.get(&url).send().await?;
        Self::check_status(response.status(), rid)?;

        let envelope: ResourceEnvelope<GroupedLightGet> = response.json().await?;
        let light = envelope.data.into_iter().next().ok_or_else(|| {
            HuedialError::unreachable("grouped-light response carried no data")
        })?;

        Ok(GroupState {
            on: light.on.on,
            brightness: light
                .dimming
                .map(|d| percent_to_native(d.brightness))
                .unwrap_or(0),
        })
    }

    async fn set_group_state(&self, update: &StateUpdate) -> Result<()> {
        let rid = self.group_rid()?;
        let url = format!("{}/resource/grouped_light/{}", self.base, rid);
        let body = grouped_light_body(update);
        let response = self.http.put(&url).json(&body).send().await?;
        Self::check_status(response.status(), rid)
    }

    async fn recall_scene(&self, scene_id: &str) -> Result<()> {
        let body = ScenePut {
            recall: Some(SceneRecall { action: "active" }),
            ..ScenePut::default()
        };
        self.put_scene(scene_id, &body).await
    }

    async fn set_dynamics(&self, scene_id: &str, enabled: bool) -> Result<()> {
        let body = ScenePut {
            auto_dynamic: Some(enabled),
            ..ScenePut::default()
        };
        self.put_scene(scene_id, &body).await
    }

    async fn verify(&self) -> Result<()> {
        let url = format!("{}/resource/bridge", self.base);
        let response = self.http.get(&url).send().await?;
        Self::check_status(response.status(), "bridge")
    }
}
