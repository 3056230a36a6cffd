//! Bridge implementation for the flat v1 HTTP API.
//!
//! Groups are addressed by small integer ids under `/api/{username}`, state
//! reads and writes are one round trip each, brightness is already on the
//! native 0..=254 scale, and scene recall goes through the all-lights group
//! action. Scene dynamics does not exist in this generation and is reported
//! as `Unsupported`.

use crate::bridge::{Bridge, GroupState, StateUpdate};
use crate::config::Config;
use crate::error::{HuedialError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Bridge client speaking the v1 flat API.
pub struct V1Bridge {
    http: reqwest::Client,
    base: String,
    group_id: u32,
}

#[derive(Debug, Deserialize)]
struct GroupAttributes {
    action: GroupAction,
}

#[derive(Debug, Deserialize)]
struct GroupAction {
    on: bool,
    #[serde(default)]
    bri: u8,
}

/// Body for `PUT /groups/{id}/action`. Absent fields leave the corresponding
/// group attribute untouched.
#[derive(Debug, Default, Serialize)]
struct ActionPut {
    #[serde(skip_serializing_if = "Option::is_none")]
    on: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bri: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    scene: Option<String>,
}

impl V1Bridge {
    /// Build a client for the configured host, username and integer group id.
    pub fn new(config: &Config) -> Result<Self> {
        let group_id: u32 = config.group.parse().map_err(|_| {
            HuedialError::config(format!(
                "v1 group id must be an integer, got '{}'",
                config.group
            ))
        })?;

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            http,
            base: format!("http://{}/api/{}", config.host, config.username),
            group_id,
        })
    }

    async fn put_action(&self, group_id: u32, body: &ActionPut) -> Result<Value> {
        let url = format!("{}/groups/{}/action", self.base, group_id);
        let response = self.http.put(&url).json(body).send().await?;
        Ok(response.json::<Value>().await?)
    }
}

/// Scan a v1 response body for an error entry and return its description.
///
/// The v1 API reports failures as a 200 response whose body is an array of
/// `{"success": ...}` / `{"error": ...}` objects.
fn response_error(body: &Value) -> Option<String> {
    let entries = body.as_array()?;
    entries.iter().find_map(|entry| {
        let description = entry.get("error")?.get("description")?;
        Some(
            description
                .as_str()
                .unwrap_or("unknown bridge error")
                .to_string(),
        )
    })
}

#[async_trait]
impl Bridge for V1Bridge {
    async fn get_group_state(&self) -> Result<GroupState> {
        let url = format!("{}/groups/{}", self.base, self.group_id);
        let body: Value = self.http.get(&url).send().await?.json().await?;

        if let Some(description) = response_error(&body) {
            return Err(HuedialError::unreachable(format!(
                "reading group {}: {description}",
                self.group_id
            )));
        }

        let attributes: GroupAttributes = serde_json::from_value(body).map_err(|err| {
            HuedialError::unreachable(format!("malformed group response: {err}"))
        })?;

        Ok(GroupState {
            on: attributes.action.on,
            brightness: attributes.action.bri,
        })
    }

    async fn set_group_state(&self, update: &StateUpdate) -> Result<()> {
        let body = ActionPut {
            on: Some(update.on),
            bri: update.brightness,
            scene: None,
        };
        let response = self.put_action(self.group_id, &body).await?;

        if let Some(description) = response_error(&response) {
            return Err(HuedialError::unreachable(format!(
                "writing group {}: {description}",
                self.group_id
            )));
        }
        Ok(())
    }

    async fn recall_scene(&self, scene_id: &str) -> Result<()> {
        // Scene recall is a group action; group 0 targets all lights the
        // scene covers, matching how the bridge applies v1 scenes.
        let body = ActionPut {
            scene: Some(scene_id.to_string()),
            ..ActionPut::default()
        };
        let response = self.put_action(0, &body).await?;

        if response_error(&response).is_some() {
            return Err(HuedialError::not_found(scene_id));
        }
        Ok(())
    }

    async fn set_dynamics(&self, _scene_id: &str, _enabled: bool) -> Result<()> {
        Err(HuedialError::unsupported("scene dynamics"))
    }

    async fn verify(&self) -> Result<()> {
        let url = format!("{}/lights", self.base);
        let body: Value = self.http.get(&url).send().await?.json().await?;

        if let Some(description) = response_error(&body) {
            return Err(HuedialError::unreachable(format!(
                "bridge rejected credentials: {description}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn action_body_omits_brightness_when_unset() {
        let body = ActionPut {
            on: Some(true),
            bri: None,
            scene: None,
        };
        assert_eq!(serde_json::to_value(&body).unwrap(), json!({"on": true}));
    }

    #[test]
    fn action_body_includes_brightness_when_set() {
        let body = ActionPut {
            on: Some(true),
            bri: Some(127),
            scene: None,
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"on": true, "bri": 127})
        );
    }

    #[test]
    fn scene_recall_body_is_a_bare_scene_action() {
        let body = ActionPut {
            scene: Some("abc123".to_string()),
            ..ActionPut::default()
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"scene": "abc123"})
        );
    }

    #[test]
    fn group_response_parses_power_and_brightness() {
        let body = json!({
            "name": "Living room",
            "action": {"on": true, "bri": 200, "hue": 8402},
            "state": {"all_on": true, "any_on": true}
        });
        let attributes: GroupAttributes = serde_json::from_value(body).unwrap();
        assert!(attributes.action.on);
        assert_eq!(attributes.action.bri, 200);
    }

    #[test]
    fn response_error_finds_description_in_mixed_results() {
        let body = json!([
            {"success": {"/groups/1/action/on": true}},
            {"error": {"type": 7, "address": "/groups/1", "description": "invalid value"}}
        ]);
        assert_eq!(response_error(&body), Some("invalid value".to_string()));

        let ok = json!([{"success": {"/groups/1/action/on": true}}]);
        assert_eq!(response_error(&ok), None);
    }
}
