use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};

/// Delivery seam for the external push provider. The production
/// implementation talks to Pusher Beams; tests substitute a stub.
#[async_trait]
pub trait PushGateway: Send + Sync {
    /// Publishes `payload` to a single interest and returns the provider's
    /// delivery identifier.
    async fn publish_to_interest(
        &self,
        interest: &str,
        payload: Value,
    ) -> Result<String, anyhow::Error>;
}

/// Per-channel publish payload. Images mark the APNs notification as
/// mutable content so the device can fetch and attach them; the image and
/// icon keys are omitted entirely on image-less sends rather than sent as
/// null.
pub fn build_publish_payload(title: &str, body: &str, image: Option<&str>) -> Value {
    let mut fcm = json!({ "title": title, "body": body });
    let mut web = json!({ "title": title, "body": body });
    if let Some(image) = image {
        fcm["image"] = json!(image);
        web["icon"] = json!(image);
        web["image"] = json!(image);
    }
    json!({
        "apns": {
            "aps": {
                "alert": { "title": title, "body": body },
                "mutable-content": if image.is_some() { 1 } else { 0 },
            },
        },
        "fcm": { "notification": fcm },
        "web": { "notification": web },
    })
}

/// Pusher Beams REST client for the publish-to-interests endpoint.
pub struct BeamsClient {
    instance_id: String,
    secret_key: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct PublishResponse {
    #[serde(rename = "publishId")]
    publish_id: String,
}

impl BeamsClient {
    pub fn new(instance_id: String, secret_key: String) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            instance_id,
            secret_key,
            client,
        })
    }

    fn publish_url(&self) -> String {
        format!(
            "https://{id}.pushnotifications.pusher.com/publish_api/v1/instances/{id}/publishes/interests",
            id = self.instance_id
        )
    }
}

#[async_trait]
impl PushGateway for BeamsClient {
    async fn publish_to_interest(
        &self,
        interest: &str,
        payload: Value,
    ) -> Result<String, anyhow::Error> {
        let mut body = payload;
        body["interests"] = json!([interest]);

        let response = self
            .client
            .post(self.publish_url())
            .bearer_auth(&self.secret_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            anyhow::bail!("beams publish returned {status}: {detail}");
        }

        let publish: PublishResponse = response.json().await?;
        Ok(publish.publish_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_less_payload_omits_image_keys() {
        let payload = build_publish_payload("Hi", "There", None);

        let fcm = payload["fcm"]["notification"].as_object().expect("fcm");
        assert!(!fcm.contains_key("image"));
        let web = payload["web"]["notification"].as_object().expect("web");
        assert!(!web.contains_key("image"));
        assert!(!web.contains_key("icon"));
        assert_eq!(payload["apns"]["aps"]["mutable-content"], 0);
    }

    #[test]
    fn payload_with_image_references_it_on_every_channel() {
        let payload = build_publish_payload("Hi", "There", Some("https://example.com/a.png"));

        assert_eq!(
            payload["fcm"]["notification"]["image"],
            "https://example.com/a.png"
        );
        assert_eq!(
            payload["web"]["notification"]["icon"],
            "https://example.com/a.png"
        );
        assert_eq!(
            payload["web"]["notification"]["image"],
            "https://example.com/a.png"
        );
        assert_eq!(payload["apns"]["aps"]["mutable-content"], 1);
        assert_eq!(payload["apns"]["aps"]["alert"]["title"], "Hi");
    }
}
