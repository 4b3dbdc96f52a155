use std::sync::Arc;

use crate::error::ApiError;
use crate::history::store::{HistoryRecord, HistoryStore};
use crate::notify::beams::{PushGateway, build_publish_payload};
use crate::notify::validate::{SendRequest, validate};

/// Raw form fields as they arrive from the HTTP layer, before trimming.
#[derive(Debug, Default, Clone)]
pub struct RawSend {
    pub title: String,
    pub body: String,
    pub interest: String,
    pub image: String,
}

#[derive(Debug, Clone)]
pub struct PublishReceipt {
    pub publish_id: String,
}

/// Orchestrates a send: trim and validate the input, publish through the
/// gateway, record the result in history. The gateway is an injected
/// optional capability; its absence means the operator has not configured
/// provider credentials.
#[derive(Clone)]
pub struct Dispatcher {
    gateway: Option<Arc<dyn PushGateway>>,
    history: HistoryStore,
}

impl Dispatcher {
    pub fn new(gateway: Option<Arc<dyn PushGateway>>, history: HistoryStore) -> Self {
        Self { gateway, history }
    }

    pub fn is_configured(&self) -> bool {
        self.gateway.is_some()
    }

    /// Runs the full send pipeline. `uploaded_image` is the public URL of
    /// an image uploaded alongside the form and takes precedence over the
    /// `image` field.
    pub async fn send(
        &self,
        raw: RawSend,
        uploaded_image: Option<String>,
    ) -> Result<PublishReceipt, ApiError> {
        let image = uploaded_image.or_else(|| {
            let trimmed = raw.image.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        });
        let request = SendRequest {
            title: raw.title.trim().to_string(),
            body: raw.body.trim().to_string(),
            interest: raw.interest.trim().to_string(),
            image,
        };

        let errors = validate(&request);
        if !errors.is_empty() {
            return Err(ApiError::InvalidInput(errors.join(", ")));
        }

        let gateway = self.gateway.as_ref().ok_or(ApiError::NotConfigured)?;

        let payload =
            build_publish_payload(&request.title, &request.body, request.image.as_deref());
        let publish_id = gateway
            .publish_to_interest(&request.interest, payload)
            .await
            .map_err(|err| ApiError::Provider(err.to_string()))?;

        tracing::info!(
            publish_id = %publish_id,
            interest = %request.interest,
            "notification published"
        );

        let record = HistoryRecord {
            id: publish_id.clone(),
            title: request.title,
            body: request.body,
            interest: request.interest,
            image: request.image,
            timestamp: chrono::Utc::now(),
        };
        // The publish already went out; a history write failure must not
        // turn a delivered notification into a reported error.
        if let Err(err) = self.history.append(record).await {
            tracing::warn!(
                publish_id = %publish_id,
                error = %err,
                "history append failed after successful publish"
            );
        }

        Ok(PublishReceipt { publish_id })
    }
}
