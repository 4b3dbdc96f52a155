use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::body::Bytes;
use uuid::Uuid;

use crate::error::ApiError;

pub const UPLOAD_MAX_BYTES: usize = 5 * 1024 * 1024;

const ALLOWED_EXTENSIONS: [&str; 5] = ["jpeg", "jpg", "png", "gif", "webp"];
const ALLOWED_CONTENT_TYPES: [&str; 5] = [
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/webp",
];

/// Writes uploaded notification images under the public upload directory.
/// Type and size checks run before any bytes touch disk.
#[derive(Clone)]
pub struct UploadStore {
    dir: Arc<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct StoredUpload {
    pub file_name: String,
}

impl UploadStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir: Arc::new(dir) }
    }

    pub async fn store_image(
        &self,
        original_name: Option<&str>,
        content_type: Option<&str>,
        data: Bytes,
    ) -> Result<StoredUpload, ApiError> {
        if data.len() > UPLOAD_MAX_BYTES {
            return Err(ApiError::Upload(
                "uploaded file is too large; the limit is 5MB".to_string(),
            ));
        }

        let extension = original_name
            .and_then(file_extension)
            .filter(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()));
        let type_allowed = content_type
            .map(|value| ALLOWED_CONTENT_TYPES.contains(&value))
            .unwrap_or(false);
        let Some(extension) = extension else {
            return Err(ApiError::Upload(
                "only image uploads are allowed (JPEG, PNG, GIF, WebP)".to_string(),
            ));
        };
        if !type_allowed {
            return Err(ApiError::Upload(
                "only image uploads are allowed (JPEG, PNG, GIF, WebP)".to_string(),
            ));
        }

        let file_name = format!(
            "{}-{}.{extension}",
            chrono::Utc::now().timestamp_millis(),
            Uuid::new_v4()
        );
        tokio::fs::create_dir_all(self.dir.as_path())
            .await
            .map_err(|err| ApiError::Internal(err.to_string()))?;
        tokio::fs::write(self.dir.join(&file_name), data)
            .await
            .map_err(|err| ApiError::Internal(err.to_string()))?;

        Ok(StoredUpload { file_name })
    }
}

/// Absolute URL the stored file is reachable at, built from the request's
/// own scheme and host.
pub fn public_url(scheme: &str, host: &str, file_name: &str) -> String {
    format!("{scheme}://{host}/uploads/{file_name}")
}

fn file_extension(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
}
