//! Account, profile, and directory endpoints.

use std::path::Path;

use reqwest::multipart::{Form, Part};
use reqwest::Method;
use serde_json::json;
use skillswap_common::validation::PhotoMeta;
use skillswap_common::{
    LoginRequest, PhotoUploadResponse, PublicUser, RegisterRequest, TokenResponse, User,
    UserStats,
};
use tracing::error;

use super::ApiClient;
use crate::error::{ClientError, ClientResult};

/// A profile photo read into memory, ready for `POST /upload-photo`.
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    pub meta: PhotoMeta,
    pub bytes: Vec<u8>,
}

impl PhotoUpload {
    /// Wrap bytes, guessing the MIME type from the file name.
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let mime = mime_guess::from_path(&file_name)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        Self {
            meta: PhotoMeta {
                file_name,
                size: bytes.len() as u64,
                mime,
            },
            bytes,
        }
    }

    /// Read a photo from disk.
    pub async fn from_path(path: &Path) -> ClientResult<Self> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::new(file_name, bytes))
    }
}

impl ApiClient {
    /// `POST /login`.
    pub async fn login(&self, request: &LoginRequest) -> ClientResult<TokenResponse> {
        self.post("/login", request).await
    }

    /// `POST /register`. Returns the created account; no token is issued.
    pub async fn register(&self, request: &RegisterRequest) -> ClientResult<User> {
        self.post("/register", request).await
    }

    /// `GET /me`.
    pub async fn me(&self) -> ClientResult<User> {
        self.get("/me").await
    }

    /// `GET /me/stats`.
    pub async fn my_stats(&self) -> ClientResult<UserStats> {
        self.get("/me/stats").await
    }

    /// `PUT /me/visibility`.
    pub async fn update_visibility(&self, is_public: bool) -> ClientResult<User> {
        self.put("/me/visibility", &json!({ "is_public": is_public }))
            .await
    }

    /// `PUT /me/availability`.
    pub async fn update_availability(&self, availability: &str) -> ClientResult<User> {
        self.put("/me/availability", &json!({ "availability": availability }))
            .await
    }

    /// `POST /upload-photo` as multipart field `file`.
    pub async fn upload_photo(&self, photo: &PhotoUpload) -> ClientResult<PhotoUploadResponse> {
        let path = "/upload-photo";
        let part = Part::bytes(photo.bytes.clone())
            .file_name(photo.meta.file_name.clone())
            .mime_str(&photo.meta.mime)
            .map_err(|e| {
                error!("Invalid photo MIME type {}: {}", photo.meta.mime, e);
                ClientError::invalid_field("photo", "Please select an image file")
            })?;
        let request = self
            .builder(Method::POST, path)
            .await
            .multipart(Form::new().part("file", part));
        self.send(request, path).await
    }

    /// `GET /public-users`.
    pub async fn public_users(&self) -> ClientResult<Vec<PublicUser>> {
        self.get("/public-users").await
    }
}
