//! Session
//!
//! Single source of truth for who is logged in. Controllers hold an
//! `Arc<Session>` and subscribe to user changes to drop cached state.

use std::sync::Arc;

use skillswap_common::forms::{LoginForm, RegisterForm};
use skillswap_common::{User, UserStats};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::api::{ApiClient, PhotoUpload};
use crate::error::{ClientError, ClientResult};
use crate::token_store::TokenStore;

/// Authenticated identity plus the API client it authenticates.
pub struct Session {
    api: ApiClient,
    store: Arc<dyn TokenStore>,
    user: watch::Sender<Option<User>>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("api", &self.api)
            .field("user", &*self.user.borrow())
            .finish_non_exhaustive()
    }
}

impl Session {
    pub fn new(api: ApiClient, store: Arc<dyn TokenStore>) -> Self {
        let (user, _) = watch::channel(None);
        Self { api, store, user }
    }

    pub const fn api(&self) -> &ApiClient {
        &self.api
    }

    // ========================================================================
    // Identity
    // ========================================================================

    pub fn current_user(&self) -> Option<User> {
        self.user.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.borrow().is_some()
    }

    /// Current user, or [`ClientError::NotAuthenticated`].
    pub fn require_user(&self) -> ClientResult<User> {
        self.current_user().ok_or(ClientError::NotAuthenticated)
    }

    /// Current user if they are an administrator.
    pub fn require_admin(&self) -> ClientResult<User> {
        let user = self.require_user()?;
        if user.is_admin {
            Ok(user)
        } else {
            Err(ClientError::NotAdmin)
        }
    }

    /// Receiver that observes every login, logout, and profile change.
    pub fn subscribe(&self) -> watch::Receiver<Option<User>> {
        self.user.subscribe()
    }

    fn publish(&self, user: Option<User>) {
        self.user.send_replace(user);
    }

    // ========================================================================
    // Login / logout
    // ========================================================================

    /// Log in with email and password, then load the profile.
    pub async fn login(&self, form: &LoginForm) -> ClientResult<User> {
        form.check().map_err(ClientError::Validation)?;
        let request = form.to_request();
        info!("Attempting login for user: {}", request.email);

        let tokens = self
            .api
            .login(&request)
            .await
            .map_err(ClientError::into_login_error)?;

        debug!("Login successful, fetching user info");
        self.api.set_token(&tokens.access_token).await;

        let user = match self.api.me().await {
            Ok(user) => user,
            Err(e) => {
                error!("Failed to fetch user info: {}", e);
                self.api.clear_token().await;
                return Err(e);
            }
        };

        if let Err(e) = self.store.save(&tokens.access_token) {
            error!("Failed to persist session token: {}", e);
            // Still logged in for this process.
        }

        info!(user_id = user.id, "Logged in as {}", user.name);
        self.publish(Some(user.clone()));
        Ok(user)
    }

    /// Register a new account, uploading the photo first, then log in.
    pub async fn register(
        &self,
        form: &RegisterForm,
        photo: Option<&PhotoUpload>,
    ) -> ClientResult<User> {
        let mut form = form.clone();
        if let Some(photo) = photo {
            form.photo = Some(photo.meta.clone());
        }
        form.check().map_err(ClientError::Validation)?;

        let photo_path = match photo {
            Some(photo) => Some(self.api.upload_photo(photo).await?.photo_path),
            None => None,
        };

        let request = form.to_request(photo_path);
        info!("Registering account for {}", request.email);
        let created = self.api.register(&request).await?;
        debug!(user_id = created.id, "Account created, logging in");

        self.login(&LoginForm::new(request.email, request.password))
            .await
    }

    /// Drop the token everywhere and publish "no user".
    pub async fn logout(&self) {
        self.api.clear_token().await;
        if let Err(e) = self.store.clear() {
            warn!("Failed to clear stored session token: {}", e);
        }
        self.publish(None);
        info!("Logged out");
    }

    /// Resume a persisted session. A rejected token is discarded.
    pub async fn restore(&self) -> ClientResult<Option<User>> {
        let Some(token) = self.store.load()? else {
            debug!("No stored session");
            return Ok(None);
        };

        self.api.set_token(token).await;
        match self.api.me().await {
            Ok(user) => {
                info!(user_id = user.id, "Session restored for {}", user.name);
                self.publish(Some(user.clone()));
                Ok(Some(user))
            }
            Err(e) if e.is_unauthorized() => {
                warn!("Stored session token rejected, clearing it");
                self.logout().await;
                Ok(None)
            }
            Err(e) => {
                self.api.clear_token().await;
                Err(e)
            }
        }
    }

    // ========================================================================
    // Profile
    // ========================================================================

    /// Re-read `/me` and publish the result.
    pub async fn refresh_user(&self) -> ClientResult<User> {
        self.require_user()?;
        let user = self.api.me().await?;
        self.publish(Some(user.clone()));
        Ok(user)
    }

    pub async fn stats(&self) -> ClientResult<UserStats> {
        self.require_user()?;
        self.api.my_stats().await
    }

    pub async fn update_visibility(&self, is_public: bool) -> ClientResult<User> {
        self.require_user()?;
        let user = self.api.update_visibility(is_public).await?;
        info!(user_id = user.id, is_public, "Profile visibility updated");
        self.publish(Some(user.clone()));
        Ok(user)
    }

    pub async fn update_availability(&self, availability: &str) -> ClientResult<User> {
        self.require_user()?;
        let user = self.api.update_availability(availability.trim()).await?;
        info!(user_id = user.id, "Availability updated");
        self.publish(Some(user.clone()));
        Ok(user)
    }

    /// Upload a profile photo and return its stored path.
    pub async fn upload_photo(&self, photo: &PhotoUpload) -> ClientResult<String> {
        skillswap_common::validation::validate_photo(&photo.meta).map_err(|e| {
            ClientError::invalid_field("photo", skillswap_common::validation::message_of(&e))
        })?;
        Ok(self.api.upload_photo(photo).await?.photo_path)
    }
}
