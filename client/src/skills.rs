//! Skill Registry
//!
//! The current user's offered and wanted skills. Edits and deletes are applied
//! to a local shadow first, then confirmed by the server: success replaces the
//! shadow entry with the server's record, failure restores the previous entry.

use std::sync::Arc;

use skillswap_common::forms::SkillForm;
use skillswap_common::validation::{message_of, validate_skill_name};
use skillswap_common::{Skill, SkillId, SkillUpdate, UserId};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::error::{ClientError, ClientResult};
use crate::session::Session;

#[derive(Debug, Default)]
struct Shadow {
    owner: Option<UserId>,
    skills: Vec<Skill>,
}

impl Shadow {
    fn position(&self, id: SkillId) -> Option<usize> {
        self.skills.iter().position(|s| s.id == id)
    }
}

/// Local view of the user's skill listings.
#[derive(Debug)]
pub struct SkillRegistry {
    session: Arc<Session>,
    shadow: RwLock<Shadow>,
}

impl SkillRegistry {
    pub fn new(session: Arc<Session>) -> Self {
        Self {
            session,
            shadow: RwLock::new(Shadow::default()),
        }
    }

    /// Drop the cache if the logged-in user changed since it was filled.
    async fn sync_owner(&self) -> ClientResult<UserId> {
        let user = self.session.require_user()?;
        let mut shadow = self.shadow.write().await;
        if shadow.owner != Some(user.id) {
            debug!(user_id = user.id, "User changed, dropping cached skills");
            shadow.owner = Some(user.id);
            shadow.skills.clear();
        }
        Ok(user.id)
    }

    /// Forget every cached skill.
    pub async fn clear(&self) {
        *self.shadow.write().await = Shadow::default();
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Reload from `GET /skills`.
    pub async fn refresh(&self) -> ClientResult<Vec<Skill>> {
        let owner = self.sync_owner().await?;
        let skills = self.session.api().my_skills().await?;

        let mut shadow = self.shadow.write().await;
        if shadow.owner == Some(owner) {
            shadow.skills.clone_from(&skills);
        }
        Ok(skills)
    }

    pub async fn skills(&self) -> Vec<Skill> {
        self.shadow.read().await.skills.clone()
    }

    pub async fn offered(&self) -> Vec<Skill> {
        self.shadow
            .read()
            .await
            .skills
            .iter()
            .filter(|s| s.is_offered())
            .cloned()
            .collect()
    }

    pub async fn wanted(&self) -> Vec<Skill> {
        self.shadow
            .read()
            .await
            .skills
            .iter()
            .filter(|s| !s.is_offered())
            .cloned()
            .collect()
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Create a listing. Not optimistic: the id comes from the server.
    pub async fn create(&self, form: &SkillForm) -> ClientResult<Skill> {
        form.check().map_err(ClientError::Validation)?;
        let owner = self.sync_owner().await?;

        let skill = self.session.api().create_skill(&form.to_request()).await?;
        info!(skill_id = skill.id, "Skill added: {}", skill.name);

        let mut shadow = self.shadow.write().await;
        if shadow.owner == Some(owner) && shadow.position(skill.id).is_none() {
            shadow.skills.push(skill.clone());
        }
        Ok(skill)
    }

    /// Edit a listing optimistically.
    pub async fn edit(&self, id: SkillId, update: SkillUpdate) -> ClientResult<Skill> {
        if let Some(name) = &update.name {
            validate_skill_name(name)
                .map_err(|e| ClientError::invalid_field("name", message_of(&e)))?;
        }
        let mut update = update;
        update.name = update.name.map(|n| n.trim().to_string());
        if update.is_empty() {
            return Err(ClientError::NotEligible("Nothing to update".into()));
        }
        self.sync_owner().await?;

        let previous = {
            let mut shadow = self.shadow.write().await;
            let idx = shadow
                .position(id)
                .ok_or_else(|| ClientError::NotEligible(format!("Skill {id} not found")))?;
            let previous = shadow.skills[idx].clone();
            shadow.skills[idx].apply(&update);
            previous
        };

        match self.session.api().update_skill(id, &update).await {
            Ok(confirmed) => {
                let mut shadow = self.shadow.write().await;
                if let Some(idx) = shadow.position(id) {
                    shadow.skills[idx] = confirmed.clone();
                }
                info!(skill_id = id, "Skill updated");
                Ok(confirmed)
            }
            Err(e) => {
                let mut shadow = self.shadow.write().await;
                if let Some(idx) = shadow.position(id) {
                    shadow.skills[idx] = previous;
                }
                warn!(skill_id = id, "Skill update failed, rolled back: {}", e);
                Err(e)
            }
        }
    }

    /// Delete a listing optimistically.
    pub async fn delete(&self, id: SkillId) -> ClientResult<()> {
        let owner = self.sync_owner().await?;

        let (idx, removed) = {
            let mut shadow = self.shadow.write().await;
            let idx = shadow
                .position(id)
                .ok_or_else(|| ClientError::NotEligible(format!("Skill {id} not found")))?;
            (idx, shadow.skills.remove(idx))
        };

        match self.session.api().delete_skill(id).await {
            Ok(_) => {
                info!(skill_id = id, "Skill deleted");
                Ok(())
            }
            Err(e) => {
                let mut shadow = self.shadow.write().await;
                if shadow.owner == Some(owner) && shadow.position(id).is_none() {
                    let at = idx.min(shadow.skills.len());
                    shadow.skills.insert(at, removed);
                }
                warn!(skill_id = id, "Skill delete failed, rolled back: {}", e);
                Err(e)
            }
        }
    }
}
