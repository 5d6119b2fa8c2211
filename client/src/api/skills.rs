//! Skill listing endpoints.

use skillswap_common::{Acknowledgement, NewSkill, Skill, SkillId, SkillUpdate};

use super::ApiClient;
use crate::error::ClientResult;

impl ApiClient {
    /// `GET /skills`, the current user's listings.
    pub async fn my_skills(&self) -> ClientResult<Vec<Skill>> {
        self.get("/skills").await
    }

    /// `POST /skills`.
    pub async fn create_skill(&self, skill: &NewSkill) -> ClientResult<Skill> {
        self.post("/skills", skill).await
    }

    /// `PUT /skills/{id}`.
    pub async fn update_skill(&self, id: SkillId, update: &SkillUpdate) -> ClientResult<Skill> {
        self.put(&format!("/skills/{id}"), update).await
    }

    /// `DELETE /skills/{id}`.
    pub async fn delete_skill(&self, id: SkillId) -> ClientResult<Option<Acknowledgement>> {
        self.delete(&format!("/skills/{id}")).await
    }
}
