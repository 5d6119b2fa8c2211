//! Member Directory
//!
//! Public profiles with local filtering and skill-match suggestions.

use std::sync::Arc;

use serde::Serialize;
use skillswap_common::matching::{score_skills, DirectoryFilter};
use skillswap_common::{PublicUser, SkillId, UserId};
use tracing::debug;

use crate::error::ClientResult;
use crate::session::Session;

/// One offered skill ranked against a search query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillMatch {
    pub user_id: UserId,
    pub user_name: String,
    pub skill_id: SkillId,
    pub skill_name: String,
    pub score: f64,
}

#[derive(Debug)]
pub struct MemberDirectory {
    session: Arc<Session>,
}

impl MemberDirectory {
    pub const fn new(session: Arc<Session>) -> Self {
        Self { session }
    }

    /// `GET /public-users`, without the logged-in user's own profile.
    pub async fn members(&self) -> ClientResult<Vec<PublicUser>> {
        let me = self.session.current_user().map(|u| u.id);
        let mut members = self.session.api().public_users().await?;
        members.retain(|m| Some(m.id) != me);
        debug!(count = members.len(), "Directory loaded");
        Ok(members)
    }

    /// Members passing `filter`.
    pub async fn search(&self, filter: &DirectoryFilter) -> ClientResult<Vec<PublicUser>> {
        let members = self.members().await?;
        Ok(filter.apply(&members).into_iter().cloned().collect())
    }

    /// Offered skills across the directory ranked against `query`.
    ///
    /// Zero-score skills are dropped; at most `limit` results are returned.
    pub async fn suggest(&self, query: &str, limit: usize) -> ClientResult<Vec<SkillMatch>> {
        let members = self.members().await?;
        Ok(rank_offers(&members, query, limit))
    }
}

fn rank_offers(members: &[PublicUser], query: &str, limit: usize) -> Vec<SkillMatch> {
    let offers: Vec<(&PublicUser, SkillId, &str)> = members
        .iter()
        .flat_map(|m| m.offered_skills().map(move |s| (m, s.id, s.name.as_str())))
        .collect();
    let names: Vec<String> = offers.iter().map(|(_, _, n)| (*n).to_string()).collect();

    let mut ranked: Vec<SkillMatch> = offers
        .into_iter()
        .zip(score_skills(query, &names))
        .filter(|(_, score)| *score > 0.0)
        .map(|((member, skill_id, name), score)| SkillMatch {
            user_id: member.id,
            user_name: member.name.clone(),
            skill_id,
            skill_name: name.to_string(),
            score,
        })
        .collect();
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked.truncate(limit);
    ranked
}
