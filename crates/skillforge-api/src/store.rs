//! In-memory document store for skills and ledgers.
//!
//! Stands in for the external document store the engine is specified
//! against: per-record read-modify-write, keyed by skill id and user id,
//! no schema beyond the entity structs. The `update_*` methods hold the
//! write lock across the whole closure, which is what makes a
//! read-modify-write atomic against rapid double-submits of the same
//! challenge.
//!
//! Lock ordering for callers that need both maps: skills before ledgers,
//! never the reverse.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use skillforge_engine::economy;
use skillforge_types::{ProgressLedger, Skill, SkillId, UserId};

use crate::error::ApiError;

/// RwLock-guarded maps holding every user's documents.
#[derive(Default)]
pub struct DocumentStore {
    skills: RwLock<BTreeMap<SkillId, Skill>>,
    ledgers: RwLock<BTreeMap<UserId, ProgressLedger>>,
}

impl DocumentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------------
    // Skills
    // -----------------------------------------------------------------------

    /// All skills owned by a user.
    pub async fn list_skills(&self, user: &UserId) -> Vec<Skill> {
        self.skills
            .read()
            .await
            .values()
            .filter(|skill| &skill.owner == user)
            .cloned()
            .collect()
    }

    /// A single skill by id.
    pub async fn get_skill(&self, id: SkillId) -> Result<Skill, ApiError> {
        self.skills
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("skill {id}")))
    }

    /// Insert or replace a skill document.
    pub async fn put_skill(&self, skill: Skill) {
        self.skills.write().await.insert(skill.id, skill);
    }

    /// Atomically read-modify-write one skill document.
    pub async fn update_skill<T>(
        &self,
        id: SkillId,
        apply: impl FnOnce(&mut Skill) -> Result<T, ApiError>,
    ) -> Result<T, ApiError> {
        let mut skills = self.skills.write().await;
        let skill = skills
            .get_mut(&id)
            .ok_or_else(|| ApiError::NotFound(format!("skill {id}")))?;
        apply(skill)
    }

    /// Delete a skill document.
    ///
    /// No cascading repair of other skills' prerequisite references:
    /// dependents resolve as locked with a `missing` reason afterwards.
    pub async fn remove_skill(&self, id: SkillId) -> Result<(), ApiError> {
        self.skills
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| ApiError::NotFound(format!("skill {id}")))
    }

    // -----------------------------------------------------------------------
    // Ledgers
    // -----------------------------------------------------------------------

    /// The user's ledger, created with defaults on first touch.
    pub async fn get_or_open_ledger(&self, user: &UserId, now: DateTime<Utc>) -> ProgressLedger {
        let mut ledgers = self.ledgers.write().await;
        ledgers
            .entry(user.clone())
            .or_insert_with(|| economy::open_ledger(user.clone(), now))
            .clone()
    }

    /// Atomically read-modify-write the user's ledger, creating it with
    /// defaults first if absent.
    pub async fn update_ledger<T>(
        &self,
        user: &UserId,
        now: DateTime<Utc>,
        apply: impl FnOnce(&mut ProgressLedger) -> Result<T, ApiError>,
    ) -> Result<T, ApiError> {
        let mut ledgers = self.ledgers.write().await;
        let ledger = ledgers
            .entry(user.clone())
            .or_insert_with(|| economy::open_ledger(user.clone(), now));
        apply(ledger)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use skillforge_types::{SkillCategory, TargetProficiency};

    use super::*;

    fn sample_skill(owner: &UserId, name: &str) -> Skill {
        Skill::new(
            owner.clone(),
            String::from(name),
            SkillCategory::Tools,
            TargetProficiency::default(),
            Vec::new(),
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn skills_are_scoped_per_user() {
        let store = DocumentStore::new();
        let alice = UserId::from("user_alice");
        let bob = UserId::from("user_bob");

        store.put_skill(sample_skill(&alice, "Docker")).await;
        store.put_skill(sample_skill(&bob, "React")).await;

        assert_eq!(store.list_skills(&alice).await.len(), 1);
        assert_eq!(store.list_skills(&bob).await.len(), 1);
    }

    #[tokio::test]
    async fn get_missing_skill_is_not_found() {
        let store = DocumentStore::new();
        let result = store.get_skill(SkillId::new()).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn update_skill_applies_in_place() {
        let store = DocumentStore::new();
        let owner = UserId::from("user_alice");
        let skill = sample_skill(&owner, "Docker");
        let id = skill.id;
        store.put_skill(skill).await;

        let result = store
            .update_skill(id, |s| {
                s.name = String::from("Docker Compose");
                Ok(())
            })
            .await;
        assert!(result.is_ok());

        let reread = store.get_skill(id).await;
        assert_eq!(reread.map(|s| s.name).ok().as_deref(), Some("Docker Compose"));
    }

    #[tokio::test]
    async fn remove_skill_deletes_once() {
        let store = DocumentStore::new();
        let owner = UserId::from("user_alice");
        let skill = sample_skill(&owner, "Docker");
        let id = skill.id;
        store.put_skill(skill).await;

        assert!(store.remove_skill(id).await.is_ok());
        assert!(matches!(
            store.remove_skill(id).await,
            Err(ApiError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn ledger_is_created_on_first_touch() {
        let store = DocumentStore::new();
        let user = UserId::from("user_alice");

        let ledger = store.get_or_open_ledger(&user, Utc::now()).await;
        assert_eq!(ledger.spendable_xp, 0);
        assert!(ledger.inventory.contains("theme-light"));

        // Second read returns the same document, not a new one.
        let result = store
            .update_ledger(&user, Utc::now(), |l| {
                economy::credit(l, 100).map_err(ApiError::from)
            })
            .await;
        assert!(result.is_ok());

        let reread = store.get_or_open_ledger(&user, Utc::now()).await;
        assert_eq!(reread.spendable_xp, 100);
    }
}
