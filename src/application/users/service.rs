//! User management service: application-layer orchestration
//!
//! Validation, the update-or-insert decision and the derived read fields
//! live here. HTTP handlers are thin wrappers that delegate to this service.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::domain::user::age::today;
use crate::domain::{
    user::{validate_new_user, validate_user_patch},
    DomainError, DomainResult, NewUser, User, UserDetails, UserPatch, UserRepository,
};

/// Which branch an upsert took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// An existing row was updated; no record was created.
    Updated,
    /// No row matched, a new record was inserted under the caller's id.
    Created,
}

/// User service — orchestrates all user-management use-cases.
#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }

    // ── Queries ─────────────────────────────────────────────────

    /// All users in storage order, with age and display date derived.
    #[instrument(name = "users.service.list_users", skip(self))]
    pub async fn list_users(&self) -> DomainResult<Vec<UserDetails>> {
        let today = today();
        let users = self.repo.find_all().await?;
        debug!(count = users.len(), "Listed users");
        Ok(users
            .into_iter()
            .map(|u| UserDetails::from_user(u, today))
            .collect())
    }

    /// A single user, or `None` when no row has this id.
    #[instrument(name = "users.service.get_user", skip(self), fields(user_id = %id))]
    pub async fn get_user(&self, id: Uuid) -> DomainResult<Option<UserDetails>> {
        let user = self.repo.find_by_id(id).await?;
        if user.is_none() {
            debug!("User not found");
        }
        Ok(user.map(|u| UserDetails::from_user(u, today())))
    }

    // ── Commands (mutations) ────────────────────────────────────

    /// Validate and store a new user under a freshly minted id.
    #[instrument(
        name = "users.service.add_user",
        skip(self, new_user),
        fields(email = %new_user.email)
    )]
    pub async fn add_user(&self, new_user: NewUser) -> DomainResult<User> {
        if let Err(message) = validate_new_user(&new_user, today()) {
            warn!(%message, "Rejected new user");
            return Err(DomainError::Validation(message));
        }

        let user = self.repo.insert(new_user.with_id(Uuid::new_v4())).await?;

        info!(user_id = %user.id, "User created");
        Ok(user)
    }

    /// Update the fields present in `patch`, or insert a new user with `id`
    /// when no row matches.
    ///
    /// The update and the fallback insert are separate statements; two
    /// concurrent upserts for the same absent id can both reach the insert,
    /// and the loser fails on the primary key.
    #[instrument(name = "users.service.upsert_user", skip(self, patch), fields(user_id = %id))]
    pub async fn upsert_user(&self, id: Uuid, patch: UserPatch) -> DomainResult<UpsertOutcome> {
        let today = today();

        if let Err(message) = validate_user_patch(&patch, today) {
            warn!(%message, "Rejected user patch");
            return Err(DomainError::Validation(message));
        }

        let rows = self.repo.update_fields(id, &patch).await?;
        if rows > 0 {
            info!("User updated, no new record created");
            return Ok(UpsertOutcome::Updated);
        }

        let candidate = patch.to_new_user().map_err(|message| {
            warn!(%message, "Cannot insert user from patch");
            DomainError::Validation(message)
        })?;

        if let Err(message) = validate_new_user(&candidate, today) {
            warn!(%message, "Rejected user for insert");
            return Err(DomainError::Validation(message));
        }

        self.repo.insert(candidate.with_id(id)).await?;

        info!("User created from upsert");
        Ok(UpsertOutcome::Created)
    }

    /// Remove a user. `false` when no row had this id.
    #[instrument(name = "users.service.delete_user", skip(self), fields(user_id = %id))]
    pub async fn delete_user(&self, id: Uuid) -> DomainResult<bool> {
        let removed = self.repo.delete(id).await?;
        if removed {
            info!("User deleted");
        } else {
            debug!("Nothing to delete");
        }
        Ok(removed)
    }
}
