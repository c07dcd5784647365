//! In-memory user storage

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use uuid::Uuid;

use crate::domain::{DomainError, DomainResult, User, UserPatch, UserRepository};

struct StoredUser {
    /// Insertion sequence, used to list in storage order
    seq: u64,
    user: User,
}

/// In-memory storage for development and testing
pub struct InMemoryUserRepository {
    users: DashMap<Uuid, StoredUser>,
    sequence: AtomicU64,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: DashMap::new(),
            sequence: AtomicU64::new(1),
        }
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Snapshot of a stored user.
    pub fn get(&self, id: Uuid) -> Option<User> {
        self.users.get(&id).map(|entry| entry.user.clone())
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_all(&self) -> DomainResult<Vec<User>> {
        let mut rows: Vec<(u64, User)> = self
            .users
            .iter()
            .map(|e| (e.seq, e.user.clone()))
            .collect();
        rows.sort_by_key(|(seq, _)| *seq);
        Ok(rows.into_iter().map(|(_, user)| user).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<User>> {
        Ok(self.get(id))
    }

    async fn insert(&self, user: User) -> DomainResult<User> {
        match self.users.entry(user.id) {
            Entry::Occupied(_) => Err(DomainError::Storage(format!(
                "UNIQUE constraint failed: users.id ({})",
                user.id
            ))),
            Entry::Vacant(slot) => {
                let seq = self.sequence.fetch_add(1, Ordering::SeqCst);
                slot.insert(StoredUser {
                    seq,
                    user: user.clone(),
                });
                Ok(user)
            }
        }
    }

    async fn update_fields(&self, id: Uuid, patch: &UserPatch) -> DomainResult<u64> {
        match self.users.get_mut(&id) {
            Some(mut entry) => {
                patch.apply_to(&mut entry.user);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete(&self, id: Uuid) -> DomainResult<bool> {
        Ok(self.users.remove(&id).is_some())
    }
}
