//! SeaORM implementation of UserRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, NotSet,
    PaginatorTrait, QueryFilter, Set,
};
use tracing::debug;
use uuid::Uuid;

use crate::domain::{DomainError, DomainResult, User, UserPatch, UserRepository};
use crate::infrastructure::database::entities::user;

pub struct SeaOrmUserRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: user::Model) -> User {
    User {
        id: m.id,
        first_name: m.first_name,
        last_name: m.last_name,
        email: m.email,
        date_of_birth: m.date_of_birth,
        phone_number: m.phone_number,
    }
}

fn domain_to_active(u: User) -> user::ActiveModel {
    user::ActiveModel {
        id: Set(u.id),
        first_name: Set(u.first_name),
        last_name: Set(u.last_name),
        email: Set(u.email),
        phone_number: Set(u.phone_number),
        date_of_birth: Set(u.date_of_birth),
    }
}

/// Only the present patch fields end up in the SET clause.
fn patch_to_active(patch: &UserPatch) -> user::ActiveModel {
    user::ActiveModel {
        id: NotSet,
        first_name: set_or_skip(patch.first_name().map(str::to_string)),
        last_name: set_or_skip(patch.last_name().map(|v| Some(v.to_string()))),
        email: set_or_skip(patch.email().map(str::to_string)),
        phone_number: set_or_skip(patch.phone_number),
        date_of_birth: set_or_skip(patch.date_of_birth),
    }
}

fn set_or_skip<V>(value: Option<V>) -> ActiveValue<V>
where
    V: Into<sea_orm::Value>,
{
    value.map_or(NotSet, Set)
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::from(e)
}

// ── UserRepository impl ─────────────────────────────────────────

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn find_all(&self) -> DomainResult<Vec<User>> {
        let models = user::Entity::find().all(&self.db).await.map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<User>> {
        let model = user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn insert(&self, u: User) -> DomainResult<User> {
        debug!("Inserting user: {}", u.id);

        let model = domain_to_active(u).insert(&self.db).await.map_err(db_err)?;
        Ok(model_to_domain(model))
    }

    async fn update_fields(&self, id: Uuid, patch: &UserPatch) -> DomainResult<u64> {
        if patch.is_empty() {
            // An UPDATE without columns is not valid SQL; report existence instead.
            let count = user::Entity::find_by_id(id)
                .count(&self.db)
                .await
                .map_err(db_err)?;
            return Ok(count);
        }

        debug!("Updating user: {}", id);

        let result = user::Entity::update_many()
            .set(patch_to_active(patch))
            .filter(user::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected)
    }

    async fn delete(&self, id: Uuid) -> DomainResult<bool> {
        debug!("Deleting user: {}", id);

        let result = user::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected > 0)
    }
}
