use async_trait::async_trait;
use sqlx::postgres::PgQueryResult;

use crate::errors::PersistenceError;

/// Uniform CRUD surface shared by every entity repository.
///
/// `update` and `delete` report whether exactly one row changed; a missing
/// id is `Ok(false)`, not an error. `find_by_id` returns `Ok(None)` on a miss.
#[async_trait]
pub trait Repository: Send + Sync {
    type Entity: Send + Sync;
    type Draft: Send;

    /// Inserts the draft and returns it with its generated identity.
    async fn create(&self, draft: Self::Draft) -> Result<Self::Entity, PersistenceError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Self::Entity>, PersistenceError>;

    /// Every row, in insertion order.
    async fn find_all(&self) -> Result<Vec<Self::Entity>, PersistenceError>;

    async fn update(&self, entity: &Self::Entity) -> Result<bool, PersistenceError>;

    async fn delete(&self, id: i32) -> Result<bool, PersistenceError>;
}

pub(crate) fn changed_one_row(result: PgQueryResult) -> bool {
    result.rows_affected() == 1
}
