use futures::future::BoxFuture;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::error;

use crate::error::ApiError;

/// Run `work` inside a transaction checked out from `pool`.
///
/// Commits when `work` returns `Ok`, rolls back when it returns `Err`, and in
/// the rollback case hands back the original error untouched so the boundary
/// still sees what actually went wrong. A failed rollback is logged and does
/// not replace that error.
///
/// If the returned future is dropped before completion (the client went away
/// mid-request) the open transaction is dropped with it, which rolls back.
///
/// ```ignore
/// let category = transactional(&pool, move |conn| Box::pin(async move {
///     repository.find_by_id(conn, id).await?.ok_or_else(category_not_found)
/// }))
/// .await?;
/// ```
pub async fn transactional<T, F>(pool: &SqlitePool, work: F) -> Result<T, ApiError>
where
    T: Send,
    F: for<'c> FnOnce(&'c mut SqliteConnection) -> BoxFuture<'c, Result<T, ApiError>> + Send,
{
    let mut tx = pool.begin().await?;

    match work(&mut *tx).await {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                error!(original = %err, error = %rollback_err, "transaction rollback failed");
            }
            Err(err)
        }
    }
}
