use async_trait::async_trait;
use sqlx::SqliteConnection;

use crate::database::models::Category;

/// SQL access for the `category` table. Every method runs on a connection
/// the caller already holds, normally the one inside an open transaction, so
/// the repository never decides when work is committed.
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn save(&self, conn: &mut SqliteConnection, name: &str) -> Result<Category, sqlx::Error>;

    async fn update(&self, conn: &mut SqliteConnection, category: Category) -> Result<Category, sqlx::Error>;

    async fn delete(&self, conn: &mut SqliteConnection, category: &Category) -> Result<(), sqlx::Error>;

    /// `Ok(None)` when no row has this id
    async fn find_by_id(&self, conn: &mut SqliteConnection, id: i64) -> Result<Option<Category>, sqlx::Error>;

    async fn find_all(&self, conn: &mut SqliteConnection) -> Result<Vec<Category>, sqlx::Error>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SqlCategoryRepository;

#[async_trait]
impl CategoryRepository for SqlCategoryRepository {
    async fn save(&self, conn: &mut SqliteConnection, name: &str) -> Result<Category, sqlx::Error> {
        let result = sqlx::query("INSERT INTO category (name) VALUES (?)")
            .bind(name)
            .execute(&mut *conn)
            .await?;

        Ok(Category {
            id: result.last_insert_rowid(),
            name: name.to_string(),
        })
    }

    async fn update(&self, conn: &mut SqliteConnection, category: Category) -> Result<Category, sqlx::Error> {
        sqlx::query("UPDATE category SET name = ? WHERE id = ?")
            .bind(&category.name)
            .bind(category.id)
            .execute(&mut *conn)
            .await?;

        Ok(category)
    }

    async fn delete(&self, conn: &mut SqliteConnection, category: &Category) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM category WHERE id = ?")
            .bind(category.id)
            .execute(&mut *conn)
            .await?;

        Ok(())
    }

    async fn find_by_id(&self, conn: &mut SqliteConnection, id: i64) -> Result<Option<Category>, sqlx::Error> {
        sqlx::query_as::<_, Category>("SELECT id, name FROM category WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
    }

    async fn find_all(&self, conn: &mut SqliteConnection) -> Result<Vec<Category>, sqlx::Error> {
        sqlx::query_as::<_, Category>("SELECT id, name FROM category ORDER BY id")
            .fetch_all(&mut *conn)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseConfig;
    use crate::database::manager::DatabaseManager;
    use sqlx::Connection;

    #[tokio::test]
    async fn crud_round_trip_on_one_connection() {
        let manager = DatabaseManager::connect(&DatabaseConfig::in_memory())
            .await
            .unwrap();
        let mut conn = manager.pool().acquire().await.unwrap();
        let repo = SqlCategoryRepository;

        let gadget = repo.save(&mut conn, "Gadget").await.unwrap();
        let food = repo.save(&mut conn, "Food").await.unwrap();
        assert_eq!(gadget.id, 1);
        assert_eq!(food.id, 2);

        let found = repo.find_by_id(&mut conn, gadget.id).await.unwrap();
        assert_eq!(found, Some(gadget.clone()));

        let renamed = repo
            .update(&mut conn, Category { id: gadget.id, name: "T SHIRT".into() })
            .await
            .unwrap();
        assert_eq!(renamed.name, "T SHIRT");

        repo.delete(&mut conn, &renamed).await.unwrap();
        assert_eq!(repo.find_by_id(&mut conn, gadget.id).await.unwrap(), None);

        let all = repo.find_all(&mut conn).await.unwrap();
        assert_eq!(all, vec![food]);

        conn.ping().await.unwrap();
    }

    #[tokio::test]
    async fn ids_are_never_reused() {
        let manager = DatabaseManager::connect(&DatabaseConfig::in_memory())
            .await
            .unwrap();
        let mut conn = manager.pool().acquire().await.unwrap();
        let repo = SqlCategoryRepository;

        let first = repo.save(&mut conn, "first").await.unwrap();
        repo.delete(&mut conn, &first).await.unwrap();
        let second = repo.save(&mut conn, "second").await.unwrap();

        assert!(second.id > first.id);
    }
}
