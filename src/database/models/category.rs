use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `category` table. `id` is assigned by the store on insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub id: i64,
    pub name: String,
}
