#![cfg(test)]
use chrono::{Duration, TimeZone, Utc};
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;

use crate::posts::Post;

/// Fresh migrated SQLite database private to the calling test.
pub async fn sqlite_db() -> Result<DatabaseConnection, anyhow::Error> {
    let db = models::db::connect_sqlite_memory().await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

/// Post with a fixed timestamp; ordering between posts comes from ids alone.
pub fn post(id: &str, author: &str, text: &str) -> Post {
    let at = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap() + Duration::milliseconds(250);
    Post {
        id: id.to_owned(),
        text: text.to_owned(),
        author_id: author.to_owned(),
        created_at: at,
        last_modified_at: at,
    }
}
