use sqlx::{MySqlPool, mysql::MySqlPoolOptions};

use crate::config::Config;

/// Opens the pool, verifies the server answers within the configured timeout
/// and creates the schema if it is missing.
pub async fn connect(config: &Config) -> Result<MySqlPool, sqlx::Error> {
    let pool = MySqlPoolOptions::new()
        .max_connections(config.max_connections)
        .max_lifetime(config.conn_max_lifetime)
        .acquire_timeout(config.connect_timeout)
        .connect(&config.database_url)
        .await?;

    ping(&pool, config).await?;
    tracing::info!("Connected to database");

    init_schema(&pool).await?;
    Ok(pool)
}

async fn ping(pool: &MySqlPool, config: &Config) -> Result<(), sqlx::Error> {
    let probe = sqlx::query("SELECT 1").execute(pool);
    match tokio::time::timeout(config.connect_timeout, probe).await {
        Ok(result) => result.map(|_| ()),
        Err(_) => Err(sqlx::Error::PoolTimedOut),
    }
}

pub async fn init_schema(pool: &MySqlPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS posts (
            id CHAR(36) NOT NULL PRIMARY KEY,
            title VARCHAR(255) NOT NULL,
            content TEXT NOT NULL,
            created_at DATETIME(6) NOT NULL DEFAULT CURRENT_TIMESTAMP(6)
        ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4 COLLATE=utf8mb4_unicode_ci
        "#,
    )
    .execute(pool)
    .await?;

    // No foreign keys: deleting a post leaves its comments behind.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS comments (
            id CHAR(36) NOT NULL PRIMARY KEY,
            parent_id CHAR(36) NULL,
            post_id CHAR(36) NOT NULL,
            text TEXT NOT NULL,
            created_at DATETIME(6) NOT NULL DEFAULT CURRENT_TIMESTAMP(6),
            INDEX idx_comments_post_id_parent_id (post_id, parent_id),
            INDEX idx_comments_parent_id (parent_id)
        ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4 COLLATE=utf8mb4_unicode_ci
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn close(pool: MySqlPool) {
    pool.close().await;
    tracing::info!("Database connection closed");
}

#[cfg(test)]
mod tests {
    use super::*;

    // Run with: DATABASE_URL=mysql://... cargo test -- --ignored
    #[tokio::test]
    #[ignore = "requires database"]
    async fn connect_creates_schema() {
        let config = Config::from_env().expect("config");
        let pool = connect(&config).await.expect("pool creation failed");

        let (count,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM information_schema.tables
            WHERE table_schema = DATABASE()
              AND table_name IN ('posts', 'comments')
            "#,
        )
        .fetch_one(&pool)
        .await
        .expect("query failed");

        assert_eq!(count, 2);
        close(pool).await;
    }
}
