//! Database initialization tests

use pulse_common::db::init_database_pool;
use sqlx::Row;
use tempfile::TempDir;

#[tokio::test]
async fn test_init_creates_file_and_tables() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("nested").join("reviewpulse.db");

    let pool = init_database_pool(&db_path).await.unwrap();

    // Missing parent directories are created along with the file.
    assert!(db_path.exists());

    let row = sqlx::query("SELECT name FROM sqlite_master WHERE type = 'table' AND name = 'reviews'")
        .fetch_optional(&pool)
        .await
        .unwrap();
    assert!(row.is_some());
}

#[tokio::test]
async fn test_init_is_idempotent_and_keeps_data() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("reviewpulse.db");

    let pool = init_database_pool(&db_path).await.unwrap();
    sqlx::query("INSERT INTO reviews (guid, record, created_at) VALUES ('g1', '{}', 1)")
        .execute(&pool)
        .await
        .unwrap();
    pool.close().await;

    // Re-opening the same file must not clobber existing rows.
    let pool = init_database_pool(&db_path).await.unwrap();
    let row = sqlx::query("SELECT COUNT(*) AS n FROM reviews")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(row.get::<i64, _>("n"), 1);
}
