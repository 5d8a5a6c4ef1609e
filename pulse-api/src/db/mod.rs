//! Review record persistence
//!
//! Append-only: records are written once and read back in recency order.
//! No update or delete path exists.

use pulse_common::db::models::ReviewRecord;
use pulse_common::Result;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// Append one review record, returning the store-assigned id.
pub async fn append_review(pool: &SqlitePool, record: &ReviewRecord) -> Result<String> {
    let guid = Uuid::new_v4().to_string();
    let body = serde_json::to_string(record)?;

    sqlx::query("INSERT INTO reviews (guid, record, created_at) VALUES (?, ?, ?)")
        .bind(&guid)
        .bind(&body)
        .bind(record.created_at)
        .execute(pool)
        .await?;

    Ok(guid)
}

/// Fetch up to `limit` of the most recent review records, newest first.
///
/// Records that no longer deserialize are skipped with a warning rather
/// than failing the whole read.
pub async fn recent_reviews(pool: &SqlitePool, limit: i64) -> Result<Vec<ReviewRecord>> {
    let rows = sqlx::query("SELECT record FROM reviews ORDER BY created_at DESC LIMIT ?")
        .bind(limit)
        .fetch_all(pool)
        .await?;

    let mut records = Vec::with_capacity(rows.len());
    for row in rows {
        let body: String = row.get("record");
        match serde_json::from_str::<ReviewRecord>(&body) {
            Ok(record) => records.push(record),
            Err(e) => tracing::warn!("Skipping unreadable review record: {}", e),
        }
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn memory_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory pool");
        pulse_common::db::init_tables(&pool).await.expect("tables");
        pool
    }

    fn record(text: &str, created_at: i64) -> ReviewRecord {
        ReviewRecord {
            rating: 5,
            review_text: text.to_string(),
            ai_response: "Thanks!".to_string(),
            ai_summary: "Happy".to_string(),
            ai_action: "None".to_string(),
            ai_sentiment: 90,
            ai_tags: vec!["Service".to_string()],
            latency_ms: 250,
            created_at,
        }
    }

    #[tokio::test]
    async fn test_append_assigns_unique_ids() {
        let pool = memory_pool().await;
        let a = append_review(&pool, &record("first", 1000)).await.unwrap();
        let b = append_review(&pool, &record("second", 2000)).await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_recent_returns_newest_first_and_bounded() {
        let pool = memory_pool().await;
        for i in 0..4 {
            append_review(&pool, &record(&format!("review {}", i), i * 1000))
                .await
                .unwrap();
        }

        let recent = recent_reviews(&pool, 2).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].review_text, "review 3");
        assert_eq!(recent[1].review_text, "review 2");
    }

    #[tokio::test]
    async fn test_round_trip_preserves_fields() {
        let pool = memory_pool().await;
        append_review(&pool, &record("exact fields", 42)).await.unwrap();

        let recent = recent_reviews(&pool, 50).await.unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0], record("exact fields", 42));
    }
}
