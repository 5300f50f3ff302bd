//! Discrepancy log queries

use airlog_common::Result;
use sqlx::SqlitePool;

/// A stored on-air incident record
#[derive(Debug, Clone)]
pub struct DiscrepancyRow {
    pub id: i64,
    pub show_host: String,
    pub title: String,
    pub artist: String,
    pub trigger_word: String,
    /// Whether the delay unit muted the broadcast
    pub suppressed: bool,
    /// Unix seconds, UTC
    pub occurred_at: i64,
}

/// Fields of an incident record before the store assigns an id
#[derive(Debug, Clone)]
pub struct NewDiscrepancy {
    pub show_host: String,
    pub title: String,
    pub artist: String,
    pub trigger_word: String,
    pub suppressed: bool,
    pub occurred_at: i64,
}

type DiscrepancyTuple = (i64, String, String, String, String, i64, i64);

fn row_from_tuple(t: DiscrepancyTuple) -> DiscrepancyRow {
    DiscrepancyRow {
        id: t.0,
        show_host: t.1,
        title: t.2,
        artist: t.3,
        trigger_word: t.4,
        suppressed: t.5 != 0,
        occurred_at: t.6,
    }
}

/// Insert an incident record and return it with its store-assigned id
pub async fn insert_discrepancy(
    db: &SqlitePool,
    discrepancy: &NewDiscrepancy,
) -> Result<DiscrepancyRow> {
    let result = sqlx::query(
        r#"
        INSERT INTO discrepancy_log (show_host, title, artist, trigger_word, suppressed, occurred_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&discrepancy.show_host)
    .bind(&discrepancy.title)
    .bind(&discrepancy.artist)
    .bind(&discrepancy.trigger_word)
    .bind(discrepancy.suppressed as i64)
    .bind(discrepancy.occurred_at)
    .execute(db)
    .await?;

    Ok(DiscrepancyRow {
        id: result.last_insert_rowid(),
        show_host: discrepancy.show_host.clone(),
        title: discrepancy.title.clone(),
        artist: discrepancy.artist.clone(),
        trigger_word: discrepancy.trigger_word.clone(),
        suppressed: discrepancy.suppressed,
        occurred_at: discrepancy.occurred_at,
    })
}

/// Fetch a single incident record by id
pub async fn get_discrepancy(db: &SqlitePool, id: i64) -> Result<Option<DiscrepancyRow>> {
    let row = sqlx::query_as::<_, DiscrepancyTuple>(
        r#"
        SELECT id, show_host, title, artist, trigger_word, suppressed, occurred_at
        FROM discrepancy_log WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await?;

    Ok(row.map(row_from_tuple))
}
