//! Song log queries
//!
//! The song log is append-only: records are inserted by the ingestion
//! handler and never updated or deleted.

use airlog_common::Result;
use sqlx::SqlitePool;

/// A stored song record
#[derive(Debug, Clone)]
pub struct SongRow {
    pub id: i64,
    pub asset_id: String,
    pub title: String,
    pub artist: String,
    pub truncated_artist: String,
    pub album: String,
    pub genre: String,
    pub location: String,
    /// Unix seconds, UTC
    pub played_at: i64,
}

/// Fields of a song record before the store assigns an id
#[derive(Debug, Clone)]
pub struct NewSong {
    pub asset_id: String,
    pub title: String,
    pub artist: String,
    pub truncated_artist: String,
    pub album: String,
    pub genre: String,
    pub location: String,
    pub played_at: i64,
}

/// Conjunctive filters for a song log query
#[derive(Debug, Clone, Default)]
pub struct SongFilter {
    /// Only records with id strictly greater than this cursor
    pub after_id: Option<i64>,
    /// Inclusive [start, end] window, Unix seconds UTC
    pub window: Option<(i64, i64)>,
    /// Only records played strictly before this instant (delay cutoff)
    pub played_before: Option<i64>,
    /// Descending id order instead of ascending
    pub descending: bool,
    /// Maximum number of rows
    pub limit: i64,
}

type SongTuple = (i64, String, String, String, String, String, String, String, i64);

fn row_from_tuple(t: SongTuple) -> SongRow {
    SongRow {
        id: t.0,
        asset_id: t.1,
        title: t.2,
        artist: t.3,
        truncated_artist: t.4,
        album: t.5,
        genre: t.6,
        location: t.7,
        played_at: t.8,
    }
}

const SONG_COLUMNS: &str =
    "id, asset_id, title, artist, truncated_artist, album, genre, location, played_at";

/// Insert a song record and return it with its store-assigned id
pub async fn insert_song(db: &SqlitePool, song: &NewSong) -> Result<SongRow> {
    let result = sqlx::query(
        r#"
        INSERT INTO djlog (asset_id, title, artist, truncated_artist, album, genre, location, played_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&song.asset_id)
    .bind(&song.title)
    .bind(&song.artist)
    .bind(&song.truncated_artist)
    .bind(&song.album)
    .bind(&song.genre)
    .bind(&song.location)
    .bind(song.played_at)
    .execute(db)
    .await?;

    Ok(SongRow {
        id: result.last_insert_rowid(),
        asset_id: song.asset_id.clone(),
        title: song.title.clone(),
        artist: song.artist.clone(),
        truncated_artist: song.truncated_artist.clone(),
        album: song.album.clone(),
        genre: song.genre.clone(),
        location: song.location.clone(),
        played_at: song.played_at,
    })
}

/// Fetch a single song record by id
pub async fn get_song(db: &SqlitePool, id: i64) -> Result<Option<SongRow>> {
    let row = sqlx::query_as::<_, SongTuple>(&format!(
        "SELECT {} FROM djlog WHERE id = ?",
        SONG_COLUMNS
    ))
    .bind(id)
    .fetch_optional(db)
    .await?;

    Ok(row.map(row_from_tuple))
}

/// List song records matching all of the filter's conditions
pub async fn list_songs(db: &SqlitePool, filter: &SongFilter) -> Result<Vec<SongRow>> {
    let mut sql = format!("SELECT {} FROM djlog WHERE 1=1", SONG_COLUMNS);

    if filter.after_id.is_some() {
        sql.push_str(" AND id > ?");
    }
    if filter.window.is_some() {
        sql.push_str(" AND played_at BETWEEN ? AND ?");
    }
    if filter.played_before.is_some() {
        sql.push_str(" AND played_at < ?");
    }

    sql.push_str(if filter.descending {
        " ORDER BY id DESC"
    } else {
        " ORDER BY id ASC"
    });
    sql.push_str(" LIMIT ?");

    let mut query = sqlx::query_as::<_, SongTuple>(&sql);
    if let Some(after_id) = filter.after_id {
        query = query.bind(after_id);
    }
    if let Some((start, end)) = filter.window {
        query = query.bind(start).bind(end);
    }
    if let Some(cutoff) = filter.played_before {
        query = query.bind(cutoff);
    }
    query = query.bind(filter.limit);

    let rows = query.fetch_all(db).await?;
    Ok(rows.into_iter().map(row_from_tuple).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_memory_database;

    fn sample(title: &str, played_at: i64) -> NewSong {
        NewSong {
            asset_id: String::new(),
            title: title.to_string(),
            artist: "The Testers".to_string(),
            truncated_artist: "Testers".to_string(),
            album: String::new(),
            genre: String::new(),
            location: "CD Rack".to_string(),
            played_at,
        }
    }

    #[tokio::test]
    async fn test_ids_strictly_increase() {
        let db = init_memory_database().await.unwrap();

        let mut last_id = 0;
        for i in 0..5 {
            let row = insert_song(&db, &sample("Song", 1_700_000_000 + i)).await.unwrap();
            assert!(row.id > last_id);
            last_id = row.id;
        }
    }

    #[tokio::test]
    async fn test_cursor_returns_only_newer_ids() {
        let db = init_memory_database().await.unwrap();
        for i in 0..4 {
            insert_song(&db, &sample("Song", 1_700_000_000 + i)).await.unwrap();
        }

        let filter = SongFilter {
            after_id: Some(2),
            limit: 500,
            ..Default::default()
        };
        let rows = list_songs(&db, &filter).await.unwrap();

        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 4]);
    }

    #[tokio::test]
    async fn test_descending_order() {
        let db = init_memory_database().await.unwrap();
        for i in 0..3 {
            insert_song(&db, &sample("Song", 1_700_000_000 + i)).await.unwrap();
        }

        let filter = SongFilter {
            descending: true,
            limit: 500,
            ..Default::default()
        };
        let rows = list_songs(&db, &filter).await.unwrap();

        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[tokio::test]
    async fn test_window_is_inclusive() {
        let db = init_memory_database().await.unwrap();
        insert_song(&db, &sample("before", 999)).await.unwrap();
        insert_song(&db, &sample("at start", 1000)).await.unwrap();
        insert_song(&db, &sample("inside", 1500)).await.unwrap();
        insert_song(&db, &sample("at end", 2000)).await.unwrap();
        insert_song(&db, &sample("after", 2001)).await.unwrap();

        let filter = SongFilter {
            window: Some((1000, 2000)),
            limit: 500,
            ..Default::default()
        };
        let rows = list_songs(&db, &filter).await.unwrap();

        let titles: Vec<&str> = rows.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["at start", "inside", "at end"]);
    }

    #[tokio::test]
    async fn test_delay_cutoff_is_strict() {
        let db = init_memory_database().await.unwrap();
        insert_song(&db, &sample("aired", 1000)).await.unwrap();
        insert_song(&db, &sample("not yet aired", 1030)).await.unwrap();

        let filter = SongFilter {
            played_before: Some(1030),
            limit: 500,
            ..Default::default()
        };
        let rows = list_songs(&db, &filter).await.unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].title, "aired");
    }

    #[tokio::test]
    async fn test_filters_are_conjunctive() {
        let db = init_memory_database().await.unwrap();
        for i in 0..6 {
            insert_song(&db, &sample("Song", 1000 + i * 100)).await.unwrap();
        }

        // id > 2 AND played_at in [1200, 1500]
        let filter = SongFilter {
            after_id: Some(2),
            window: Some((1200, 1500)),
            limit: 500,
            ..Default::default()
        };
        let rows = list_songs(&db, &filter).await.unwrap();

        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 4, 5]);
    }

    #[tokio::test]
    async fn test_limit_applied_after_ordering() {
        let db = init_memory_database().await.unwrap();
        for i in 0..10 {
            insert_song(&db, &sample("Song", 1000 + i)).await.unwrap();
        }

        let filter = SongFilter {
            descending: true,
            limit: 3,
            ..Default::default()
        };
        let rows = list_songs(&db, &filter).await.unwrap();

        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![10, 9, 8]);
    }

    #[tokio::test]
    async fn test_get_song_unknown_id() {
        let db = init_memory_database().await.unwrap();
        assert!(get_song(&db, 42).await.unwrap().is_none());
    }
}
