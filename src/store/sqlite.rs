use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use rusqlite_migration::{Migrations, M};

use crate::app::{Result, SubscrollError};
use crate::domain::{Entry, FavoriteRecord, FlagKind};
use crate::store::OverlayStore;

/// Overlay store on a single SQLite connection.
///
/// Every call takes the connection lock for its whole duration, so calls for
/// the same URL apply in the order they were made and a `get` after a `set`
/// always sees the write.
pub struct SqliteOverlayStore {
    conn: Mutex<Connection>,
}

impl SqliteOverlayStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.run_migrations()?;
        Ok(store)
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.run_migrations()?;
        Ok(store)
    }

    fn run_migrations(&self) -> Result<()> {
        let migrations = Migrations::new(vec![M::up(include_str!(
            "../../migrations/001-initial/up.sql"
        ))]);

        let mut conn = self.lock()?;
        migrations
            .to_latest(&mut conn)
            .map_err(|e| SubscrollError::Other(format!("Migration failed: {e}")))?;

        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| {
            SubscrollError::Database(rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(1),
                Some(e.to_string()),
            ))
        })
    }

    fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
    }
}

// Fixed width so that text order is time order
fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn non_empty(value: &str) -> Option<&str> {
    Some(value).filter(|v| !v.is_empty())
}

impl OverlayStore for SqliteOverlayStore {
    fn get(&self, url: &str, kind: FlagKind) -> Result<bool> {
        let conn = self.lock()?;
        let sql = match kind {
            FlagKind::Hidden => "SELECT 1 FROM hidden_posts WHERE url = ?1",
            FlagKind::Favorite => "SELECT 1 FROM favorites WHERE url = ?1",
        };

        let found = conn
            .query_row(sql, params![url], |row| row.get::<_, i64>(0))
            .optional()?;

        Ok(found.is_some())
    }

    fn set(&self, url: &str, kind: FlagKind, value: bool) -> Result<()> {
        let conn = self.lock()?;
        let now = timestamp();

        match (kind, value) {
            (FlagKind::Hidden, true) => {
                conn.execute(
                    "INSERT INTO hidden_posts (url, created_at) VALUES (?1, ?2)
                     ON CONFLICT(url) DO NOTHING",
                    params![url, now],
                )?;
            }
            (FlagKind::Hidden, false) => {
                conn.execute("DELETE FROM hidden_posts WHERE url = ?1", params![url])?;
            }
            (FlagKind::Favorite, true) => {
                conn.execute(
                    "INSERT INTO favorites (url, created_at) VALUES (?1, ?2)
                     ON CONFLICT(url) DO NOTHING",
                    params![url, now],
                )?;
            }
            (FlagKind::Favorite, false) => {
                conn.execute("DELETE FROM favorites WHERE url = ?1", params![url])?;
            }
        }

        tracing::debug!(url, kind = kind.as_str(), value, "overlay flag set");
        Ok(())
    }

    fn favorite_entry(&self, entry: &Entry) -> Result<()> {
        let conn = self.lock()?;

        conn.execute(
            "INSERT INTO favorites (url, reddit_name, subreddit, created_at) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(url) DO UPDATE SET
                reddit_name = excluded.reddit_name,
                subreddit = excluded.subreddit",
            params![
                entry.url,
                non_empty(&entry.name),
                non_empty(&entry.subreddit),
                timestamp()
            ],
        )?;

        tracing::debug!(url = %entry.url, name = %entry.name, "favorited entry");
        Ok(())
    }

    fn favorites(&self) -> Result<Vec<FavoriteRecord>> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare(
            "SELECT url, reddit_name, subreddit, created_at
             FROM favorites ORDER BY created_at DESC, rowid DESC",
        )?;

        let favorites = stmt
            .query_map([], |row| {
                Ok(FavoriteRecord {
                    url: row.get(0)?,
                    reddit_name: row.get(1)?,
                    subreddit: row.get(2)?,
                    created_at: row
                        .get::<_, String>(3)
                        .ok()
                        .and_then(|s| Self::parse_datetime(&s))
                        .unwrap_or_else(Utc::now),
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(favorites)
    }

    fn hidden_urls(&self) -> Result<Vec<String>> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare("SELECT url FROM hidden_posts ORDER BY created_at, rowid")?;
        let urls = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;

        Ok(urls)
    }
}
