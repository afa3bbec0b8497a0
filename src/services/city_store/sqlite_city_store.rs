use std::{path::Path, sync::Arc};

use async_trait::async_trait;
use parking_lot::Mutex;
use rusqlite::{params, Connection, OpenFlags, OptionalExtension};
use tracing::info;

use super::{CityStore, CityStoreError};
use crate::types::city_records::{CoordinateRecord, SuggestionRecord};

/// `CityStore` over the imported SQLite `cities` table.
#[derive(Clone)]
pub struct SqliteCityStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteCityStore {
    pub fn open(path: &Path) -> Result<Self, CityStoreError> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        info!("Opened city store at {}", path.display());

        Ok(Self::from_connection(conn))
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    async fn with_conn<T, F>(&self, query: F) -> Result<T, CityStoreError>
    where
        F: FnOnce(&Connection) -> rusqlite::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || query(&*conn.lock()))
            .await
            .map_err(|e| CityStoreError::Unavailable(e.to_string()))?
            .map_err(CityStoreError::from)
    }
}

/// `LIKE` pattern matching names that start with `prefix` literally.
fn like_prefix(prefix: &str) -> String {
    let mut pattern = String::with_capacity(prefix.len() + 1);
    for c in prefix.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[async_trait]
impl CityStore for SqliteCityStore {
    async fn find_exact(&self, name: &str) -> Result<Option<CoordinateRecord>, CityStoreError> {
        let name = name.to_string();

        self.with_conn(move |conn| {
            conn.query_row(
                "SELECT city_ascii, country, lat, lng FROM cities
                 WHERE city_ascii = ?1 COLLATE NOCASE
                 LIMIT 1",
                params![name],
                |row| {
                    Ok(CoordinateRecord {
                        name: row.get(0)?,
                        country: row.get(1)?,
                        lat: row.get(2)?,
                        lng: row.get(3)?,
                    })
                },
            )
            .optional()
        })
        .await
    }

    async fn search_prefix(
        &self,
        prefix: &str,
        limit: usize,
    ) -> Result<Vec<SuggestionRecord>, CityStoreError> {
        let pattern = like_prefix(prefix);
        let limit = limit as i64;

        self.with_conn(move |conn| {
            let mut stmt = conn.prepare_cached(
                "SELECT city_ascii, country, lat, lng FROM cities
                 WHERE city_ascii LIKE ?1 ESCAPE '\\'
                 ORDER BY population DESC NULLS LAST
                 LIMIT ?2",
            )?;

            let rows = stmt.query_map(params![pattern, limit], |row| {
                Ok(SuggestionRecord {
                    name: row.get(0)?,
                    country: row.get(1)?,
                    lat: row.get(2)?,
                    lng: row.get(3)?,
                })
            })?;

            rows.collect()
        })
        .await
    }
}
