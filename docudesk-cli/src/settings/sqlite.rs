//! SQLite settings backend.
//!
//! The CLI keeps a handful of keys (session token, UI language), so every row
//! is loaded once when the database is opened. Reads are served from memory;
//! writes go to the database first and update memory only once committed.

use std::path::Path;

use async_sqlite::Client;
use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;

use super::SettingsBackend;
use super::SettingsError;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS preferences (
    key TEXT PRIMARY KEY,
    value BLOB NOT NULL,
    updated_at INTEGER NOT NULL
)";

/// Preferences stored in `preferences(key, value, updated_at)`.
pub struct SqliteBackend {
    client: Client,
    loaded: DashMap<String, Vec<u8>>,
}

impl SqliteBackend {
    /// Opens (or creates) the database at `path` and loads its rows.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let client = async_sqlite::ClientBuilder::new()
            .path(path)
            .open()
            .await?;

        let rows = client
            .conn(|conn| {
                conn.execute(SCHEMA, [])?;
                let mut stmt = conn.prepare("SELECT key, value FROM preferences")?;
                let rows = stmt.query_map([], |row| {
                    Ok((row.get::<_, String>(0)?, row.get::<_, Vec<u8>>(1)?))
                })?;
                rows.collect::<Result<Vec<_>, _>>()
            })
            .await?;

        log::debug!("loaded {} stored preference(s)", rows.len());
        Ok(Self {
            client,
            loaded: rows.into_iter().collect(),
        })
    }
}

#[async_trait]
impl SettingsBackend for SqliteBackend {
    async fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>, SettingsError> {
        Ok(self.loaded.get(key).map(|value| value.clone()))
    }

    async fn set_bytes(&self, key: &str, value: Vec<u8>) -> Result<(), SettingsError> {
        let row = (key.to_string(), value.clone(), Utc::now().timestamp());
        self.client
            .conn(move |conn| {
                conn.execute(
                    "INSERT INTO preferences (key, value, updated_at) VALUES (?1, ?2, ?3)
                     ON CONFLICT(key) DO UPDATE
                     SET value = excluded.value, updated_at = excluded.updated_at",
                    rusqlite::params![row.0, row.1, row.2],
                )
            })
            .await?;

        self.loaded.insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), SettingsError> {
        let key_owned = key.to_string();
        self.client
            .conn(move |conn| conn.execute("DELETE FROM preferences WHERE key = ?1", [key_owned]))
            .await?;

        self.loaded.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn values_survive_reopening() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.db");

        let backend = SqliteBackend::open(&path).await.unwrap();
        backend.set_bytes("ui.language", b"fr".to_vec()).await.unwrap();
        backend.set_bytes("ui.language", b"nl".to_vec()).await.unwrap();
        backend.set_bytes("session.token", vec![1, 2, 3]).await.unwrap();
        drop(backend);

        let backend = SqliteBackend::open(&path).await.unwrap();
        assert_eq!(backend.get_bytes("ui.language").await.unwrap(), Some(b"nl".to_vec()));
        assert_eq!(backend.get_bytes("session.token").await.unwrap(), Some(vec![1, 2, 3]));

        backend.delete("session.token").await.unwrap();
        drop(backend);

        let backend = SqliteBackend::open(&path).await.unwrap();
        assert_eq!(backend.get_bytes("session.token").await.unwrap(), None);
    }

    #[tokio::test]
    async fn fresh_database_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let backend = SqliteBackend::open(dir.path().join("settings.db")).await.unwrap();
        assert_eq!(backend.get_bytes("ui.language").await.unwrap(), None);
    }
}
