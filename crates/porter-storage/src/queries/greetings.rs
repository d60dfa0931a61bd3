// SPDX-FileCopyrightText: 2026 Porter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Greeting store operations for the `/hi` command.

use porter_core::PorterError;
use rand::Rng;
use rusqlite::params;

use crate::database::Database;

/// Store a greeting line.
pub async fn add(db: &Database, message: &str) -> Result<(), PorterError> {
    let message = message.to_string();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "INSERT INTO greetings (message) VALUES (?1)",
                params![message],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Return a uniformly random stored greeting, or `None` when empty.
pub async fn random(db: &Database) -> Result<Option<String>, PorterError> {
    db.connection()
        .call(|conn| -> Result<Option<String>, rusqlite::Error> {
            let count: i64 =
                conn.query_row("SELECT COUNT(*) FROM greetings", [], |row| row.get(0))?;
            if count == 0 {
                return Ok(None);
            }
            let offset = rand::thread_rng().gen_range(0..count);
            conn.query_row(
                "SELECT message FROM greetings LIMIT 1 OFFSET ?1",
                params![offset],
                |row| row.get(0),
            )
            .map(Some)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap(), true).await.unwrap();
        (db, dir)
    }

    #[tokio::test]
    async fn random_on_empty_store_is_none() {
        let (db, _dir) = setup_db().await;
        assert!(random(&db).await.unwrap().is_none());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn random_returns_a_stored_greeting() {
        let (db, _dir) = setup_db().await;
        add(&db, "Hello there!").await.unwrap();
        add(&db, "Good day.").await.unwrap();

        for _ in 0..10 {
            let greeting = random(&db).await.unwrap().unwrap();
            assert!(greeting == "Hello there!" || greeting == "Good day.");
        }
        db.close().await.unwrap();
    }
}
