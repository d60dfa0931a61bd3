// SPDX-FileCopyrightText: 2026 Porter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Individual identity operations.
//!
//! The owner slot is protected three ways: `claim_owner` is a single
//! conditional insert, `set_access` evaluates the owner guard inside the
//! transaction that performs the write, and a partial unique index on the
//! owner level backstops both at the engine level.

use porter_core::PorterError;
use rusqlite::params;

use crate::database::Database;
use crate::models::{Individual, IndividualAccess, InsertOutcome, UpdateOutcome, UserProfile};

fn row_to_individual(row: &rusqlite::Row<'_>) -> Result<Individual, rusqlite::Error> {
    let code: i64 = row.get(4)?;
    let access = IndividualAccess::from_code(code)
        .ok_or(rusqlite::Error::IntegralValueOutOfRange(4, code))?;
    Ok(Individual {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        username: row.get(3)?,
        access,
    })
}

/// Find an individual by transport id.
pub async fn find(db: &Database, id: i64) -> Result<Option<Individual>, PorterError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, first_name, last_name, username, access_level
                 FROM individuals WHERE id = ?1",
            )?;
            let result = stmt.query_row(params![id], row_to_individual);
            match result {
                Ok(individual) => Ok(Some(individual)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Insert an individual unless a record with the same id already exists.
///
/// `INSERT OR IGNORE` on the primary key gives first-writer-wins; concurrent
/// calls are serialized by the single writer thread, so exactly one caller
/// observes `Inserted`.
pub async fn insert_if_absent(
    db: &Database,
    individual: &Individual,
) -> Result<InsertOutcome, PorterError> {
    let individual = individual.clone();
    db.connection()
        .call(move |conn| -> Result<InsertOutcome, rusqlite::Error> {
            let affected = conn.execute(
                "INSERT OR IGNORE INTO individuals
                     (id, first_name, last_name, username, access_level)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    individual.id,
                    individual.first_name,
                    individual.last_name,
                    individual.username,
                    individual.access.code(),
                ],
            )?;
            Ok(if affected == 1 {
                InsertOutcome::Inserted
            } else {
                InsertOutcome::AlreadyExists
            })
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Number of stored individuals.
pub async fn count(db: &Database) -> Result<i64, PorterError> {
    db.connection()
        .call(|conn| -> Result<i64, rusqlite::Error> {
            conn.query_row("SELECT COUNT(*) FROM individuals", [], |row| row.get(0))
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Find the single owner, if one has been bootstrapped.
pub async fn find_owner(db: &Database) -> Result<Option<Individual>, PorterError> {
    db.connection()
        .call(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, first_name, last_name, username, access_level
                 FROM individuals WHERE access_level = ?1",
            )?;
            let result = stmt.query_row(params![IndividualAccess::Owner.code()], row_to_individual);
            match result {
                Ok(owner) => Ok(Some(owner)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Atomically claim the owner slot for `profile`.
///
/// One conditional statement: the insert happens only when no owner row
/// exists, so two simultaneous first contacts cannot both become owner.
/// Returns `true` when this call created the owner.
pub async fn claim_owner(db: &Database, profile: &UserProfile) -> Result<bool, PorterError> {
    let profile = profile.clone();
    db.connection()
        .call(move |conn| -> Result<bool, rusqlite::Error> {
            let affected = conn.execute(
                "INSERT OR IGNORE INTO individuals
                     (id, first_name, last_name, username, access_level)
                 SELECT ?1, ?2, ?3, ?4, ?5
                 WHERE NOT EXISTS
                     (SELECT 1 FROM individuals WHERE access_level = ?5)",
                params![
                    profile.id,
                    profile.first_name,
                    profile.last_name,
                    profile.username,
                    IndividualAccess::Owner.code(),
                ],
            )?;
            Ok(affected == 1)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

enum RawUpdate {
    Updated,
    NoChange,
    NotFound,
    OwnerGuard,
    RowCount(usize),
}

/// Conditionally update an individual's access level.
///
/// The current-level read, the owner guard, and the write happen inside one
/// transaction on the writer thread, so a concurrent decision cannot slip a
/// demotion past the guard. `Owner` is never a valid target level.
pub async fn set_access(
    db: &Database,
    id: i64,
    level: IndividualAccess,
) -> Result<UpdateOutcome, PorterError> {
    if level == IndividualAccess::Owner {
        return Err(PorterError::InvariantViolation(format!(
            "refusing to set individual {id} to owner; the owner slot is claimed at bootstrap only"
        )));
    }

    let raw = db
        .connection()
        .call(move |conn| -> Result<RawUpdate, rusqlite::Error> {
            let tx = conn.transaction()?;
            let current: Option<i64> = match tx.query_row(
                "SELECT access_level FROM individuals WHERE id = ?1",
                params![id],
                |row| row.get(0),
            ) {
                Ok(code) => Some(code),
                Err(rusqlite::Error::QueryReturnedNoRows) => None,
                Err(e) => return Err(e),
            };

            let raw = match current {
                None => RawUpdate::NotFound,
                Some(code) if code == IndividualAccess::Owner.code() => RawUpdate::OwnerGuard,
                Some(code) if code == level.code() => RawUpdate::NoChange,
                Some(_) => {
                    let affected = tx.execute(
                        "UPDATE individuals
                         SET access_level = ?1,
                             updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                         WHERE id = ?2",
                        params![level.code(), id],
                    )?;
                    if affected == 1 {
                        RawUpdate::Updated
                    } else {
                        RawUpdate::RowCount(affected)
                    }
                }
            };
            tx.commit()?;
            Ok(raw)
        })
        .await
        .map_err(crate::database::map_tr_err)?;

    match raw {
        RawUpdate::Updated => Ok(UpdateOutcome::Updated),
        RawUpdate::NoChange => Ok(UpdateOutcome::NoChange),
        RawUpdate::NotFound => Ok(UpdateOutcome::NotFound),
        RawUpdate::OwnerGuard => Err(PorterError::InvariantViolation(format!(
            "individual {id} holds the owner level; its access is immutable"
        ))),
        RawUpdate::RowCount(n) => Err(PorterError::InvariantViolation(format!(
            "access update for individual {id} affected {n} rows, expected exactly 1"
        ))),
    }
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

    fn profile(id: i64, first_name: &str) -> UserProfile {
        UserProfile {
            id,
            first_name: first_name.to_string(),
            last_name: None,
            username: None,
        }
    }

    fn pending(id: i64, first_name: &str) -> Individual {
        Individual {
            id,
            first_name: first_name.to_string(),
            last_name: Some("Tester".to_string()),
            username: Some("tester".to_string()),
            access: IndividualAccess::Unprocessed,
        }
    }

    #[tokio::test]
    async fn insert_and_find_round_trips() {
        let (db, _dir) = setup_db().await;

        let outcome = insert_if_absent(&db, &pending(42, "Ada")).await.unwrap();
        assert_eq!(outcome, InsertOutcome::Inserted);

        let found = find(&db, 42).await.unwrap().unwrap();
        assert_eq!(found.first_name, "Ada");
        assert_eq!(found.last_name.as_deref(), Some("Tester"));
        assert_eq!(found.access, IndividualAccess::Unprocessed);

        assert!(find(&db, 99).await.unwrap().is_none());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn insert_if_absent_never_overwrites() {
        let (db, _dir) = setup_db().await;

        insert_if_absent(&db, &pending(42, "Ada")).await.unwrap();

        let mut imposter = pending(42, "Eve");
        imposter.access = IndividualAccess::Allowed;
        let outcome = insert_if_absent(&db, &imposter).await.unwrap();
        assert_eq!(outcome, InsertOutcome::AlreadyExists);

        let found = find(&db, 42).await.unwrap().unwrap();
        assert_eq!(found.first_name, "Ada");
        assert_eq!(found.access, IndividualAccess::Unprocessed);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn claim_owner_first_contact_wins() {
        let (db, _dir) = setup_db().await;

        assert!(claim_owner(&db, &profile(42, "Ada")).await.unwrap());
        let owner = find_owner(&db).await.unwrap().unwrap();
        assert_eq!(owner.id, 42);
        assert_eq!(owner.access, IndividualAccess::Owner);

        // A second claim by someone else must lose.
        assert!(!claim_owner(&db, &profile(99, "Eve")).await.unwrap());
        assert!(find(&db, 99).await.unwrap().is_none());
        assert_eq!(find_owner(&db).await.unwrap().unwrap().id, 42);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn concurrent_claims_produce_exactly_one_owner() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("race.db");
        let db = std::sync::Arc::new(
            Database::open(db_path.to_str().unwrap(), true).await.unwrap(),
        );

        let mut handles = Vec::new();
        for i in 0..10i64 {
            let db = db.clone();
            handles.push(tokio::spawn(async move {
                claim_owner(&db, &profile(1000 + i, "Racer")).await.unwrap()
            }));
        }

        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap() {
                winners += 1;
            }
        }
        assert_eq!(winners, 1, "exactly one concurrent claim may win");
        assert_eq!(count(&db).await.unwrap(), 1);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn set_access_transitions_pending_individual() {
        let (db, _dir) = setup_db().await;
        insert_if_absent(&db, &pending(99, "Eve")).await.unwrap();

        let outcome = set_access(&db, 99, IndividualAccess::Allowed).await.unwrap();
        assert_eq!(outcome, UpdateOutcome::Updated);
        assert_eq!(
            find(&db, 99).await.unwrap().unwrap().access,
            IndividualAccess::Allowed
        );

        // Same level again is a no-op.
        let outcome = set_access(&db, 99, IndividualAccess::Allowed).await.unwrap();
        assert_eq!(outcome, UpdateOutcome::NoChange);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn set_access_missing_target_is_not_found() {
        let (db, _dir) = setup_db().await;
        let outcome = set_access(&db, 12345, IndividualAccess::Blocked).await.unwrap();
        assert_eq!(outcome, UpdateOutcome::NotFound);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn set_access_never_alters_the_owner() {
        let (db, _dir) = setup_db().await;
        claim_owner(&db, &profile(42, "Ada")).await.unwrap();

        for level in [
            IndividualAccess::Unprocessed,
            IndividualAccess::Allowed,
            IndividualAccess::Blocked,
        ] {
            let err = set_access(&db, 42, level).await.unwrap_err();
            assert!(matches!(err, PorterError::InvariantViolation(_)));
        }
        assert_eq!(
            find(&db, 42).await.unwrap().unwrap().access,
            IndividualAccess::Owner
        );
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn set_access_refuses_owner_promotion() {
        let (db, _dir) = setup_db().await;
        insert_if_absent(&db, &pending(99, "Eve")).await.unwrap();

        let err = set_access(&db, 99, IndividualAccess::Owner).await.unwrap_err();
        assert!(matches!(err, PorterError::InvariantViolation(_)));
        assert_eq!(
            find(&db, 99).await.unwrap().unwrap().access,
            IndividualAccess::Unprocessed
        );
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn owner_index_rejects_second_owner_row() {
        let (db, _dir) = setup_db().await;
        claim_owner(&db, &profile(42, "Ada")).await.unwrap();

        // Bypass the query layer: even a raw insert cannot create a second
        // owner thanks to the partial unique index.
        let result = db
            .connection()
            .call(|conn| -> Result<usize, rusqlite::Error> {
                conn.execute(
                    "INSERT INTO individuals (id, first_name, access_level)
                     VALUES (666, 'Mallory', 1)",
                    [],
                )
            })
            .await;
        assert!(result.is_err(), "partial unique index must reject a second owner");
        db.close().await.unwrap();
    }
}
