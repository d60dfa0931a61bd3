// SPDX-FileCopyrightText: 2026 Porter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Group conversation identity operations.

use porter_core::PorterError;
use rusqlite::params;

use crate::database::Database;
use crate::models::{GroupAccess, GroupChat, InsertOutcome, UpdateOutcome};

fn row_to_group(row: &rusqlite::Row<'_>) -> Result<GroupChat, rusqlite::Error> {
    let code: i64 = row.get(2)?;
    let access =
        GroupAccess::from_code(code).ok_or(rusqlite::Error::IntegralValueOutOfRange(2, code))?;
    Ok(GroupChat {
        id: row.get(0)?,
        title: row.get(1)?,
        access,
    })
}

/// Find a group conversation by transport chat id.
pub async fn find(db: &Database, id: i64) -> Result<Option<GroupChat>, PorterError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, title, access_level FROM group_chats WHERE id = ?1",
            )?;
            let result = stmt.query_row(params![id], row_to_group);
            match result {
                Ok(group) => Ok(Some(group)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Insert a group unless a record with the same chat id already exists.
pub async fn insert_if_absent(
    db: &Database,
    group: &GroupChat,
) -> Result<InsertOutcome, PorterError> {
    let group = group.clone();
    db.connection()
        .call(move |conn| -> Result<InsertOutcome, rusqlite::Error> {
            let affected = conn.execute(
                "INSERT OR IGNORE INTO group_chats (id, title, access_level)
                 VALUES (?1, ?2, ?3)",
                params![group.id, group.title, group.access.code()],
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

enum RawUpdate {
    Updated,
    NoChange,
    NotFound,
    RowCount(usize),
}

/// Conditionally update a group's access level.
///
/// Read and write share one transaction on the writer thread; concurrent
/// decisions for the same group serialize, last applied wins.
pub async fn set_access(
    db: &Database,
    id: i64,
    level: GroupAccess,
) -> Result<UpdateOutcome, PorterError> {
    let raw = db
        .connection()
        .call(move |conn| -> Result<RawUpdate, rusqlite::Error> {
            let tx = conn.transaction()?;
            let current: Option<i64> = match tx.query_row(
                "SELECT access_level FROM group_chats WHERE id = ?1",
                params![id],
                |row| row.get(0),
            ) {
                Ok(code) => Some(code),
                Err(rusqlite::Error::QueryReturnedNoRows) => None,
                Err(e) => return Err(e),
            };

            let raw = match current {
                None => RawUpdate::NotFound,
                Some(code) if code == level.code() => RawUpdate::NoChange,
                Some(_) => {
                    let affected = tx.execute(
                        "UPDATE group_chats
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
        RawUpdate::RowCount(n) => Err(PorterError::InvariantViolation(format!(
            "access update for group {id} affected {n} rows, expected exactly 1"
        ))),
    }
}
