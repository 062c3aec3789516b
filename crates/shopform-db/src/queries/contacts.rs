//! Contact (`users` table) query functions.

use rusqlite::{Connection, ErrorCode, Row};
use shopform_types::{ContactDetails, ContactRecord};

use crate::{DbError, Result};

const SELECT_COLUMNS: &str = "SELECT id, name, mobile_number, whatsapp_number, email, locality,
        classification, created_at, updated_at
 FROM users";

/// Insert a new contact with an empty classification.
///
/// Returns the generated row identifier.
pub fn insert(conn: &Connection, details: &ContactDetails, created_at: u64) -> Result<i64> {
    conn.execute(
        "INSERT INTO users (name, mobile_number, whatsapp_number, email, locality,
                            classification, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, NULL, ?6, ?6)",
        rusqlite::params![
            details.name,
            details.mobile_number,
            details.whatsapp_number,
            details.email,
            details.locality,
            created_at as i64,
        ],
    )
    .map_err(|e| match e.sqlite_error_code() {
        Some(ErrorCode::ConstraintViolation) => DbError::Constraint(e.to_string()),
        _ => DbError::Sqlite(e),
    })?;
    Ok(conn.last_insert_rowid())
}

/// Get a contact by id.
pub fn get(conn: &Connection, id: i64) -> Result<ContactRecord> {
    conn.query_row(&format!("{SELECT_COLUMNS} WHERE id = ?1"), [id], map_row)
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => DbError::NotFound(format!("user {id}")),
            other => DbError::Sqlite(other),
        })
}

/// Set the classification of an existing contact.
///
/// Fails with [`DbError::NotFound`] when no row has the given id.
pub fn set_classification(
    conn: &Connection,
    id: i64,
    classification: &str,
    updated_at: u64,
) -> Result<()> {
    let changed = conn.execute(
        "UPDATE users SET classification = ?1, updated_at = ?2 WHERE id = ?3",
        rusqlite::params![classification, updated_at as i64, id],
    )?;
    if changed == 0 {
        return Err(DbError::NotFound(format!("user {id}")));
    }
    Ok(())
}

/// List all contacts in insertion order.
pub fn list(conn: &Connection) -> Result<Vec<ContactRecord>> {
    let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} ORDER BY id"))?;
    let rows = stmt
        .query_map([], map_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// All contacts sharing an email address. Email is not unique.
pub fn find_by_email(conn: &Connection, email: &str) -> Result<Vec<ContactRecord>> {
    let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} WHERE email = ?1 ORDER BY id"))?;
    let rows = stmt
        .query_map([email], map_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Number of stored contacts.
pub fn count(conn: &Connection) -> Result<u64> {
    let n: i64 = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
    Ok(n as u64)
}

fn map_row(row: &Row<'_>) -> rusqlite::Result<ContactRecord> {
    Ok(ContactRecord {
        id: row.get(0)?,
        details: ContactDetails {
            name: row.get(1)?,
            mobile_number: row.get(2)?,
            whatsapp_number: row.get(3)?,
            email: row.get(4)?,
            locality: row.get(5)?,
        },
        classification: row.get(6)?,
        created_at: row.get::<_, i64>(7)? as u64,
        updated_at: row.get::<_, i64>(8)? as u64,
    })
}
