//! SQL schema definitions.

/// Complete schema for Shopform v1 database.
///
/// `email` carries an index but no uniqueness constraint: the same contact
/// may be submitted more than once.
pub const SCHEMA_V1: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    mobile_number TEXT NOT NULL,
    whatsapp_number TEXT NOT NULL,
    email TEXT NOT NULL,
    locality TEXT NOT NULL,
    classification TEXT,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_users_email ON users(email);
CREATE INDEX IF NOT EXISTS idx_users_classification ON users(classification);
"#;
