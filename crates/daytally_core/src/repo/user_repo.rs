//! User directory contracts and SQLite implementation.
//!
//! # Responsibility
//! - Register principals under a unique username.
//! - Resolve principals by id or username for the request layer.
//!
//! # Invariants
//! - Usernames are trimmed and must be 3..=1024 characters long.
//! - Usernames are unique; duplicates surface as `DuplicateUsername`.
//! - Credentials are not stored here.

use crate::db::{ensure_migrated, DbError};
use crate::model::entry::Principal;
use crate::repo::is_unique_violation;
use rusqlite::{params, Connection, Row, ToSql};
use std::error::Error;
use std::fmt::{Display, Formatter};

const USERNAME_MIN_CHARS: usize = 3;
const USERNAME_MAX_CHARS: usize = 1024;

pub type UserRepoResult<T> = Result<T, UserRepoError>;

/// Errors from user directory operations.
#[derive(Debug)]
pub enum UserRepoError {
    /// Username is too short or too long after trimming.
    InvalidUsername { length: usize },
    /// Another user already holds this username.
    DuplicateUsername(String),
    Db(DbError),
    InvalidData(String),
}

impl Display for UserRepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidUsername { length } => write!(
                f,
                "username must be {USERNAME_MIN_CHARS}..={USERNAME_MAX_CHARS} characters, got {length}"
            ),
            Self::DuplicateUsername(username) => write!(f, "username already taken: `{username}`"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted user data: {message}"),
        }
    }
}

impl Error for UserRepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for UserRepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for UserRepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Registered user read model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub principal: Principal,
    pub username: String,
    /// Epoch ms creation timestamp.
    pub created_at: i64,
}

/// Repository interface for user lookups and registration.
pub trait UserRepository {
    fn create_user(&self, username: &str) -> UserRepoResult<UserRecord>;
    fn find_user_by_id(&self, principal: Principal) -> UserRepoResult<Option<UserRecord>>;
    fn find_user_by_username(&self, username: &str) -> UserRepoResult<Option<UserRecord>>;
}

/// SQLite-backed user directory.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    /// Wraps a connection after checking it is fully migrated.
    pub fn try_new(conn: &'conn Connection) -> UserRepoResult<Self> {
        ensure_migrated(conn)?;
        Ok(Self { conn })
    }

    fn find_one(
        &self,
        filter_sql: &str,
        param: &dyn ToSql,
    ) -> UserRepoResult<Option<UserRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT id, username, created_at FROM users WHERE {filter_sql};"
        ))?;
        let mut rows = stmt.query([param])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_user_row(row)?));
        }
        Ok(None)
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn create_user(&self, username: &str) -> UserRepoResult<UserRecord> {
        let username = normalize_username(username)?;

        let result = self.conn.execute(
            "INSERT INTO users (username) VALUES (?1);",
            params![username.as_str()],
        );
        match result {
            Ok(_) => {}
            Err(err) if is_unique_violation(&err) => {
                return Err(UserRepoError::DuplicateUsername(username));
            }
            Err(err) => return Err(err.into()),
        }

        let principal = Principal::new(self.conn.last_insert_rowid());
        self.find_user_by_id(principal)?.ok_or_else(|| {
            UserRepoError::InvalidData(format!("user {principal} missing after insert"))
        })
    }

    fn find_user_by_id(&self, principal: Principal) -> UserRepoResult<Option<UserRecord>> {
        self.find_one("id = ?1", &principal.id())
    }

    fn find_user_by_username(&self, username: &str) -> UserRepoResult<Option<UserRecord>> {
        self.find_one("username = ?1", &username.trim())
    }
}

/// Trims and length-checks a username.
pub fn normalize_username(username: &str) -> UserRepoResult<String> {
    let trimmed = username.trim();
    let length = trimmed.chars().count();
    if !(USERNAME_MIN_CHARS..=USERNAME_MAX_CHARS).contains(&length) {
        return Err(UserRepoError::InvalidUsername { length });
    }
    Ok(trimmed.to_string())
}

fn parse_user_row(row: &Row<'_>) -> UserRepoResult<UserRecord> {
    let username: String = row.get("username")?;
    if normalize_username(&username).is_err() {
        return Err(UserRepoError::InvalidData(format!(
            "username of length {} in users.username",
            username.chars().count()
        )));
    }

    Ok(UserRecord {
        principal: Principal::new(row.get("id")?),
        username,
        created_at: row.get("created_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::{normalize_username, UserRepoError};

    #[test]
    fn normalize_username_trims_and_checks_length() {
        assert_eq!(normalize_username("  alice ").unwrap(), "alice");
        assert!(matches!(
            normalize_username(" ab "),
            Err(UserRepoError::InvalidUsername { length: 2 })
        ));
        let long = "x".repeat(1025);
        assert!(matches!(
            normalize_username(&long),
            Err(UserRepoError::InvalidUsername { length: 1025 })
        ));
    }
}
