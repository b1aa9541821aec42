pub mod show;
pub mod submit;
pub mod user;

use anyhow::{Context, Result};
use daytally_core::db::Connection;
use daytally_core::{Principal, SqliteUserRepository, UserRepository};

/// Resolve the principal for `--user`.
pub fn principal_for(conn: &Connection, username: &str) -> Result<Principal> {
    let users = SqliteUserRepository::try_new(conn)?;
    let user = users
        .find_user_by_username(username)?
        .with_context(|| {
            format!("Unknown user `{username}`. Create it with `daytally user add {username}`")
        })?;
    Ok(user.principal)
}
