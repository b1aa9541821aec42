use anyhow::Result;
use daytally_core::db::Connection;
use daytally_core::{SqliteUserRepository, UserRepository};

pub fn add(conn: &Connection, username: &str) -> Result<()> {
    let users = SqliteUserRepository::try_new(conn)?;
    let user = users.create_user(username)?;
    println!("Created user `{}` (id {})", user.username, user.principal);
    Ok(())
}
