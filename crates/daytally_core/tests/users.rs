use daytally_core::db::open_db_in_memory;
use daytally_core::{Principal, SqliteUserRepository, UserRepoError, UserRepository};

#[test]
fn create_and_lookup_by_id_and_username() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteUserRepository::try_new(&conn).unwrap();

    let created = repo.create_user("  alice ").unwrap();
    assert_eq!(created.username, "alice");
    assert!(created.created_at > 0);

    let by_id = repo.find_user_by_id(created.principal).unwrap().unwrap();
    let by_name = repo.find_user_by_username("alice").unwrap().unwrap();
    assert_eq!(by_id, created);
    assert_eq!(by_name, created);
}

#[test]
fn duplicate_username_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteUserRepository::try_new(&conn).unwrap();

    repo.create_user("alice").unwrap();
    let err = repo.create_user("alice").unwrap_err();
    assert!(matches!(err, UserRepoError::DuplicateUsername(name) if name == "alice"));
}

#[test]
fn short_username_is_rejected_before_insert() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteUserRepository::try_new(&conn).unwrap();

    let err = repo.create_user("al").unwrap_err();
    assert!(matches!(err, UserRepoError::InvalidUsername { length: 2 }));
    assert!(repo.find_user_by_username("al").unwrap().is_none());
}

#[test]
fn unknown_users_are_absent() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteUserRepository::try_new(&conn).unwrap();

    assert!(repo.find_user_by_id(Principal::new(99)).unwrap().is_none());
    assert!(repo.find_user_by_username("nobody").unwrap().is_none());
}

#[test]
fn principals_are_distinct_per_user() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteUserRepository::try_new(&conn).unwrap();

    let alice = repo.create_user("alice").unwrap();
    let bob = repo.create_user("bob").unwrap();
    assert_ne!(alice.principal, bob.principal);
}
