use pushkind_dashboard::domain::types::{UserEmail, UserName};
use pushkind_dashboard::domain::user::NewUser;
use pushkind_dashboard::repository::{DieselRepository, UserReader, UserWriter};

mod common;

fn new_user(email: &str, name: Option<&str>, hash: &str) -> NewUser {
    NewUser::new(
        UserEmail::new(email).unwrap(),
        name.map(|n| UserName::new(n).unwrap()),
        Some("admin".to_string()),
        hash.to_string(),
    )
}

#[test]
fn test_user_repository_create_and_lookup() {
    let test_db = common::TestDb::new("test_user_repository_create_and_lookup.db");
    let repo = DieselRepository::new(test_db.pool());

    let created = repo
        .create_or_update_user(&new_user("Ann@Example.com", Some("Ann Lee"), "hash-1"))
        .unwrap();
    assert_eq!(created.email.as_str(), "ann@example.com");
    assert_eq!(created.name.as_ref().map(|n| n.as_str()), Some("Ann Lee"));

    let found = repo
        .get_user_by_email(&UserEmail::new("ann@example.com").unwrap())
        .unwrap()
        .unwrap();
    assert_eq!(found.id, created.id);
    assert_eq!(found.password_hash, "hash-1");

    let missing = repo
        .get_user_by_email(&UserEmail::new("bob@example.com").unwrap())
        .unwrap();
    assert!(missing.is_none());
}

#[test]
fn test_user_repository_upsert_by_email() {
    let test_db = common::TestDb::new("test_user_repository_upsert_by_email.db");
    let repo = DieselRepository::new(test_db.pool());

    let first = repo
        .create_or_update_user(&new_user("ann@example.com", None, "hash-1"))
        .unwrap();
    let second = repo
        .create_or_update_user(&new_user("ann@example.com", Some("Ann"), "hash-2"))
        .unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(second.password_hash, "hash-2");
    assert_eq!(repo.list_users().unwrap().len(), 1);
}

#[test]
fn test_user_repository_list() {
    let test_db = common::TestDb::new("test_user_repository_list.db");
    let repo = DieselRepository::new(test_db.pool());
    assert!(repo.list_users().unwrap().is_empty());

    repo.create_or_update_user(&new_user("ann@example.com", Some("Ann"), "h"))
        .unwrap();
    repo.create_or_update_user(&new_user("bob@example.com", Some("Bob"), "h"))
        .unwrap();

    let emails: Vec<String> = repo
        .list_users()
        .unwrap()
        .into_iter()
        .map(|u| u.email.into_inner())
        .collect();
    assert_eq!(emails, vec!["bob@example.com", "ann@example.com"]);
}
