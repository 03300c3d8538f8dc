use intern_core::db::open_db_in_memory;
use intern_core::session::SESSION_TOKEN_KEY;
use intern_core::{
    FixedCredentials, KeyValueStore, MemoryKvStore, Session, SessionError, SessionState,
    SqliteKvStore,
};

#[test]
fn fresh_store_starts_unauthenticated() {
    let store = MemoryKvStore::new();
    let session = Session::init(&store, FixedCredentials::default()).unwrap();

    assert_eq!(session.state(), SessionState::Unauthenticated);
    assert!(matches!(
        session.ensure_authenticated(),
        Err(SessionError::NotAuthenticated)
    ));
}

#[test]
fn login_with_valid_credentials_persists_token() {
    let store = MemoryKvStore::new();
    let mut session = Session::init(&store, FixedCredentials::default()).unwrap();

    session.login("admin", "1234").unwrap();
    assert!(session.is_authenticated());
    assert!(store.get(SESSION_TOKEN_KEY).unwrap().is_some());

    let reopened = Session::init(&store, FixedCredentials::default()).unwrap();
    assert_eq!(reopened.state(), SessionState::Authenticated);
}

#[test]
fn login_with_wrong_credentials_leaves_state_unchanged() {
    let store = MemoryKvStore::new();
    let mut session = Session::init(&store, FixedCredentials::default()).unwrap();

    let err = session.login("admin", "wrong").unwrap_err();
    assert!(matches!(err, SessionError::InvalidCredentials));
    assert_eq!(session.state(), SessionState::Unauthenticated);
    assert!(store.is_empty());
}

#[test]
fn logout_removes_token_and_is_repeatable() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteKvStore::try_new(&conn).unwrap();
    let mut session = Session::init(&store, FixedCredentials::new("boss", "pw")).unwrap();

    session.login("boss", "pw").unwrap();
    session.logout().unwrap();
    assert_eq!(session.state(), SessionState::Unauthenticated);
    assert_eq!(store.get(SESSION_TOKEN_KEY).unwrap(), None);

    session.logout().unwrap();
    assert_eq!(session.state(), SessionState::Unauthenticated);
}

#[test]
fn offline_store_surfaces_storage_unavailable() {
    let store = MemoryKvStore::new();
    store.set_offline(true);

    let result = Session::init(&store, FixedCredentials::default());
    assert!(matches!(result, Err(SessionError::StorageUnavailable(_))));
}
