use bursar_client_core::{MemoryStorage, SessionStorage};
use bursar_shared::{
    const_config::storage::{STORAGE_KEY_IDENTITY, STORAGE_KEY_TOKEN},
    uac::AuthError,
};

use crate::helpers::{no_cb, spawn_app, spawn_app_with_storage, DETAIL_BAD_TOKEN};

#[tokio::test]
async fn fetch_profile_uses_session_token() {
    // Arrange
    let mut app = spawn_app().await;
    let logged_in_as = app.login_as("accountant").await.unwrap();

    // Act
    let identity = app.fetch_profile().await.unwrap();

    // Assert
    assert_eq!(identity, logged_in_as);
    assert_eq!(
        app.store.session().token().expose_secret(),
        "token-accountant"
    );
}

#[tokio::test]
async fn fetch_profile_with_rejected_token_keeps_session() {
    // Arrange
    let mut storage = MemoryStorage::new();
    storage
        .set_item(STORAGE_KEY_TOKEN, "token-from-last-week")
        .unwrap();
    storage
        .set_item(
            STORAGE_KEY_IDENTITY,
            r#"{"id":1,"username":"admin","groups":[1]}"#,
        )
        .unwrap();
    let mut app = spawn_app_with_storage(storage).await;
    let before = app.store.session();

    // Act
    let outcome = app.fetch_profile().await;

    // Assert
    match outcome {
        Err(AuthError::TokenRejected(detail)) => assert_eq!(detail, DETAIL_BAD_TOKEN),
        other => panic!("expected token rejection but got {other:?}"),
    }
    let after = app.store.session();
    assert_eq!(after.identity(), before.identity());
    assert_eq!(after.token().expose_secret(), "token-from-last-week");
}

#[tokio::test]
async fn fetch_profile_without_login_sends_nothing() {
    // Arrange
    let mut app = spawn_app().await;

    // Act
    let outcome = app.fetch_profile().await;

    // Assert
    assert!(matches!(outcome, Err(AuthError::NotLoggedIn)));
}

#[tokio::test]
async fn current_user_without_token_has_no_bearer() {
    // Arrange
    let app = spawn_app().await;

    // Act
    let outcome = app.client.send_current_user(no_cb).await.unwrap();

    // Assert
    assert!(
        matches!(outcome, Err(AuthError::TokenRejected(_))),
        "got {outcome:?}"
    );
}
