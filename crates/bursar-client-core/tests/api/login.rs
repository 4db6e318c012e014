use bursar_client_core::SessionStorage;
use bursar_shared::{
    const_config::storage::{STORAGE_KEY_IDENTITY, STORAGE_KEY_TOKEN},
    id::GroupId,
    req_args::LoginReqArgs,
    uac::{AuthError, Identity},
};

use crate::helpers::{
    build_client, no_cb, spawn_app, unused_address, DETAIL_LOCKED, PASSWORD,
};

#[tokio::test]
async fn login_success_sets_and_persists_session() {
    // Arrange
    let mut app = spawn_app().await;

    // Act
    let identity = app.login_as("admin").await.unwrap();

    // Assert
    assert_eq!(identity.username.as_ref(), "admin");
    assert_eq!(identity.groups, vec![GroupId::from(1)]);
    let session = app.store.session();
    assert!(session.is_admin());
    assert_eq!(session.token().expose_secret(), "token-admin");
    assert_eq!(
        app.store
            .storage()
            .get_item(STORAGE_KEY_TOKEN)
            .unwrap()
            .as_deref(),
        Some("token-admin")
    );
    let persisted = app.store.storage().get_item(STORAGE_KEY_IDENTITY).unwrap();
    assert_eq!(Identity::from_json(&persisted.unwrap()).unwrap(), identity);
}

#[tokio::test]
async fn login_failure_invalid_user() {
    // Arrange
    let mut app = spawn_app().await;

    // Act
    let outcome = app.login_as("random-username").await;

    // Assert
    assert_eq!(
        outcome.unwrap_err().to_string(),
        AuthError::InvalidUserOrPassword.to_string()
    );
    assert!(!app.store.session().is_authenticated());
    assert!(app.store.storage().is_empty());
}

#[tokio::test]
async fn login_failure_keeps_previous_session() {
    // Arrange
    let mut app = spawn_app().await;
    app.login_as("backend").await.unwrap();

    // Act
    let outcome = app.login_with("admin", "random-password").await;

    // Assert
    assert!(matches!(outcome, Err(AuthError::InvalidUserOrPassword)));
    let session = app.store.session();
    assert_eq!(session.token().expose_secret(), "token-backend");
    assert!(session.is_backend_user());
    assert!(!session.is_admin());
}

#[tokio::test]
async fn login_other_refusal_carries_status_and_detail() {
    // Arrange
    let mut app = spawn_app().await;

    // Act
    let outcome = app.login_as("locked").await;

    // Assert
    match outcome {
        Err(AuthError::Rejected { status, detail }) => {
            assert_eq!(status, 403);
            assert_eq!(detail, DETAIL_LOCKED);
        }
        other => panic!("expected rejection but got {other:?}"),
    }
    assert!(!app.store.session().is_authenticated());
}

#[tokio::test]
async fn login_without_groups_is_treated_as_accountant() {
    // Arrange
    let mut app = spawn_app().await;

    // Act
    let identity = app.login_as("legacy").await.unwrap();

    // Assert
    assert!(identity.groups.is_empty());
    assert!(app.store.session().is_accountant());
}

#[tokio::test]
async fn unreachable_service_is_transport_error() {
    // Arrange
    let mut app = spawn_app().await;
    app.client = build_client(&unused_address(), &app.store);

    // Act
    let outcome = app.login_as("admin").await;

    // Assert
    let err = outcome.unwrap_err();
    assert!(matches!(err, AuthError::Transport(_)), "got {err:?}");
    assert!(!err.is_rejection());
    assert!(!app.store.session().is_authenticated());
}

#[tokio::test]
async fn send_login_notifies_and_leaves_session_alone() {
    // Arrange
    let app = spawn_app().await;
    let args = LoginReqArgs::new("accountant", PASSWORD.to_string().into());

    // Act
    let response = app.client.send_login(&args, no_cb).await.unwrap().unwrap();

    // Assert
    assert_eq!(response.access_token.expose_secret(), "token-accountant");
    assert_eq!(response.token_type.as_deref(), Some("bearer"));
    assert_eq!(response.user.groups, vec![GroupId::from(3)]);
    assert!(
        !app.store.session().is_authenticated(),
        "only the store changes the session"
    );
}
