use bursar_client_core::{NavDecision, Resolution, Router};
use bursar_shared::{
    const_config::path::{
        PAGE_FORBIDDEN, PAGE_INDICATOR, PAGE_INVOICE, PAGE_LOGIN, PAGE_STUDENT,
    },
    routes::NavTarget,
};

use crate::helpers::spawn_app;

#[tokio::test]
async fn navigation_follows_login_and_logout() {
    // Arrange
    let mut app = spawn_app().await;
    let guard = app.guard();
    let target = NavTarget::parse("/student?id=4");

    // Assert - Not logged in
    assert_eq!(
        guard.check(&target),
        NavDecision::RedirectToLogin {
            return_to: "/student?id=4".to_string()
        }
    );

    // Act - Login
    app.login_as("admin").await.unwrap();

    // Assert - Same guard sees the new session
    assert_eq!(guard.check(&target), NavDecision::Allow);

    // Act - Logout
    app.store.logout();

    // Assert
    assert!(matches!(
        guard.check(&target),
        NavDecision::RedirectToLogin { .. }
    ));
}

#[tokio::test]
async fn accountant_only_reaches_indicator() {
    // Arrange
    let mut app = spawn_app().await;
    app.login_as("accountant").await.unwrap();
    let guard = app.guard();

    // Act
    let indicator = guard.check(&PAGE_INDICATOR.into());
    let invoice = guard.check(&PAGE_INVOICE.into());
    let login = guard.check(&PAGE_LOGIN.into());

    // Assert
    assert_eq!(indicator, NavDecision::Allow);
    assert_eq!(invoice, NavDecision::RedirectToForbidden);
    assert_eq!(login, NavDecision::Allow);
}

#[tokio::test]
async fn router_renders_login_then_requested_page() {
    // Arrange
    let mut app = spawn_app().await;
    let mut router = Router::new(app.guard())
        .with_view(PAGE_LOGIN, |ctx| format!("login form, then {:?}", ctx.return_to))
        .with_view(PAGE_FORBIDDEN, |_| "forbidden".to_string())
        .with_view(PAGE_STUDENT, |ctx| format!("students {}", ctx.target.full_path()));

    // Act - Before login
    let before = router.navigate("/student?page=3");

    // Assert
    assert_eq!(before.path(), PAGE_LOGIN);
    assert_eq!(
        before.view().map(String::as_str),
        Some(r#"login form, then Some("/student?page=3")"#)
    );

    // Act - Login and retry
    app.login_as("backend").await.unwrap();
    let after = router.navigate("/student?page=3");

    // Assert
    match after {
        Resolution::Rendered { view, decision, .. } => {
            assert_eq!(view, "students /student?page=3");
            assert!(decision.is_allow());
        }
        other => panic!("expected the student view but got {other:?}"),
    }
}
