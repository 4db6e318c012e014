use std::{fmt::Display, sync::Arc};

use bursar_shared::{
    const_config::{
        path::{PAGE_FORBIDDEN, PAGE_LOGIN},
        query::QUERY_REDIRECT,
    },
    internal_error,
    routes::{NavTarget, RoutePolicy},
    session::Session,
};
use tracing::instrument;

use crate::SessionHandle;

/// Outcome of checking one navigation
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavDecision {
    Allow,
    /// `return_to` is the full path that was requested, query included
    RedirectToLogin {
        return_to: String,
    },
    RedirectToForbidden,
}

impl NavDecision {
    pub fn is_allow(&self) -> bool {
        matches!(self, Self::Allow)
    }

    /// The page that ends up being shown, `None` means the requested one
    pub fn destination(&self) -> Option<&'static str> {
        match self {
            NavDecision::Allow => None,
            NavDecision::RedirectToLogin { .. } => Some(PAGE_LOGIN),
            NavDecision::RedirectToForbidden => Some(PAGE_FORBIDDEN),
        }
    }

    /// Location to navigate to instead of the requested page, e.g.
    /// `/login?redirect=%2Fstudent%3Fid%3D4`
    pub fn redirect_location(&self) -> Option<String> {
        match self {
            NavDecision::Allow => None,
            NavDecision::RedirectToLogin { return_to } => Some(login_location(return_to)),
            NavDecision::RedirectToForbidden => Some(PAGE_FORBIDDEN.to_string()),
        }
    }
}

impl Display for NavDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.redirect_location() {
            None => write!(f, "ALLOW"),
            Some(location) => write!(f, "REDIRECT {location}"),
        }
    }
}

fn login_location(return_to: &str) -> String {
    match reqwest::Url::parse_with_params(
        &format!("http://localhost{PAGE_LOGIN}"),
        &[(QUERY_REDIRECT, return_to)],
    ) {
        Ok(url) => format!("{}?{}", url.path(), url.query().unwrap_or_default()),
        Err(e) => {
            internal_error!(format!("failed to build login location: {e}"));
            PAGE_LOGIN.to_string()
        }
    }
}

/// Decides a navigation. Every target has an outcome, a path missing from the
/// policy does not require authentication
pub fn decide(target: &NavTarget, policy: &RoutePolicy, session: &Session) -> NavDecision {
    let path = target.path();
    if RoutePolicy::is_always_public(path) || !policy.requires_auth(path) {
        return NavDecision::Allow;
    }
    if !session.is_authenticated() {
        return NavDecision::RedirectToLogin {
            return_to: target.full_path().to_string(),
        };
    }
    if session.can_access_page(path, policy) {
        NavDecision::Allow
    } else {
        NavDecision::RedirectToForbidden
    }
}

/// Checks navigations against the shared session
#[derive(Debug, Clone)]
pub struct RouteGuard {
    policy: Arc<RoutePolicy>,
    session: SessionHandle,
}

impl RouteGuard {
    pub fn new(policy: Arc<RoutePolicy>, session: SessionHandle) -> Self {
        Self { policy, session }
    }

    #[instrument(skip(self, target), fields(target = target.full_path()), ret(Display))]
    pub fn check(&self, target: &NavTarget) -> NavDecision {
        self.session
            .with(|session| decide(target, &self.policy, session))
    }
}
