//! Maps paths to views and only builds a view after the guard has let the
//! navigation through to it

use std::collections::HashMap;

use bursar_shared::routes::NavTarget;
use tracing::{info, instrument};

use crate::guard::{NavDecision, RouteGuard};

/// What a view is given when it is constructed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavContext {
    /// Where the navigation landed, after any redirect
    pub target: NavTarget,
    /// Set when the login page is shown in place of a protected page
    pub return_to: Option<String>,
}

type ViewFactory<V> = Box<dyn Fn(&NavContext) -> V>;

#[derive(Debug)]
pub enum Resolution<V> {
    Rendered {
        path: String,
        decision: NavDecision,
        view: V,
    },
    /// Nothing is registered for the page the navigation landed on
    NotFound {
        path: String,
        decision: NavDecision,
    },
}

impl<V> Resolution<V> {
    pub fn path(&self) -> &str {
        match self {
            Resolution::Rendered { path, .. } | Resolution::NotFound { path, .. } => path,
        }
    }

    pub fn decision(&self) -> &NavDecision {
        match self {
            Resolution::Rendered { decision, .. } | Resolution::NotFound { decision, .. } => {
                decision
            }
        }
    }

    pub fn view(&self) -> Option<&V> {
        match self {
            Resolution::Rendered { view, .. } => Some(view),
            Resolution::NotFound { .. } => None,
        }
    }
}

pub struct Router<V> {
    guard: RouteGuard,
    views: HashMap<String, ViewFactory<V>>,
    current_path: Option<String>,
}

impl<V> std::fmt::Debug for Router<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("guard", &self.guard)
            .field("views", &self.views.keys().collect::<Vec<_>>())
            .field("current_path", &self.current_path)
            .finish()
    }
}

impl<V> Router<V> {
    pub fn new(guard: RouteGuard) -> Self {
        Self {
            guard,
            views: HashMap::new(),
            current_path: None,
        }
    }

    /// Replaces any view already registered for `path`
    pub fn register<F>(&mut self, path: impl Into<String>, factory: F)
    where
        F: Fn(&NavContext) -> V + 'static,
    {
        self.views.insert(path.into(), Box::new(factory));
    }

    pub fn with_view<F>(mut self, path: impl Into<String>, factory: F) -> Self
    where
        F: Fn(&NavContext) -> V + 'static,
    {
        self.register(path, factory);
        self
    }

    pub fn current_path(&self) -> Option<&str> {
        self.current_path.as_deref()
    }

    #[instrument(skip(self))]
    pub fn navigate(&mut self, full_path: &str) -> Resolution<V> {
        let requested = NavTarget::parse(full_path);
        let decision = self.guard.check(&requested);
        let context = match &decision {
            NavDecision::Allow => NavContext {
                target: requested,
                return_to: None,
            },
            NavDecision::RedirectToLogin { return_to } => NavContext {
                target: NavTarget::parse(
                    &decision
                        .redirect_location()
                        .unwrap_or_else(|| return_to.clone()),
                ),
                return_to: Some(return_to.clone()),
            },
            NavDecision::RedirectToForbidden => NavContext {
                target: NavTarget::parse(decision.destination().unwrap_or_default()),
                return_to: None,
            },
        };
        let path = context.target.path().to_string();
        info!(
            from = self.current_path.as_deref().unwrap_or("<none>"),
            to = context.target.full_path(),
            "{decision}"
        );
        self.current_path = Some(context.target.full_path().to_string());
        match self.views.get(&path) {
            Some(factory) => Resolution::Rendered {
                view: factory(&context),
                path,
                decision,
            },
            None => Resolution::NotFound { path, decision },
        }
    }
}
