use strum::IntoEnumIterator;

use crate::{
    id::GroupId,
    routes::RoutePolicy,
    token::AuthToken,
    uac::{Identity, PermissionRule, Role, GROUP_ACCOUNTANT, GROUP_ADMIN, GROUP_BACKEND_USER},
};

/// The credential and identity of the current user.
///
/// Every role predicate is derived from the identity's groups on each call,
/// nothing derived is stored.
#[derive(Debug, Clone, Default)]
pub struct Session {
    token: AuthToken,
    identity: Option<Identity>,
}

impl Session {
    pub fn new(token: AuthToken, identity: Option<Identity>) -> Self {
        Self { token, identity }
    }

    pub fn token(&self) -> &AuthToken {
        &self.token
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    /// Replaces both the token and the identity
    pub fn set_credentials(&mut self, token: AuthToken, identity: Identity) {
        self.token = token;
        self.identity = Some(identity);
    }

    /// Replaces the identity and leaves the token as is
    pub fn set_identity(&mut self, identity: Identity) {
        self.identity = Some(identity);
    }

    pub fn clear(&mut self) {
        self.token = AuthToken::empty();
        self.identity = None;
    }

    pub fn is_authenticated(&self) -> bool {
        !self.token.is_empty()
    }

    /// Empty when there is no identity
    pub fn user_groups(&self) -> &[GroupId] {
        self.identity
            .as_ref()
            .map(|identity| &identity.groups[..])
            .unwrap_or_default()
    }

    pub fn is_admin(&self) -> bool {
        self.user_groups().contains(&GROUP_ADMIN)
    }

    pub fn is_backend_user(&self) -> bool {
        self.user_groups().contains(&GROUP_BACKEND_USER)
    }

    /// Also true when the user has no groups at all (including when there is
    /// no identity)
    pub fn is_accountant(&self) -> bool {
        let groups = self.user_groups();
        groups.contains(&GROUP_ACCOUNTANT) || groups.is_empty()
    }

    pub fn has_role(&self, role: Role) -> bool {
        match role {
            Role::Admin => self.is_admin(),
            Role::BackendUser => self.is_backend_user(),
            Role::Accountant => self.is_accountant(),
        }
    }

    pub fn roles(&self) -> Vec<Role> {
        Role::iter().filter(|role| self.has_role(*role)).collect()
    }

    /// Decides if the current user may open the page at `path`. The first
    /// matching rule wins:
    /// 1. Not authenticated: denied
    /// 2. Admin or backend user: allowed
    /// 3. Accountant: allowed only for the policy's accountant paths
    /// 4. Anyone else: denied
    #[tracing::instrument(skip(policy), ret)]
    pub fn can_access_page(&self, path: &str, policy: &RoutePolicy) -> bool {
        if !self.is_authenticated() {
            return false;
        }
        if self.is_admin() || self.is_backend_user() {
            return true;
        }
        if self.is_accountant() {
            return policy.is_accountant_allowed(path);
        }
        false
    }

    /// Evaluates an element level rule. Nothing is permitted without
    /// authentication
    #[tracing::instrument(skip(policy), ret)]
    pub fn is_permitted(&self, rule: &PermissionRule, policy: &RoutePolicy) -> bool {
        if !self.is_authenticated() {
            return false;
        }
        match rule {
            PermissionRule::RequiresGroup(group) => self.user_groups().contains(group),
            PermissionRule::RequiresRole(role) => self.has_role(*role),
            PermissionRule::RequiresPath(path) => self.can_access_page(path, policy),
            PermissionRule::RequiresAnyOf(groups) => {
                groups.iter().any(|group| self.user_groups().contains(group))
            }
        }
    }
}
