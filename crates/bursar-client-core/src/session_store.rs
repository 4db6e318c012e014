use std::sync::{Arc, Mutex};

use bursar_shared::{
    const_config::storage::{STORAGE_KEY_IDENTITY, STORAGE_KEY_TOKEN},
    log_err_as_warn,
    req_args::LoginReqArgs,
    routes::RoutePolicy,
    session::Session,
    token::AuthToken,
    uac::{AuthError, Identity, LoginResponse},
};
use tracing::{debug, info, instrument, warn};

use crate::{
    auth_service::AuthService,
    storage::{SessionStorage, StorageError},
};

/// Shared view of the session handed to the route guard and the HTTP client.
/// Only the [`SessionStore`] changes what it holds
#[derive(Debug, Clone, Default)]
pub struct SessionHandle(Arc<Mutex<Session>>);

impl SessionHandle {
    pub fn new(session: Session) -> Self {
        Self(Arc::new(Mutex::new(session)))
    }

    /// Runs `f` with the current session, keep `f` short as the session is
    /// locked while it runs
    pub fn with<R>(&self, f: impl FnOnce(&Session) -> R) -> R {
        f(&self.0.lock().expect("mutex poisoned"))
    }

    pub fn snapshot(&self) -> Session {
        self.with(Session::clone)
    }

    pub fn token(&self) -> AuthToken {
        self.with(|session| session.token().clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.with(Session::is_authenticated)
    }

    pub(crate) fn update(&self, f: impl FnOnce(&mut Session)) {
        f(&mut self.0.lock().expect("mutex poisoned"))
    }
}

/// Owns the session and its persisted copy.
///
/// Construct with [`SessionStore::restore`] once at startup before any
/// navigation is checked, then change the session only through
/// [`login`](Self::login), [`fetch_profile`](Self::fetch_profile) and
/// [`logout`](Self::logout).
#[derive(Debug)]
pub struct SessionStore<S> {
    storage: S,
    session: SessionHandle,
}

impl<S: SessionStorage> SessionStore<S> {
    /// Loads the persisted session. Both the token and the identity must be
    /// present for the session to be restored. An identity that cannot be
    /// read is dropped from the session and from storage, the token is kept
    #[instrument(skip_all)]
    pub fn restore(mut storage: S) -> Self {
        let token = read_non_empty(&storage, STORAGE_KEY_TOKEN);
        let identity_json = read_non_empty(&storage, STORAGE_KEY_IDENTITY);
        let session = match (token, identity_json) {
            (Some(token), Some(identity_json)) => {
                let identity = match Identity::from_json(&identity_json) {
                    Ok(identity) => Some(identity),
                    Err(e) => {
                        warn!(?e, "discarding persisted identity");
                        log_err_as_warn!(storage.remove_item(STORAGE_KEY_IDENTITY));
                        None
                    }
                };
                info!("restored persisted session");
                Session::new(token.into(), identity)
            }
            _ => {
                debug!("no complete persisted session found");
                Session::default()
            }
        };
        Self {
            storage,
            session: SessionHandle::new(session),
        }
    }

    pub fn handle(&self) -> SessionHandle {
        self.session.clone()
    }

    pub fn session(&self) -> Session {
        self.session.snapshot()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// On success the token and identity are replaced together and persisted.
    /// On failure the session is left as it was
    #[instrument(skip(self, auth))]
    pub async fn login<A: AuthService>(
        &mut self,
        auth: &A,
        args: &LoginReqArgs,
    ) -> Result<Identity, AuthError> {
        let LoginResponse {
            access_token, user, ..
        } = auth.login(args).await.inspect_err(|e| warn!(?e, "login failed"))?;
        self.session
            .update(|session| session.set_credentials(access_token.clone(), user.clone()));
        log_err_as_warn!(self
            .storage
            .set_item(STORAGE_KEY_TOKEN, access_token.expose_secret()));
        self.persist_identity(&user);
        info!(username = %user.username, "logged in");
        Ok(user)
    }

    /// Refreshes the identity using the current token. Fails without sending
    /// anything if there is no token
    #[instrument(skip(self, auth))]
    pub async fn fetch_profile<A: AuthService>(&mut self, auth: &A) -> Result<Identity, AuthError> {
        if !self.session.is_authenticated() {
            return Err(AuthError::NotLoggedIn);
        }
        let identity = auth
            .current_user()
            .await
            .inspect_err(|e| warn!(?e, "fetching profile failed"))?;
        self.session
            .update(|session| session.set_identity(identity.clone()));
        self.persist_identity(&identity);
        Ok(identity)
    }

    /// Always succeeds, storage failures are only logged
    #[instrument(skip(self))]
    pub fn logout(&mut self) {
        self.session.update(Session::clear);
        log_err_as_warn!(self.storage.remove_item(STORAGE_KEY_TOKEN));
        log_err_as_warn!(self.storage.remove_item(STORAGE_KEY_IDENTITY));
        info!("logged out");
    }

    pub fn can_access_page(&self, path: &str, policy: &RoutePolicy) -> bool {
        self.session
            .with(|session| session.can_access_page(path, policy))
    }

    fn persist_identity(&mut self, identity: &Identity) {
        match identity.to_json() {
            Ok(json) => log_err_as_warn!(self.storage.set_item(STORAGE_KEY_IDENTITY, &json)),
            Err(e) => warn!(?e, "failed to serialize identity for storage"),
        }
    }
}

/// Read failures are logged and treated as the key being absent
fn read_non_empty<S: SessionStorage>(storage: &S, key: &str) -> Option<String> {
    let result: Result<Option<String>, StorageError> = storage.get_item(key);
    match result {
        Ok(value) => value.filter(|v| !v.is_empty()),
        Err(e) => {
            warn!(?e, key, "failed to read from storage");
            None
        }
    }
}
