//! Runs one command against the stored session and returns what to print

use std::sync::Arc;

use anyhow::{bail, Context};
use bursar_client_core::{
    configuration::{get_configuration, Configuration},
    guard::decide,
    Client, FileStorage, NavContext, Resolution, RouteGuard, Router, SessionStorage, SessionStore,
};
use bursar_shared::{
    req_args::LoginReqArgs,
    routes::{NavTarget, RoutePolicy},
    session::Session,
    uac::PermissionRule,
};
use secrecy::SecretString;
use tracing::{info, instrument, warn};

use crate::cli::{Cli, Command};

pub async fn run(cli: Cli) -> anyhow::Result<String> {
    let configuration =
        get_configuration(&cli.config_dir).context("failed to read configuration")?;
    let storage = FileStorage::open_or_reset(&configuration.storage.session_file)
        .context("failed to open session storage")?;
    let mut app = App::new(&configuration, storage)?;
    app.execute(cli.command).await
}

/// The session store and everything built on top of it for one run
#[derive(Debug)]
pub struct App<S> {
    store: SessionStore<S>,
    client: Client,
    policy: Arc<RoutePolicy>,
}

impl<S: SessionStorage> App<S> {
    pub fn new(configuration: &Configuration, storage: S) -> anyhow::Result<Self> {
        let store = SessionStore::restore(storage);
        let client = Client::new(&configuration.client, store.handle())?;
        Ok(Self {
            store,
            client,
            policy: Arc::new(RoutePolicy::default()),
        })
    }

    pub fn store(&self) -> &SessionStore<S> {
        &self.store
    }

    #[instrument(skip(self))]
    pub async fn execute(&mut self, command: Command) -> anyhow::Result<String> {
        match command {
            Command::Login { username, password } => {
                let password = match password {
                    Some(password) => password,
                    None => prompt_password()?,
                };
                let args = LoginReqArgs::new(username, password);
                self.store
                    .login(&self.client, &args)
                    .await
                    .context("login failed")?;
                Ok(describe_session(&self.store.session()))
            }
            Command::Logout => {
                self.store.logout();
                Ok("Logged out".to_string())
            }
            Command::Whoami { refresh } => {
                if refresh {
                    self.refresh_profile().await?;
                }
                Ok(describe_session(&self.store.session()))
            }
            Command::Navigate { path } => {
                let resolution = self.router().navigate(&path);
                Ok(describe_resolution(&resolution))
            }
            Command::Routes => Ok(render_routes(&self.store.session(), &self.policy)),
            Command::Permit { rule } => {
                let rule: PermissionRule = rule.parse()?;
                let permitted = self.store.session().is_permitted(&rule, &self.policy);
                Ok(format!(
                    "{rule}: {}",
                    if permitted { "permitted" } else { "denied" }
                ))
            }
        }
    }

    async fn refresh_profile(&mut self) -> anyhow::Result<()> {
        match self.store.fetch_profile(&self.client).await {
            Ok(identity) => {
                info!(username = %identity.username, "profile refreshed");
                Ok(())
            }
            Err(e) if e.is_rejection() => {
                warn!(?e, "stored session refused");
                Err(e).context("the stored session was not accepted, log in again")
            }
            Err(e) => Err(e).context("failed to refresh profile"),
        }
    }

    /// A router with a text view for every page in the policy
    fn router(&self) -> Router<String> {
        let guard = RouteGuard::new(Arc::clone(&self.policy), self.store.handle());
        self.policy
            .entries()
            .iter()
            .fold(Router::new(guard), |router, entry| {
                let (name, keep_alive) = (entry.name, entry.keep_alive);
                router.with_view(entry.path, move |ctx: &NavContext| {
                    describe_view(name, keep_alive, ctx)
                })
            })
    }
}

fn prompt_password() -> anyhow::Result<SecretString> {
    eprint!("Password: ");
    let mut line = String::new();
    std::io::stdin()
        .read_line(&mut line)
        .context("failed to read password from stdin")?;
    let password = line.trim_end_matches(&['\r', '\n'][..]).to_string();
    if password.is_empty() {
        bail!("no password given");
    }
    Ok(password.into())
}

fn describe_view(name: &str, keep_alive: bool, ctx: &NavContext) -> String {
    let mut result = format!("{name} page at {}", ctx.target.full_path());
    if let Some(return_to) = &ctx.return_to {
        result.push_str(&format!(", returns to {return_to} after login"));
    }
    if keep_alive {
        result.push_str(" (kept alive)");
    }
    result
}

pub fn describe_session(session: &Session) -> String {
    if !session.is_authenticated() {
        return "Not logged in".to_string();
    }
    let Some(identity) = session.identity() else {
        return "Logged in with an unknown profile, run `whoami --refresh`".to_string();
    };
    let roles = session
        .roles()
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>();
    format!(
        "{} (id {}), roles: {}",
        identity.username,
        identity.id,
        if roles.is_empty() {
            "none".to_string()
        } else {
            roles.join(", ")
        }
    )
}

pub fn describe_resolution(resolution: &Resolution<String>) -> String {
    match resolution {
        Resolution::Rendered { decision, view, .. } => format!("{decision}\n{view}"),
        Resolution::NotFound { path, decision } => format!("{decision}\nno page at {path}"),
    }
}

/// One line per page with the outcome of navigating there now
pub fn render_routes(session: &Session, policy: &RoutePolicy) -> String {
    policy
        .entries()
        .iter()
        .map(|entry| {
            let decision = decide(&NavTarget::parse(entry.path), policy, session);
            format!(
                "{:<34} {:<28} {:<7} {decision}",
                entry.path,
                entry.name,
                if entry.requires_auth { "login" } else { "public" },
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
