use std::{fmt::Debug, future::Future};

use anyhow::{anyhow, Context};
use bursar_shared::{
    const_config::path::{PathSpec, PATH_API_LOGIN},
    internal_error,
    req_args::LoginReqArgs,
    uac::{AuthError, Identity, LoginResponse},
};
use closure_traits::{ChannelCallBack, ChannelCallBackOutput};
use futures::channel::oneshot;
use reqwest::{Method, StatusCode};
use tracing::{debug, info};

use crate::{auth_service::AuthService, configuration::ClientSettings, SessionHandle};

pub mod api;

/// HTTP client for the authentication service. Every request carries the
/// bearer token of the session it was built with, if there is one
#[derive(Debug, Clone)]
pub struct Client {
    api_client: reqwest::Client,
    server_address: String,
    session: SessionHandle,
}

impl Client {
    #[tracing::instrument(name = "NEW CLIENT-CORE", skip(session))]
    pub fn new(settings: &ClientSettings, session: SessionHandle) -> anyhow::Result<Self> {
        let api_client = reqwest::Client::builder()
            .timeout(settings.request_timeout())
            .build()
            .context("unable to create reqwest client")?;
        Ok(Self {
            api_client,
            server_address: settings.server_address.clone(),
            session,
        })
    }

    /// Sends the credentials. Only the reply is returned, storing the session
    /// is left to the caller
    #[tracing::instrument(skip(ui_notify))]
    pub fn send_login<F: UiCallBack>(
        &self,
        args: &LoginReqArgs,
        ui_notify: F,
    ) -> oneshot::Receiver<Result<LoginResponse, AuthError>> {
        let (tx, rx) = oneshot::channel();
        let body = args.to_json_body();
        let on_done = move |resp: reqwest::Result<reqwest::Response>| async {
            let msg = process_login(resp).await;
            if tx.send(msg).is_err() {
                debug!("login reply receiver dropped");
            }
            ui_notify();
        };
        self.initiate_request(PATH_API_LOGIN, Some(&body), on_done);
        rx
    }

    #[tracing::instrument(skip(body, on_done))]
    // WARNING: Must skip body as it may contain sensitive info and "safe" versions
    // would usually already be logged by the caller
    fn initiate_request<T, F, O>(&self, path_spec: PathSpec, body: Option<&T>, on_done: F)
    where
        T: serde::Serialize + Debug,
        F: ChannelCallBack<O>,
        O: ChannelCallBackOutput,
    {
        let is_get_method = path_spec.method == Method::GET;
        let url = path_spec.url(&self.server_address);
        let mut request = self.api_client.request(path_spec.method, url);
        let token = self.session.token();
        if !token.is_empty() {
            request = request.bearer_auth(token.expose_secret());
        }
        if let Some(body) = body {
            request = if is_get_method {
                request.query(body)
            } else {
                request.json(body)
            };
        }
        reqwest_cross::fetch(request, on_done)
    }
}

impl AuthService for Client {
    fn login(
        &self,
        args: &LoginReqArgs,
    ) -> impl Future<Output = Result<LoginResponse, AuthError>> {
        await_reply(self.send_login(args, no_cb))
    }

    fn current_user(&self) -> impl Future<Output = Result<Identity, AuthError>> {
        await_reply(self.send_current_user(no_cb))
    }
}

fn no_cb() {}

async fn await_reply<T>(rx: oneshot::Receiver<Result<T, AuthError>>) -> Result<T, AuthError> {
    rx.await
        .map_err(|e| anyhow!(internal_error!(format!("reply channel closed: {e}"))))?
}

#[tracing::instrument(ret, err(Debug))]
async fn process_login(
    response: reqwest::Result<reqwest::Response>,
) -> Result<LoginResponse, AuthError> {
    let (response, status) = extract_response(response)?;
    if status.is_success() {
        parse_json(response).await
    } else if status == StatusCode::UNAUTHORIZED {
        let detail = error_detail(response).await;
        debug!(%detail, "credentials refused");
        Err(AuthError::InvalidUserOrPassword)
    } else {
        Err(rejection(response).await)
    }
}

#[tracing::instrument(ret, err(Debug))]
async fn process_current_user(
    response: reqwest::Result<reqwest::Response>,
) -> Result<Identity, AuthError> {
    let (response, status) = extract_response(response)?;
    if status.is_success() {
        parse_json(response).await
    } else if status == StatusCode::UNAUTHORIZED {
        Err(AuthError::TokenRejected(error_detail(response).await))
    } else {
        Err(rejection(response).await)
    }
}

async fn parse_json<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, AuthError> {
    Ok(response
        .json()
        .await
        .context("failed to parse result as json")?)
}

async fn rejection(response: reqwest::Response) -> AuthError {
    let status = response.status().as_u16();
    AuthError::Rejected {
        status,
        detail: error_detail(response).await,
    }
}

/// Extracts the human readable message from an error response
#[tracing::instrument(ret)]
async fn error_detail(response: reqwest::Response) -> String {
    let status = response.status();
    debug_assert!(
        !status.is_success(),
        "this is supposed to be an error, right? Status code is: {status}"
    );
    match response.text().await {
        Ok(body) => detail_from_body(status, &body),
        Err(e) => format!("request failed with status code: {status} and unreadable body: {e}"),
    }
}

/// Looks for `detail` then `msg` in a JSON body and falls back to the raw text
fn detail_from_body(status: StatusCode, body: &str) -> String {
    if body.trim().is_empty() {
        return format!("request failed with status code: {status} and no body");
    }
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return body.to_string();
    };
    match value.get("detail").or_else(|| value.get("msg")) {
        Some(serde_json::Value::String(message)) => message.clone(),
        Some(other) => other.to_string(),
        None => body.to_string(),
    }
}

/// Provides a way to standardize the error message
#[tracing::instrument(ret, err(Debug))]
fn extract_response(
    response: reqwest::Result<reqwest::Response>,
) -> Result<(reqwest::Response, StatusCode), AuthError> {
    if response.is_err() {
        info!("Response is err: {:#?}", response);
    }
    let response = response
        .context("failed to send request")
        .map_err(AuthError::Transport)?;
    let status = response.status();
    Ok((response, status))
}

pub trait UiCallBack: 'static + Send + FnOnce() {}
impl<T> UiCallBack for T where T: 'static + Send + FnOnce() {}

pub mod closure_traits {
    pub trait ChannelCallBack<O>:
        'static + Send + FnOnce(reqwest::Result<reqwest::Response>) -> O
    {
    }
    impl<T, O> ChannelCallBack<O> for T where
        T: 'static + Send + FnOnce(reqwest::Result<reqwest::Response>) -> O
    {
    }
    pub trait ChannelCallBackOutput: futures::Future<Output = ()> + Send {}
    impl<T> ChannelCallBackOutput for T where T: futures::Future<Output = ()> + Send {}
}
