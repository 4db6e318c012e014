use std::future::Future;

use bursar_shared::{
    req_args::LoginReqArgs,
    uac::{AuthError, Identity, LoginResponse},
};

/// The remote service that trades credentials for a token and reports who the
/// current token belongs to. Implemented over HTTP by [`crate::Client`]
pub trait AuthService {
    fn login(&self, args: &LoginReqArgs)
        -> impl Future<Output = Result<LoginResponse, AuthError>>;

    /// Identifies the user of the token held by the session the service was
    /// built with
    fn current_user(&self) -> impl Future<Output = Result<Identity, AuthError>>;
}
