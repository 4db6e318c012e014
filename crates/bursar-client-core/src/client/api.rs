use bursar_shared::{
    const_config::path::PATH_API_CURRENT_USER,
    uac::{AuthError, Identity},
};
use futures::channel::oneshot;
use tracing::debug;

use super::process_current_user;
use crate::{client::UiCallBack, Client};

impl Client {
    /// Asks who the current token belongs to
    #[tracing::instrument(skip(ui_notify))]
    pub fn send_current_user<F: UiCallBack>(
        &self,
        ui_notify: F,
    ) -> oneshot::Receiver<Result<Identity, AuthError>> {
        let (tx, rx) = oneshot::channel();
        let on_done = move |resp: reqwest::Result<reqwest::Response>| async {
            let msg = process_current_user(resp).await;
            if tx.send(msg).is_err() {
                debug!("current user reply receiver dropped");
            }
            ui_notify();
        };
        self.initiate_request::<(), _, _>(PATH_API_CURRENT_USER, None, on_done);
        rx
    }
}
