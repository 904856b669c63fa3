// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use log::{info, warn};
use secrecy::{ExposeSecret as _, SecretString};
use serde_json::json;

use crate::{
    endpoints,
    error::{Error, Result},
    request::{error::Error as RequestError, RequestCore},
    session::{AuthPayload, Manager},
};

const HTTP_UNAUTHORIZED: u16 = 401;

pub(crate) async fn register(
    api: &RequestCore,
    session: &mut Manager,
    name: &str,
    password: &SecretString,
) -> Result<()> {
    authenticate(api, session, endpoints::AUTH_REGISTER, name, password).await
}

pub(crate) async fn login(
    api: &RequestCore,
    session: &mut Manager,
    name: &str,
    password: &SecretString,
) -> Result<()> {
    authenticate(api, session, endpoints::AUTH_LOGIN, name, password).await
}

async fn authenticate(
    api: &RequestCore,
    session: &mut Manager,
    endpoint: &str,
    name: &str,
    password: &SecretString,
) -> Result<()> {
    let body = json!({ "name": name, "password": password.expose_secret() });

    session.set_loading(true);
    session.clear_error();
    let result = api.post(endpoint, Some(&body)).await;
    session.set_loading(false);

    let reply = match result {
        Ok(reply) => reply,
        Err(e) => {
            report(session, &e);
            return Err(e.into());
        }
    };

    let payload = reply
        .into_value()
        .map(|value| AuthPayload::from_value(&value))
        .unwrap_or_default();
    session.set_session(payload);
    if !session.is_authenticated() {
        let e = Error::MissingCredential;
        session.set_error(e.to_string());
        return Err(e);
    }
    Ok(())
}

/// Ends the session on the server and locally. The local session is cleared
/// even when the server call fails.
pub(crate) async fn logout(api: &RequestCore, session: &mut Manager) -> Result<()> {
    session.set_loading(true);
    let result = api.post(endpoints::AUTH_LOGOUT, None).await;
    session.set_loading(false);
    session.clear_session();

    match result {
        Ok(_) => Ok(()),
        Err(e) => {
            session.set_error(e.user_message());
            Err(e.into())
        }
    }
}

/// Re-establishes a saved session at start-up and drops it again straight
/// away if its credential is no longer valid.
pub(crate) fn resume(session: &mut Manager, saved: Option<AuthPayload>) -> bool {
    let Some(payload) = saved else {
        return false;
    };

    session.set_session(payload);
    if session.validate_credential() {
        info!("Resumed the session of {}", session.display_name());
        true
    } else {
        warn!("The saved session is no longer valid and has been discarded");
        false
    }
}

/// Records a failed request on the session. A 401 means the server no longer
/// accepts the credential, so the session ends.
pub(crate) fn report(session: &mut Manager, error: &RequestError) {
    if error.status() == Some(HTTP_UNAUTHORIZED) {
        warn!("The server rejected the session credential");
        session.clear_session();
    }
    session.set_error(error.user_message());
}
