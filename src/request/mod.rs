// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

//! Executes backend calls with the session credential attached.
//!
//! [`RequestCore`] holds exactly one credential slot shared by every call.
//! The slot is read once while a call's headers are being built; whatever it
//! holds at that moment is what the call carries, no matter what happens to
//! the slot while the call is in flight.

pub(crate) mod error;
pub(crate) mod query;
pub(crate) mod transport;

use log::{debug, error};
use reqwest::{
    header::{self, HeaderMap, HeaderValue},
    Method,
};
use serde_json::Value;
use tokio::sync::watch;

use crate::{
    config::ApiConfig,
    session::{self, Credential},
};

use self::{
    error::{Error, InvalidRequest},
    transport::{Descriptor, Response, Transport},
};

const HTTP_NO_CONTENT: u16 = 204;

/// Decoded outcome of a successful call.
#[derive(Debug, PartialEq)]
pub(crate) enum Reply {
    NoContent,
    Json(Value),
}

impl Reply {
    pub(crate) fn into_value(self) -> Option<Value> {
        match self {
            Self::NoContent => None,
            Self::Json(value) => Some(value),
        }
    }
}

pub(crate) struct RequestCore {
    config: ApiConfig,
    transport: Box<dyn Transport>,
    credential: watch::Sender<Option<Credential>>,
}

impl RequestCore {
    pub(crate) fn new<T: Transport + 'static>(config: ApiConfig, transport: T) -> Self {
        let (credential, _) = watch::channel(None);
        Self {
            config,
            transport: Box::new(transport),
            credential,
        }
    }

    pub(crate) fn set_credential(&self, credential: Credential) {
        let _ = self.credential.send_replace(Some(credential));
    }

    pub(crate) fn clear_credential(&self) {
        let _ = self.credential.send_replace(None);
    }

    pub(crate) fn has_credential(&self) -> bool {
        self.credential.borrow().is_some()
    }

    /// Performs one call. Failures are logged here and then returned; nothing
    /// is retried.
    pub(crate) async fn execute<K: AsRef<str> + Sync>(
        &self,
        endpoint: &str,
        method: Method,
        body: Option<&Value>,
        query: &[(K, Value)],
        extra_headers: &HeaderMap,
    ) -> Result<Reply, Error> {
        let result = self
            .dispatch(endpoint, method.clone(), body, query, extra_headers)
            .await;
        if let Err(ref e) = result {
            error!("API request {} {} failed: {}", method, endpoint, e);
        }
        result
    }

    #[allow(dead_code)]
    pub(crate) async fn get<K: AsRef<str> + Sync>(
        &self,
        endpoint: &str,
        query: &[(K, Value)],
    ) -> Result<Reply, Error> {
        self.execute(endpoint, Method::GET, None, query, &HeaderMap::new())
            .await
    }

    pub(crate) async fn post(&self, endpoint: &str, body: Option<&Value>) -> Result<Reply, Error> {
        self.execute::<&str>(endpoint, Method::POST, body, &[], &HeaderMap::new())
            .await
    }

    #[allow(dead_code)]
    pub(crate) async fn put(&self, endpoint: &str, body: Option<&Value>) -> Result<Reply, Error> {
        self.execute::<&str>(endpoint, Method::PUT, body, &[], &HeaderMap::new())
            .await
    }

    #[allow(dead_code)]
    pub(crate) async fn patch(&self, endpoint: &str, body: Option<&Value>) -> Result<Reply, Error> {
        self.execute::<&str>(endpoint, Method::PATCH, body, &[], &HeaderMap::new())
            .await
    }

    #[allow(dead_code)]
    pub(crate) async fn delete(&self, endpoint: &str) -> Result<Reply, Error> {
        self.execute::<&str>(endpoint, Method::DELETE, None, &[], &HeaderMap::new())
            .await
    }

    async fn dispatch<K: AsRef<str>>(
        &self,
        endpoint: &str,
        method: Method,
        body: Option<&Value>,
        query: &[(K, Value)],
        extra_headers: &HeaderMap,
    ) -> Result<Reply, Error> {
        let request = self.describe(endpoint, method, body, query, extra_headers)?;
        debug!("Sending {} {}", request.method, request.url);
        classify(self.transport.send(request).await?)
    }

    fn describe<K: AsRef<str>>(
        &self,
        endpoint: &str,
        method: Method,
        body: Option<&Value>,
        query: &[(K, Value)],
        extra_headers: &HeaderMap,
    ) -> Result<Descriptor, Error> {
        let mut url = self.config.endpoint_url(endpoint)?;
        let pairs = query::pairs(query);
        if !pairs.is_empty() {
            let _ = url.query_pairs_mut().extend_pairs(pairs);
        }

        let mut headers = HeaderMap::new();
        let _ = headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let _ = headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(credential) = self.credential.borrow().as_ref() {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", credential.expose()))?;
            value.set_sensitive(true);
            let _ = headers.insert(header::AUTHORIZATION, value);
        }
        for name in extra_headers.keys() {
            let _ = headers.remove(name);
        }
        for (name, value) in extra_headers {
            let _ = headers.append(name.clone(), value.clone());
        }

        let body = match body {
            None | Some(&Value::Null) => None,
            Some(value) => Some(serde_json::to_vec(value).map_err(InvalidRequest::Body)?),
        };

        Ok(Descriptor {
            method,
            url,
            headers,
            body,
            timeout: self.config.timeout(),
        })
    }
}

impl session::Observer for RequestCore {
    fn session_changed(&self, event: &session::Event) {
        match *event {
            session::Event::Established { ref credential, .. } => {
                self.set_credential(credential.clone());
            }
            session::Event::Cleared => self.clear_credential(),
        }
    }
}

fn classify(response: Response) -> Result<Reply, Error> {
    let Response { status, body } = response;

    if status == HTTP_NO_CONTENT {
        return Ok(Reply::NoContent);
    }

    if !(200..300).contains(&status) {
        let payload = serde_json::from_slice::<Value>(&body)
            .unwrap_or_else(|_| Value::Object(serde_json::Map::new()));
        let message = payload
            .get("message")
            .and_then(Value::as_str)
            .filter(|message| !message.is_empty())
            .map_or_else(|| format!("HTTP error! status: {status}"), str::to_owned);
        return Err(Error::Api {
            status,
            message,
            payload,
        });
    }

    if body.is_empty() {
        return Ok(Reply::NoContent);
    }

    serde_json::from_slice(&body)
        .map(Reply::Json)
        .map_err(Error::MalformedResponse)
}
