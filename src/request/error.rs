// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::time::Duration;

use reqwest::header::{InvalidHeaderName, InvalidHeaderValue};
use thiserror::Error;

#[derive(Error, Debug)]
pub(crate) enum Error {
    #[error("network error: {0}")]
    Network(#[from] Network),
    #[error("server responded with HTTP {status}: {message}")]
    Api {
        status: u16,
        message: String,
        payload: serde_json::Value,
    },
    #[error("server response could not be decoded: {0}")]
    MalformedResponse(#[source] serde_json::Error),
    #[error("request could not be built: {0}")]
    InvalidRequest(#[from] InvalidRequest),
}

impl Error {
    pub(crate) const fn status(&self) -> Option<u16> {
        match *self {
            Self::Api { status, .. } => Some(status),
            Self::Network(_) | Self::MalformedResponse(_) | Self::InvalidRequest(_) => None,
        }
    }

    /// Text suitable for showing to whoever triggered the request.
    pub(crate) fn user_message(&self) -> String {
        match *self {
            Self::Api { ref message, .. } => message.clone(),
            Self::Network(_) | Self::MalformedResponse(_) | Self::InvalidRequest(_) => {
                self.to_string()
            }
        }
    }
}

/// No response was obtained. Callers should treat these as transient.
#[derive(Error, Debug)]
pub(crate) enum Network {
    #[error("no response within {0:?}")]
    Timeout(Duration),
    #[error("no response received: {0}")]
    Unreachable(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Network {
    pub(crate) fn from_reqwest(value: reqwest::Error, timeout: Duration) -> Self {
        if value.is_timeout() {
            Self::Timeout(timeout)
        } else {
            Self::Unreachable(Box::new(value))
        }
    }
}

#[derive(Error, Debug)]
pub(crate) enum InvalidRequest {
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("invalid header name: {0}")]
    HeaderName(#[from] InvalidHeaderName),
    #[error("invalid header value: {0}")]
    HeaderValue(#[from] InvalidHeaderValue),
    #[error("body could not be encoded: {0}")]
    Body(#[source] serde_json::Error),
    #[error("HTTP client could not be initialized: {0}")]
    Client(#[source] reqwest::Error),
}

impl From<url::ParseError> for Error {
    fn from(value: url::ParseError) -> Self {
        Self::InvalidRequest(value.into())
    }
}

impl From<InvalidHeaderName> for Error {
    fn from(value: InvalidHeaderName) -> Self {
        Self::InvalidRequest(value.into())
    }
}

impl From<InvalidHeaderValue> for Error {
    fn from(value: InvalidHeaderValue) -> Self {
        Self::InvalidRequest(value.into())
    }
}
