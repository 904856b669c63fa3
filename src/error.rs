// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::{io, result};

use thiserror::Error;
use tokio::sync::mpsc;

use crate::request;

pub(crate) type Result<T, E = Error> = result::Result<T, E>;

#[derive(Error, Debug)]
pub(crate) enum Error {
    #[error("IO operation failed: {0}")]
    Io(#[from] io::Error),
    #[error("JSON format error: {0}")]
    Json(serde_json::Error),
    #[error("request failed: {0}")]
    Request(#[from] request::error::Error),
    #[error("data conversion error: {0}")]
    Conversion(#[from] Conversion),
    #[error("password retrieval error: {0}")]
    Password(#[from] Password),
    #[error("internal communication error: {0}")]
    Internal(#[from] Internal),
    #[error("the server accepted the request but issued no credential")]
    MissingCredential,
    #[error("command execution failed")]
    Command,
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        // LINT: Deliberate fall-through that should catch future cases added to
        // the enum.
        #[allow(clippy::wildcard_enum_match_arm)]
        match value.classify() {
            serde_json::error::Category::Io => Self::Io(value.into()),
            _ => Self::Json(value),
        }
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(value: tokio::task::JoinError) -> Self {
        Self::Io(value.into())
    }
}

#[derive(Error, Debug)]
pub(crate) enum Conversion {
    #[error("credential is not made of three dot-separated segments (got {0})")]
    CredentialSegments(usize),
    #[error("credential payload is not valid base64: {0}")]
    CredentialEncoding(#[from] base64::DecodeError),
    #[error("credential payload is not a JSON claim set: {0}")]
    CredentialClaims(serde_json::Error),
    #[error("expected a key and value separated by {0:?}, but got {1:?}")]
    KeyValue(char, String),
}

#[derive(Error, Debug)]
pub(crate) enum Password {
    #[error("no password was entered")]
    Empty,
}

#[derive(Error, Debug)]
pub(crate) enum Internal {
    #[error("channel is closed")]
    ChannelClosed,
}

impl<T> From<mpsc::error::SendError<T>> for Internal {
    fn from(_: mpsc::error::SendError<T>) -> Self {
        Self::ChannelClosed
    }
}
