// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use secrecy::{ExposeSecret as _, SecretString};
use tokio::task;

use crate::error::{self, Result};

#[async_trait]
pub(crate) trait Prompt: Send + Sync {
    async fn prompt(&self, label: &str) -> Result<SecretString>;
}

#[async_trait]
impl<T: Prompt + ?Sized> Prompt for Box<T> {
    async fn prompt(&self, label: &str) -> Result<SecretString> {
        (**self).prompt(label).await
    }
}

/// Reads a password from the controlling terminal without echoing it.
pub(crate) struct RpasswordPrompt;

#[async_trait]
impl Prompt for RpasswordPrompt {
    async fn prompt(&self, label: &str) -> Result<SecretString> {
        let label = format!("{label}: ");
        let password = task::spawn_blocking(move || {
            rpassword::prompt_password(label).map(SecretString::new)
        })
        .await??;

        if password.expose_secret().is_empty() {
            return Err(error::Password::Empty.into());
        }
        Ok(password)
    }
}
