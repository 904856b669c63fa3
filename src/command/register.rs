// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use clap::Parser;
use log::error;
use secrecy::ExposeSecret as _;

use crate::{
    auth,
    error::{self, Result},
};

use super::Context;

/// Create an account. The backend logs the new account in straight away.
#[derive(Debug, Parser)]
pub(crate) struct Command {
    /// The account name to register.
    #[clap()]
    name: String,
}

#[async_trait]
impl super::Command for Command {
    async fn execute(self, ctx: &mut Context<'_>) -> Result<()> {
        let password = ctx.prompt.prompt("New password").await?;
        let confirmation = ctx.prompt.prompt("Repeat password").await?;
        if password.expose_secret() != confirmation.expose_secret() {
            error!("The passwords do not match");
            return Err(error::Error::Command);
        }

        auth::register(ctx.api, ctx.session, &self.name, &password).await?;
        println!("Registered and logged in as {}", ctx.session.display_name());
        Ok(())
    }
}
