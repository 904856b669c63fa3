// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use clap::Parser;

use crate::{auth, error::Result};

use super::Context;

/// Log in and keep the session for later invocations.
#[derive(Debug, Parser)]
pub(crate) struct Command {
    /// The account name to log in as.
    #[clap()]
    name: String,
}

#[async_trait]
impl super::Command for Command {
    async fn execute(self, ctx: &mut Context<'_>) -> Result<()> {
        let password = ctx.prompt.prompt("Password").await?;
        auth::login(ctx.api, ctx.session, &self.name, &password).await?;
        println!("Logged in as {}", ctx.session.display_name());
        Ok(())
    }
}
