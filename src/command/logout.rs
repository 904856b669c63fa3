// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use clap::Parser;
use log::info;

use crate::{auth, error::Result};

use super::Context;

/// End the current session.
#[derive(Debug, Parser)]
pub(crate) struct Command {}

#[async_trait]
impl super::Command for Command {
    async fn execute(self, ctx: &mut Context<'_>) -> Result<()> {
        if !ctx.session.is_authenticated() {
            info!("There is no session to end");
            return Ok(());
        }
        auth::logout(ctx.api, ctx.session).await
    }
}
