// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use clap::Parser;

use crate::{
    error::Result,
    gate::{Outcome, Target},
};

use super::Context;

/// Show where a navigation to a path would end up for the current session.
#[derive(Debug, Parser)]
pub(crate) struct Command {
    /// The path to navigate to, such as /dashboard.
    #[clap()]
    path: String,
}

#[async_trait]
impl super::Command for Command {
    async fn execute(self, ctx: &mut Context<'_>) -> Result<()> {
        match ctx.gate.navigate(&self.path, ctx.session) {
            Outcome::Enter(route) => match route.target {
                Target::View(view) => println!("enter {view}"),
                Target::Alias(ref to) => println!("redirect {to}"),
            },
            Outcome::Redirect(to) => println!("redirect {to}"),
            Outcome::NotFound => println!("not found"),
        }
        Ok(())
    }
}
