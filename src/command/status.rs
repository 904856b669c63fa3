// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use clap::Parser;
use tabled::{settings::Style, Table, Tabled};

use crate::error::Result;

use super::Context;

#[derive(Tabled)]
struct Row {
    #[tabled(rename = "Field")]
    field: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

/// Show the current session.
#[derive(Debug, Parser)]
pub(crate) struct Command {}

#[async_trait]
impl super::Command for Command {
    async fn execute(self, ctx: &mut Context<'_>) -> Result<()> {
        let valid = ctx.session.validate_credential();
        let session = &*ctx.session;

        let rows = [
            Row {
                field: "Authenticated",
                value: session.is_authenticated().to_string(),
            },
            Row {
                field: "Credential valid",
                value: valid.to_string(),
            },
            Row {
                field: "Credential attached",
                value: ctx.api.has_credential().to_string(),
            },
            Row {
                field: "ID",
                value: session.id().map(ToString::to_string).unwrap_or_default(),
            },
            Row {
                field: "Name",
                value: session.display_name().to_owned(),
            },
            Row {
                field: "Role",
                value: session.role().unwrap_or_default().to_owned(),
            },
        ];
        println!("{}", Table::new(rows).with(Style::rounded()));
        Ok(())
    }
}
