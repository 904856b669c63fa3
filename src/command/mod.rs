// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;

use crate::{
    error::Result, gate::Gate, password::Prompt, request::RequestCore, routes::View,
    session::Manager,
};

pub(crate) mod login;
pub(crate) mod logout;
pub(crate) mod navigate;
pub(crate) mod register;
pub(crate) mod request;
pub(crate) mod status;

/// Everything a command may touch. The session is borrowed mutably because
/// commands drive its transitions.
pub(crate) struct Context<'ctx> {
    pub(crate) api: &'ctx RequestCore,
    pub(crate) session: &'ctx mut Manager,
    pub(crate) gate: &'ctx Gate<View>,
    pub(crate) prompt: &'ctx (dyn Prompt + 'ctx),
}

#[async_trait]
pub(crate) trait Command {
    async fn execute(self, ctx: &mut Context<'_>) -> Result<()>;
}
