// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
#![deny(elided_lifetimes_in_paths)]
#![warn(
    rust_2018_idioms,
    future_incompatible,
    unused,
    unused_lifetimes,
    unused_qualifications,
    unused_results,
    anonymous_parameters,
    deprecated_in_future,
    elided_lifetimes_in_paths,
    explicit_outlives_requirements,
    keyword_idents,
    macro_use_extern_crate,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::cargo,
    clippy::unseparated_literal_suffix,
    clippy::decimal_literal_representation,
    clippy::single_char_lifetime_names,
    clippy::fallible_impl_from,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::wildcard_enum_match_arm,
    clippy::deref_by_slicing,
    clippy::default_numeric_fallback,
    clippy::shadow_reuse,
    clippy::clone_on_ref_ptr,
    clippy::todo,
    clippy::string_add,
    clippy::use_debug,
    clippy::future_not_send
)]
#![cfg_attr(not(test), warn(clippy::panic_in_result_fn))]

mod auth;
mod command;
mod config;
mod endpoints;
mod error;
mod gate;
mod metadata;
mod password;
mod request;
mod routes;
mod session;
mod storage;

use std::{process, sync::Arc, time::Duration};

use async_trait::async_trait;
use clap::{Parser, Subcommand};
use error::Result;
use log::{error, warn};
use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Debug, Subcommand)]
enum Command {
    Login(command::login::Command),
    Register(command::register::Command),
    Logout(command::logout::Command),
    Status(command::status::Command),
    Navigate(command::navigate::Command),
    Request(command::request::Command),
}

#[async_trait]
impl command::Command for Command {
    async fn execute(self, ctx: &mut command::Context<'_>) -> Result<()> {
        match self {
            Self::Login(cmd) => cmd.execute(ctx).await,
            Self::Register(cmd) => cmd.execute(ctx).await,
            Self::Logout(cmd) => cmd.execute(ctx).await,
            Self::Status(cmd) => cmd.execute(ctx).await,
            Self::Navigate(cmd) => cmd.execute(ctx).await,
            Self::Request(cmd) => cmd.execute(ctx).await,
        }
    }
}

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// The base URL of the backend. Endpoint paths are appended to it as-is.
    #[arg(long, env = "TASKDESK_API_URL", default_value = config::DEFAULT_API_URL, value_parser = Url::parse)]
    api_url: Url,

    /// How long to wait for the backend to answer a single request, in
    /// milliseconds.
    #[arg(long, env = "TASKDESK_API_TIMEOUT", default_value_t = config::DEFAULT_TIMEOUT_MS)]
    timeout_ms: u64,

    /// Keep the session in memory only, so it ends with this process.
    #[arg(long)]
    no_persist_session: bool,

    /// Check the credential's expiry on every navigation instead of only
    /// trusting that a credential is present.
    #[arg(long)]
    revalidate_on_navigate: bool,

    #[clap(subcommand)]
    command: Command,
}

fn get_session_storage<
    T: Send + Serialize + Sync + for<'de> Deserialize<'de> + Clone + 'static,
>(
    args: &Args,
    file: &str,
) -> Box<dyn storage::Storage<T>> {
    if !args.no_persist_session {
        if let Some(file_storage) = storage::File::new(file) {
            return Box::new(file_storage);
        }
        warn!("We could not find a data directory, so the session will end with this process");
    }

    Box::new(storage::Memory::<T>::new())
}

async fn run(args: Args) -> Result<()> {
    let api_config = config::ApiConfig::new(
        args.api_url.clone(),
        Duration::from_millis(args.timeout_ms),
    );
    let transport = request::transport::Reqwest::new().map_err(request::error::Error::from)?;
    let api = Arc::new(request::RequestCore::new(api_config, transport));

    let mut token_storage = get_session_storage::<String>(&args, "auth_token.json");
    let mut user_info_storage = get_session_storage::<session::Identity>(&args, "user_info.json");
    let saved = session::persist::restore(&mut token_storage, &mut user_info_storage).await;

    let (worker, persister) = session::persist::channel(token_storage, user_info_storage);
    let worker_task = tokio::spawn(worker);

    let mut session = session::Manager::new();
    session.subscribe(Arc::clone(&api) as Arc<dyn session::Observer>);
    session.subscribe(Arc::new(persister));
    let _ = auth::resume(&mut session, saved);

    let gate = routes::gate(args.revalidate_on_navigate);
    let prompt = password::RpasswordPrompt;
    let mut ctx = command::Context {
        api: &api,
        session: &mut session,
        gate: &gate,
        prompt: &prompt,
    };
    let result = command::Command::execute(args.command, &mut ctx).await;

    drop(session);
    worker_task.await??;

    result
}

#[tokio::main]
async fn main() {
    let logger_env = env_logger::Env::new()
        .filter_or("TASKDESK_LOG", "warn")
        .write_style("TASKDESK_LOG_STYLE");
    env_logger::Builder::from_env(logger_env).init();

    if let Err(e) = run(Args::parse()).await {
        error!("We encountered an error: {}", e);
        process::exit(1);
    };
}
