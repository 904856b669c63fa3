// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use clap::Parser;
use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue},
    Method,
};
use serde_json::Value;

use crate::{
    auth,
    error::{Conversion, Result},
    request::{self, Reply},
};

use super::Context;

fn parse_method(value: &str) -> Result<Method, String> {
    Method::from_bytes(value.to_ascii_uppercase().as_bytes()).map_err(|e| e.to_string())
}

fn parse_json(value: &str) -> Result<Value, serde_json::Error> {
    serde_json::from_str(value)
}

fn split_pair(value: &str, separator: char) -> Result<(String, String), Conversion> {
    value
        .split_once(separator)
        .map(|(key, value)| (key.trim().to_owned(), value.trim().to_owned()))
        .ok_or_else(|| Conversion::KeyValue(separator, value.to_owned()))
}

fn parse_query(value: &str) -> Result<(String, String), Conversion> {
    split_pair(value, '=')
}

fn parse_header(value: &str) -> Result<(String, String), Conversion> {
    split_pair(value, ':')
}

/// Send one request to the backend with the current session attached.
#[derive(Debug, Parser)]
pub(crate) struct Command {
    /// The HTTP method, such as GET or PATCH.
    #[arg(value_parser = parse_method)]
    method: Method,

    /// The endpoint path, such as /api/teams.
    #[clap()]
    endpoint: String,

    /// A query parameter as key=value. Parameters with empty values are not
    /// sent.
    #[arg(long, short, value_parser = parse_query)]
    query: Vec<(String, String)>,

    /// An extra header as name:value. Overrides a default header of the same
    /// name.
    #[arg(long = "header", short = 'H', value_parser = parse_header)]
    headers: Vec<(String, String)>,

    /// A JSON request body.
    #[arg(long, short, value_parser = parse_json)]
    data: Option<Value>,
}

#[async_trait]
impl super::Command for Command {
    async fn execute(self, ctx: &mut Context<'_>) -> Result<()> {
        let mut headers = HeaderMap::new();
        for (name, value) in &self.headers {
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(request::error::Error::from)?;
            let value = HeaderValue::from_str(value).map_err(request::error::Error::from)?;
            let _ = headers.append(name, value);
        }

        let query: Vec<(String, Value)> = self
            .query
            .into_iter()
            .map(|(key, value)| (key, Value::String(value)))
            .collect();

        let reply = ctx
            .api
            .execute(
                &self.endpoint,
                self.method,
                self.data.as_ref(),
                &query,
                &headers,
            )
            .await;

        match reply {
            Ok(Reply::NoContent) => println!("no content"),
            Ok(Reply::Json(value)) => println!("{}", serde_json::to_string_pretty(&value)?),
            Err(e) => {
                auth::report(ctx.session, &e);
                return Err(e.into());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_arguments() {
        let command = Command::try_parse_from([
            "request",
            "get",
            "/api/tasks",
            "--query",
            "limit=30",
            "-q",
            "status=",
            "-H",
            "X-Trace: 1",
            "--data",
            r#"{"a":1}"#,
        ])
        .unwrap();

        assert_eq!(command.method, Method::GET);
        assert_eq!(
            command.query,
            [
                ("limit".to_owned(), "30".to_owned()),
                ("status".to_owned(), String::new())
            ]
        );
        assert_eq!(command.headers, [("X-Trace".to_owned(), "1".to_owned())]);
        assert_eq!(command.data, Some(serde_json::json!({ "a": 1 })));
    }

    #[test]
    fn rejects_pair_without_separator() {
        assert!(Command::try_parse_from(["request", "GET", "/api/tasks", "-q", "limit"]).is_err());
    }
}
