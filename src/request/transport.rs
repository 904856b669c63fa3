// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header::HeaderMap, Method};
use url::Url;

use crate::metadata;

use super::error::{InvalidRequest, Network};

/// One outgoing call, fully resolved. Headers are fixed at construction, so a
/// later credential change does not affect a call already built.
#[derive(Debug)]
pub(crate) struct Descriptor {
    pub(crate) method: Method,
    pub(crate) url: Url,
    pub(crate) headers: HeaderMap,
    pub(crate) body: Option<Vec<u8>>,
    pub(crate) timeout: Duration,
}

#[derive(Debug)]
pub(crate) struct Response {
    pub(crate) status: u16,
    pub(crate) body: Vec<u8>,
}

#[async_trait]
pub(crate) trait Transport: Send + Sync {
    async fn send(&self, request: Descriptor) -> Result<Response, Network>;
}

pub(crate) struct Reqwest {
    client: reqwest::Client,
}

impl Reqwest {
    pub(crate) fn new() -> Result<Self, InvalidRequest> {
        let client = reqwest::Client::builder()
            .user_agent(metadata::USER_AGENT.as_str())
            .build()
            .map_err(InvalidRequest::Client)?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for Reqwest {
    async fn send(&self, request: Descriptor) -> Result<Response, Network> {
        let Descriptor {
            method,
            url,
            headers,
            body,
            timeout,
        } = request;

        let mut builder = self
            .client
            .request(method, url)
            .headers(headers)
            .timeout(timeout);
        if let Some(body) = body {
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| Network::from_reqwest(e, timeout))?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| Network::from_reqwest(e, timeout))?;

        Ok(Response {
            status,
            body: body.to_vec(),
        })
    }
}
