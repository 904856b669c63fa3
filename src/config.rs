// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::time::Duration;

use url::Url;

pub(crate) const DEFAULT_API_URL: &str = "http://localhost:3000";
pub(crate) const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Where the backend lives and how long a single call may take.
#[derive(Clone, Debug)]
pub(crate) struct ApiConfig {
    base_url: Url,
    timeout: Duration,
}

impl ApiConfig {
    pub(crate) const fn new(base_url: Url, timeout: Duration) -> Self {
        Self { base_url, timeout }
    }

    pub(crate) const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Appends an endpoint path to the base address verbatim, so a base with
    /// a path prefix (`https://host/v1`) keeps it.
    pub(crate) fn endpoint_url(&self, endpoint: &str) -> Result<Url, url::ParseError> {
        let base = self.base_url.as_str().trim_end_matches('/');
        if endpoint.is_empty() || endpoint.starts_with('/') {
            Url::parse(&format!("{base}{endpoint}"))
        } else {
            Url::parse(&format!("{base}/{endpoint}"))
        }
    }
}
