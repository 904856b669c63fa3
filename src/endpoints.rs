// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

pub(crate) const AUTH_REGISTER: &str = "/api/auth/register";
pub(crate) const AUTH_LOGIN: &str = "/api/auth/login";
pub(crate) const AUTH_LOGOUT: &str = "/api/auth/logout";
