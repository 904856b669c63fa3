// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use crate::gate::{Gate, Requirement, Route};

pub(crate) const LOGIN_PATH: &str = "/login";
pub(crate) const HOME_PATH: &str = "/dashboard";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum View {
    Login,
    Register,
    Dashboard,
    TeamTasks,
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match *self {
            Self::Login => "login",
            Self::Register => "register",
            Self::Dashboard => "dashboard",
            Self::TeamTasks => "team tasks",
        })
    }
}

pub(crate) fn table() -> Vec<Route<View>> {
    vec![
        Route::alias("/", LOGIN_PATH),
        Route::view(LOGIN_PATH, View::Login, Requirement::Anonymous),
        Route::view("/register", View::Register, Requirement::Anonymous),
        Route::view(HOME_PATH, View::Dashboard, Requirement::Authenticated),
        Route::view("/teamtasks", View::TeamTasks, Requirement::Authenticated),
    ]
}

pub(crate) fn gate(revalidate: bool) -> Gate<View> {
    Gate::new(table(), LOGIN_PATH, HOME_PATH).with_revalidation(revalidate)
}
