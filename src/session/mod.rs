// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

//! The single authoritative record of who is logged in.
//!
//! A [`Manager`] owns the one [`Session`] of the process. Nothing else mutates
//! it; collaborators that care about the credential (the request core, the
//! persistence worker) subscribe as [`Observer`]s and are told about every
//! transition between the anonymous and authenticated states.

pub(crate) mod credential;
mod identity;
pub(crate) mod persist;

use std::{sync::Arc, time::SystemTime};

use log::{error, info, warn};

pub(crate) use credential::Credential;
pub(crate) use identity::{AuthPayload, Identity, PrincipalId};

/// Notification emitted after the session's credential changes.
#[derive(Clone, Debug)]
pub(crate) enum Event {
    Established {
        credential: Credential,
        identity: Option<Identity>,
    },
    Cleared,
}

pub(crate) trait Observer: Send + Sync {
    fn session_changed(&self, event: &Event);
}

#[derive(Debug, Default)]
pub(crate) struct Session {
    credential: Option<Credential>,
    identity: Option<Identity>,
    loading: bool,
    last_error: Option<String>,
}

impl Session {
    /// The principal, reported only while a credential is held.
    pub(crate) fn identity(&self) -> Option<&Identity> {
        self.credential.as_ref().and(self.identity.as_ref())
    }

    #[allow(dead_code)]
    pub(crate) const fn is_loading(&self) -> bool {
        self.loading
    }

    #[allow(dead_code)]
    pub(crate) fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

#[derive(Default)]
pub(crate) struct Manager {
    session: Session,
    observers: Vec<Arc<dyn Observer>>,
}

impl Manager {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn subscribe(&mut self, observer: Arc<dyn Observer>) {
        self.observers.push(observer);
    }

    #[allow(dead_code)]
    pub(crate) const fn session(&self) -> &Session {
        &self.session
    }

    /// Replaces the credential and identity with the ones in `payload`,
    /// whether or not a session already exists.
    pub(crate) fn set_session(&mut self, payload: AuthPayload) {
        let (token, identity) = payload.into_parts();
        self.session.last_error = None;

        let Some(token) = token else {
            warn!("The authentication result did not include a credential, so the session stays anonymous");
            self.session.credential = None;
            self.session.identity = None;
            self.notify(&Event::Cleared);
            return;
        };

        if identity.is_none() {
            warn!("The authentication result has neither an employee record nor a nested data.employee record");
        }

        let credential = Credential::new(token);
        self.session.credential = Some(credential.clone());
        self.session.identity = identity.clone();
        self.notify(&Event::Established {
            credential,
            identity,
        });
    }

    pub(crate) fn clear_session(&mut self) {
        self.session.credential = None;
        self.session.identity = None;
        self.session.last_error = None;
        self.notify(&Event::Cleared);
    }

    pub(crate) fn set_loading(&mut self, loading: bool) {
        self.session.loading = loading;
    }

    pub(crate) fn set_error<S: Into<String>>(&mut self, message: S) {
        self.session.last_error = Some(message.into());
    }

    pub(crate) fn clear_error(&mut self) {
        self.session.last_error = None;
    }

    /// Checks the held credential against the current time. An expired or
    /// undecodable credential ends the session.
    pub(crate) fn validate_credential(&mut self) -> bool {
        self.validate_credential_at(SystemTime::now())
    }

    pub(crate) fn validate_credential_at(&mut self, now: SystemTime) -> bool {
        let Some(credential) = self.session.credential.as_ref() else {
            return false;
        };

        match credential.is_expired_at(now) {
            Ok(false) => true,
            Ok(true) => {
                info!("The session credential has expired");
                self.clear_session();
                false
            }
            Err(e) => {
                error!("The session credential could not be decoded: {}", e);
                self.clear_session();
                false
            }
        }
    }

    pub(crate) const fn is_authenticated(&self) -> bool {
        self.session.credential.is_some()
    }

    pub(crate) fn role(&self) -> Option<&str> {
        self.session.identity()?.role.as_deref()
    }

    pub(crate) fn display_name(&self) -> &str {
        self.session
            .identity()
            .map_or("", |identity| identity.name.as_str())
    }

    pub(crate) fn id(&self) -> Option<&PrincipalId> {
        self.session.identity()?.id.as_ref()
    }

    fn notify(&self, event: &Event) {
        for observer in &self.observers {
            observer.session_changed(event);
        }
    }
}
