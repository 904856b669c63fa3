// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

//! Decides whether a navigation may proceed.
//!
//! The gate only looks at whether the session holds a credential. It does
//! not check expiry unless revalidation was switched on explicitly, which
//! adds a credential decode to every navigation.

use log::{debug, warn};

use crate::session::Manager;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Requirement {
    None,
    Authenticated,
    Anonymous,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Target<V> {
    View(V),
    Alias(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Route<V> {
    pub(crate) path: String,
    pub(crate) target: Target<V>,
    pub(crate) requirement: Requirement,
}

impl<V> Route<V> {
    pub(crate) fn view(path: &str, view: V, requirement: Requirement) -> Self {
        Self {
            path: path.to_owned(),
            target: Target::View(view),
            requirement,
        }
    }

    pub(crate) fn alias(path: &str, to: &str) -> Self {
        Self {
            path: path.to_owned(),
            target: Target::Alias(to.to_owned()),
            requirement: Requirement::None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Decision {
    Allow,
    Redirect(String),
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Outcome<'routes, V> {
    Enter(&'routes Route<V>),
    Redirect(String),
    NotFound,
}

pub(crate) struct Gate<V> {
    routes: Vec<Route<V>>,
    login_path: String,
    home_path: String,
    revalidate: bool,
}

impl<V> Gate<V> {
    /// `login_path` is where anonymous sessions are sent; `home_path` is where
    /// authenticated sessions land when they ask for an anonymous-only view.
    pub(crate) fn new(routes: Vec<Route<V>>, login_path: &str, home_path: &str) -> Self {
        Self {
            routes,
            login_path: login_path.to_owned(),
            home_path: home_path.to_owned(),
            revalidate: false,
        }
    }

    pub(crate) fn with_revalidation(mut self, revalidate: bool) -> Self {
        self.revalidate = revalidate;
        self
    }

    /// Finds the view route for `path`, following aliases. Gives up if the
    /// aliases loop.
    pub(crate) fn resolve(&self, path: &str) -> Option<&Route<V>> {
        let mut path = normalize(path);
        for _ in 0..=self.routes.len() {
            let route = self.routes.iter().find(|route| route.path == path)?;
            match route.target {
                Target::View(_) => return Some(route),
                Target::Alias(ref to) => path = normalize(to),
            }
        }
        warn!("Route aliases starting at {} form a cycle", path);
        None
    }

    pub(crate) fn decide(&self, route: &Route<V>, session: &Manager) -> Decision {
        match (route.requirement, session.is_authenticated()) {
            (Requirement::Authenticated, false) => Decision::Redirect(self.login_path.clone()),
            (Requirement::Anonymous, true) => Decision::Redirect(self.home_path.clone()),
            (Requirement::None | Requirement::Authenticated | Requirement::Anonymous, _) => {
                Decision::Allow
            }
        }
    }

    pub(crate) fn navigate(&self, path: &str, session: &mut Manager) -> Outcome<'_, V> {
        if self.revalidate {
            let _ = session.validate_credential();
        }

        let Some(route) = self.resolve(path) else {
            debug!("No route matches {}", path);
            return Outcome::NotFound;
        };

        match self.decide(route, session) {
            Decision::Allow => Outcome::Enter(route),
            Decision::Redirect(to) => {
                debug!("Navigation to {} redirected to {}", path, to);
                Outcome::Redirect(to)
            }
        }
    }
}

fn normalize(path: &str) -> String {
    match path.trim_end_matches('/') {
        "" => "/".to_owned(),
        trimmed => trimmed.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    use crate::session::{credential::tests::token_expiring_at, AuthPayload};

    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    enum Screen {
        Login,
        Home,
        Public,
    }

    fn gate() -> Gate<Screen> {
        Gate::new(
            vec![
                Route::alias("/", "/login"),
                Route::view("/login", Screen::Login, Requirement::Anonymous),
                Route::view("/home", Screen::Home, Requirement::Authenticated),
                Route::view("/about", Screen::Public, Requirement::None),
                Route::alias("/loop-a", "/loop-b"),
                Route::alias("/loop-b", "/loop-a"),
            ],
            "/login",
            "/home",
        )
    }

    fn signed_in(token: String) -> Manager {
        let mut session = Manager::new();
        session.set_session(AuthPayload::new(Some(token), None));
        session
    }

    fn route(gate: &Gate<Screen>, path: &str) -> Route<Screen> {
        gate.resolve(path).cloned().unwrap()
    }

    #[test]
    fn decision_table() {
        let gate = gate();
        let anonymous = Manager::new();
        let authenticated = signed_in("a.b.c".to_owned());

        let home = route(&gate, "/home");
        let login = route(&gate, "/login");
        let about = route(&gate, "/about");

        assert_eq!(gate.decide(&home, &anonymous), Decision::Redirect("/login".to_owned()));
        assert_eq!(gate.decide(&home, &authenticated), Decision::Allow);
        assert_eq!(gate.decide(&login, &anonymous), Decision::Allow);
        assert_eq!(gate.decide(&login, &authenticated), Decision::Redirect("/home".to_owned()));
        assert_eq!(gate.decide(&about, &anonymous), Decision::Allow);
        assert_eq!(gate.decide(&about, &authenticated), Decision::Allow);
    }

    #[test]
    fn navigate_follows_aliases() {
        let gate = gate();
        let mut session = Manager::new();
        match gate.navigate("/", &mut session) {
            Outcome::Enter(route) => assert_eq!(route.target, Target::View(Screen::Login)),
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(
            gate.navigate("/home/", &mut session),
            Outcome::Redirect("/login".to_owned())
        );
    }

    #[test]
    fn unknown_and_cyclic_paths_are_not_found() {
        let gate = gate();
        let mut session = Manager::new();
        assert_eq!(gate.navigate("/nowhere", &mut session), Outcome::NotFound);
        assert_eq!(gate.navigate("/loop-a", &mut session), Outcome::NotFound);
    }

    #[test]
    fn expired_credential_passes_without_revalidation() {
        let gate = gate();
        let mut session = signed_in(token_expiring_at(1));
        assert!(matches!(gate.navigate("/home", &mut session), Outcome::Enter(_)));
        assert!(session.is_authenticated());
    }

    #[test]
    fn revalidation_drops_expired_credential() {
        let gate = gate().with_revalidation(true);
        let mut session = signed_in(token_expiring_at(1));
        assert_eq!(
            gate.navigate("/home", &mut session),
            Outcome::Redirect("/login".to_owned())
        );
        assert!(!session.is_authenticated());
    }

    #[test]
    fn revalidation_keeps_live_credential() {
        let gate = gate().with_revalidation(true);
        let later = SystemTime::now() + Duration::from_secs(3600);
        let exp = later
            .duration_since(UNIX_EPOCH)
            .map_or(u64::MAX, |d| d.as_secs());
        let mut session = signed_in(token_expiring_at(exp));
        assert!(matches!(gate.navigate("/home", &mut session), Outcome::Enter(_)));
    }
}
