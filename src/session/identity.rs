// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Backends issue either numeric or string identifiers.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub(crate) enum PrincipalId {
    Number(i64),
    Text(String),
}

impl fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(ref s) => f.write_str(s),
        }
    }
}

/// The authenticated principal, as described by the backend.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub(crate) struct Identity {
    pub(crate) id: Option<PrincipalId>,
    pub(crate) name: String,
    pub(crate) role: Option<String>,
}

impl PrincipalId {
    /// Reads an identifier from a loosely typed field. Numbers that are not
    /// whole are kept in their textual form.
    fn from_value(value: &Value) -> Option<Self> {
        match *value {
            Value::Number(ref n) => Some(
                n.as_i64()
                    .map_or_else(|| Self::Text(n.to_string()), Self::Number),
            ),
            Value::String(ref s) => Some(Self::Text(s.clone())),
            Value::Null | Value::Bool(_) | Value::Array(_) | Value::Object(_) => None,
        }
    }
}

impl Identity {
    /// Reads an identity record without rejecting it. Anything but an object
    /// is not a record; mistyped fields are treated as absent.
    fn from_value(value: &Value) -> Option<Self> {
        let record = value.as_object()?;
        Some(Self {
            id: record.get("id").and_then(PrincipalId::from_value),
            name: record
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_owned(),
            role: record
                .get("role")
                .and_then(Value::as_str)
                .map(str::to_owned),
        })
    }
}

/// Result of a successful login or registration.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct AuthPayload {
    token: Option<String>,
    identity: Option<Identity>,
}

impl AuthPayload {
    pub(crate) fn new(token: Option<String>, identity: Option<Identity>) -> Self {
        Self { token, identity }
    }

    /// Extracts the token and identity from a response body. Older backends
    /// nest the principal under `data.employee`; both shapes are accepted and
    /// the top-level `employee` wins when both are records. Nothing here
    /// fails: a body of the wrong shape simply yields an empty payload.
    pub(crate) fn from_value(body: &Value) -> Self {
        let token = body.get("token").and_then(Value::as_str).map(str::to_owned);
        let identity = body
            .get("employee")
            .and_then(Identity::from_value)
            .or_else(|| {
                body.get("data")
                    .and_then(|data| data.get("employee"))
                    .and_then(Identity::from_value)
            });
        Self { token, identity }
    }

    /// Splits the payload into its token and identity. Empty tokens count as
    /// absent.
    pub(crate) fn into_parts(self) -> (Option<String>, Option<Identity>) {
        (self.token.filter(|token| !token.is_empty()), self.identity)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use serde_test::{assert_de_tokens, assert_tokens, Token};

    use crate::error::Result;

    use super::*;

    #[test]
    fn principal_id_wire_shapes() {
        assert_tokens(&PrincipalId::Number(7), &[Token::I64(7)]);
        assert_tokens(&PrincipalId::Text("u-7".to_owned()), &[Token::Str("u-7")]);
    }

    #[test]
    fn identity_from_struct_tokens() {
        assert_de_tokens(
            &Identity {
                id: Some(PrincipalId::Number(3)),
                name: "Aiko".to_owned(),
                role: Some("admin".to_owned()),
            },
            &[
                Token::Struct {
                    name: "Identity",
                    len: 3,
                },
                Token::Str("id"),
                Token::Some,
                Token::U64(3),
                Token::Str("name"),
                Token::Str("Aiko"),
                Token::Str("role"),
                Token::Some,
                Token::Str("admin"),
                Token::StructEnd,
            ],
        );
    }

    #[test]
    fn identity_ignores_unknown_fields() -> Result<()> {
        let identity: Identity = serde_json::from_value(json!({
            "id": "e-1",
            "name": "Bo",
            "email": "bo@example.com",
        }))?;
        assert_eq!(identity.id, Some(PrincipalId::Text("e-1".to_owned())));
        assert_eq!(identity.role, None);
        Ok(())
    }

    #[test]
    fn payload_prefers_top_level_identity() {
        let payload = AuthPayload::from_value(&json!({
            "token": "t",
            "employee": { "id": 1, "name": "Top" },
            "data": { "employee": { "id": 2, "name": "Nested" } },
        }));
        let (token, identity) = payload.into_parts();
        assert_eq!(token.as_deref(), Some("t"));
        assert_eq!(identity.map(|i| i.name).as_deref(), Some("Top"));
    }

    #[test]
    fn payload_falls_back_to_nested_identity() {
        let payload = AuthPayload::from_value(&json!({
            "token": "t",
            "employee": null,
            "data": { "employee": { "id": 2, "name": "Nested" } },
        }));
        let (_, identity) = payload.into_parts();
        assert_eq!(identity.map(|i| i.name).as_deref(), Some("Nested"));
    }

    #[test]
    fn payload_tolerates_mistyped_fields() {
        let payload = AuthPayload::from_value(&json!({
            "token": "t",
            "employee": { "id": 1.5, "name": null, "role": 3 },
            "data": "ok",
        }));
        assert_eq!(
            payload.into_parts(),
            (
                Some("t".to_owned()),
                Some(Identity {
                    id: Some(PrincipalId::Text("1.5".to_owned())),
                    name: String::new(),
                    role: None,
                })
            )
        );
    }

    #[test]
    fn payload_of_wrong_shape_is_empty() {
        assert_eq!(AuthPayload::from_value(&json!("ok")).into_parts(), (None, None));
        assert_eq!(
            AuthPayload::from_value(&json!({ "token": 7, "data": [1] })).into_parts(),
            (None, None)
        );
    }

    #[test]
    fn empty_token_is_absent() {
        let payload = AuthPayload::from_value(&json!({ "token": "" }));
        assert_eq!(payload.into_parts(), (None, None));
    }
}
