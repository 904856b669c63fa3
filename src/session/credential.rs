// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::{
    fmt,
    time::{SystemTime, UNIX_EPOCH},
};

use secrecy::{ExposeSecret as _, SecretString};
use serde::Deserialize;

use crate::error::Conversion;

/// Opaque bearer token issued by the backend.
///
/// Transport code only ever sees the raw string. The embedded claim set is
/// decoded solely to answer whether the token has expired.
#[derive(Clone)]
pub(crate) struct Credential(SecretString);

#[derive(Deserialize)]
struct Claims {
    exp: Option<f64>,
}

impl Credential {
    pub(crate) fn new(token: String) -> Self {
        Self(SecretString::new(token))
    }

    pub(crate) fn expose(&self) -> &str {
        self.0.expose_secret()
    }

    /// Reads the `exp` claim, in seconds since the Unix epoch. A token whose
    /// claim set has no `exp` never expires.
    pub(crate) fn expiry(&self) -> Result<Option<f64>, Conversion> {
        let segments: Vec<&str> = self.expose().split('.').collect();
        let &[_, payload, _] = segments.as_slice() else {
            return Err(Conversion::CredentialSegments(segments.len()));
        };

        let payload = payload.trim_end_matches('=');
        let decoded = base64::decode_config(payload, base64::URL_SAFE_NO_PAD)
            .or_else(|_| base64::decode_config(payload, base64::STANDARD_NO_PAD))?;
        let claims: Claims =
            serde_json::from_slice(&decoded).map_err(Conversion::CredentialClaims)?;
        Ok(claims.exp)
    }

    pub(crate) fn is_expired_at(&self, now: SystemTime) -> Result<bool, Conversion> {
        let now = now
            .duration_since(UNIX_EPOCH)
            .map_or(0.0, |elapsed| elapsed.as_secs_f64());
        Ok(self.expiry()?.map_or(false, |exp| exp <= now))
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential([REDACTED])")
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::time::Duration;

    use crate::error::Result;

    use super::*;

    pub(crate) fn token_with_claims(claims: &serde_json::Value) -> String {
        let header = base64::encode_config(br#"{"alg":"HS256","typ":"JWT"}"#, base64::URL_SAFE_NO_PAD);
        let payload = base64::encode_config(claims.to_string(), base64::URL_SAFE_NO_PAD);
        format!("{header}.{payload}.c2lnbmF0dXJl")
    }

    pub(crate) fn token_expiring_at(exp: u64) -> String {
        token_with_claims(&serde_json::json!({ "sub": "7", "exp": exp }))
    }

    fn at(secs: u64) -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(secs)
    }

    #[test]
    fn reads_expiry_claim() -> Result<()> {
        let credential = Credential::new(token_expiring_at(1_700_000_000));
        assert_eq!(credential.expiry()?, Some(1_700_000_000.0));
        assert!(!credential.is_expired_at(at(1_699_999_999))?);
        Ok(())
    }

    #[test]
    fn expires_at_the_claimed_instant() -> Result<()> {
        let credential = Credential::new(token_expiring_at(1_700_000_000));
        assert!(credential.is_expired_at(at(1_700_000_000))?);
        assert!(credential.is_expired_at(at(1_800_000_000))?);
        Ok(())
    }

    #[test]
    fn missing_expiry_never_expires() -> Result<()> {
        let credential = Credential::new(token_with_claims(&serde_json::json!({ "sub": "7" })));
        assert!(!credential.is_expired_at(at(u64::from(u32::MAX)))?);
        Ok(())
    }

    #[test]
    fn rejects_malformed_tokens() {
        assert!(matches!(
            Credential::new("not-a-jwt".to_owned()).expiry(),
            Err(Conversion::CredentialSegments(1))
        ));
        assert!(matches!(
            Credential::new("a.%%%.c".to_owned()).expiry(),
            Err(Conversion::CredentialEncoding(_))
        ));
        let not_json = base64::encode_config("hello", base64::URL_SAFE_NO_PAD);
        assert!(matches!(
            Credential::new(format!("a.{not_json}.c")).expiry(),
            Err(Conversion::CredentialClaims(_))
        ));
    }

    #[test]
    fn debug_output_hides_token() {
        let credential = Credential::new("secret.token.value".to_owned());
        assert_eq!(format!("{credential:?}"), "Credential([REDACTED])");
    }
}
