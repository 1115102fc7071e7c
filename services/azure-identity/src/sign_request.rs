use crate::AccessToken;
use async_trait::async_trait;
use azaccess_core::{Context, Error, Result, SignRequest};
use http::request::Parts;
use http::{header, HeaderValue};
use std::time::Duration;

/// Attach an Entra ID access token as `Authorization: Bearer <token>`.
///
/// Key Vault and the Azure Resource Manager accept nothing else.
#[derive(Debug, Default, Clone, Copy)]
pub struct BearerTokenSigner;

impl BearerTokenSigner {
    /// Create a new bearer token signer.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SignRequest for BearerTokenSigner {
    type Credential = AccessToken;

    async fn sign_request(
        &self,
        _: &Context,
        req: &mut Parts,
        credential: Option<&Self::Credential>,
        expires_in: Option<Duration>,
    ) -> Result<()> {
        let Some(cred) = credential else {
            return Err(Error::request_invalid("credential is required"));
        };
        if expires_in.is_some() {
            return Err(Error::request_invalid(
                "bearer token can't be used in query string",
            ));
        }

        let mut value: HeaderValue = format!("Bearer {}", cred.token).parse()?;
        value.set_sensitive(true);
        req.headers.insert(header::AUTHORIZATION, value);

        Ok(())
    }
}
