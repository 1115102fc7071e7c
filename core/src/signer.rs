use crate::{Context, Error, ProvideCredential, Result, SignRequest, SigningCredential};
use log::debug;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Signer is the main struct used to sign the request.
///
/// It keeps the last loaded credential and only asks the provider for a new one
/// once the cached credential is no longer valid. Cloning a signer shares the
/// cache.
#[derive(Clone, Debug)]
pub struct Signer<K: SigningCredential> {
    ctx: Context,
    loader: Arc<dyn ProvideCredential<Credential = K>>,
    builder: Arc<dyn SignRequest<Credential = K>>,
    credential: Arc<Mutex<Option<K>>>,
}

impl<K: SigningCredential> Signer<K> {
    /// Create a new signer.
    pub fn new(
        ctx: Context,
        loader: impl ProvideCredential<Credential = K>,
        builder: impl SignRequest<Credential = K>,
    ) -> Self {
        Self {
            ctx,

            loader: Arc::new(loader),
            builder: Arc::new(builder),
            credential: Arc::new(Mutex::new(None)),
        }
    }

    /// The context this signer loads credentials with.
    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// Load a valid credential, reusing the cached one when possible.
    pub async fn credential(&self) -> Result<K> {
        let cached = self.cached();
        if cached.is_valid() {
            if let Some(cred) = cached {
                return Ok(cred);
            }
        }

        debug!("no valid cached credential, loading a new one");
        let loaded = self.loader.provide_credential(&self.ctx).await?;
        *self.credential.lock().expect("lock poisoned") = loaded.clone();
        loaded.ok_or_else(|| Error::credential_invalid("no valid credential found"))
    }

    /// Signing request.
    pub async fn sign(
        &self,
        req: &mut http::request::Parts,
        expires_in: Option<Duration>,
    ) -> Result<()> {
        let credential = self.credential().await?;

        self.builder
            .sign_request(&self.ctx, req, Some(&credential), expires_in)
            .await
    }

    fn cached(&self) -> Option<K> {
        self.credential.lock().expect("lock poisoned").clone()
    }
}
