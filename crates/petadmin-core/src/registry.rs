// ── Registry ──
//
// Session-scoped owner of the API client and one store per entity kind.
// Built explicitly at startup and passed to consumers; cheap to clone.

use std::future::Future;
use std::sync::Arc;

use petadmin_api::ApiClient;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::CoreError;
use crate::facade::{PetFacade, TutorFacade};
use crate::store::{EntityStore, PetStore, TutorStore};

/// The main entry point for consumers.
#[derive(Clone)]
pub struct Registry {
    inner: Arc<RegistryInner>,
}

struct RegistryInner {
    config: ClientConfig,
    client: Arc<ApiClient>,
    pets: Arc<PetStore>,
    tutors: Arc<TutorStore>,
}

impl Registry {
    /// Build the HTTP client, log in when credentials are configured, and
    /// create the pet and tutor stores.
    pub async fn connect(config: ClientConfig) -> Result<Self, CoreError> {
        let client = ApiClient::new(config.url.as_str(), &config.transport())?;

        if let Some(ref creds) = config.credentials {
            client.login(&creds.username, &creds.password).await?;
            debug!(user = %creds.username, "login successful");
        } else {
            debug!("no credentials configured -- skipping login");
        }

        Ok(Self::with_client(config, Arc::new(client)))
    }

    /// Wrap an already-authenticated client.
    pub fn with_client(config: ClientConfig, client: Arc<ApiClient>) -> Self {
        let pets = EntityStore::new(PetFacade::new(Arc::clone(&client)), config.store);
        let tutors = EntityStore::new(TutorFacade::new(Arc::clone(&client)), config.store);

        Self {
            inner: Arc::new(RegistryInner {
                config,
                client,
                pets,
                tutors,
            }),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    pub fn client(&self) -> &Arc<ApiClient> {
        &self.inner.client
    }

    pub fn pets(&self) -> &Arc<PetStore> {
        &self.inner.pets
    }

    pub fn tutors(&self) -> &Arc<TutorStore> {
        &self.inner.tutors
    }

    /// Stop both search pipelines and drop the session token.
    pub async fn shutdown(&self) {
        self.inner.pets.shutdown().await;
        self.inner.tutors.shutdown().await;
        self.inner.client.logout();
        debug!("registry shut down");
    }

    /// One-shot: connect, run closure, shut down.
    pub async fn oneshot<F, Fut, T, E>(config: ClientConfig, f: F) -> Result<T, E>
    where
        F: FnOnce(Registry) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: From<CoreError>,
    {
        let registry = Registry::connect(config).await.map_err(E::from)?;
        let result = f(registry.clone()).await;
        registry.shutdown().await;
        result
    }
}
