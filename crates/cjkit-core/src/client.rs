//! Client facade wiring configuration, transport, cache and endpoints.

use std::sync::Arc;

use crate::api::{
    AdvertiserLookup, CommissionDetail, LinkSearch, OfferFeed, ProductSearch, ProgramTerms,
    PromotionalProperties,
};
use crate::cache::ResponseCache;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::executor::RequestExecutor;
use crate::http_client::{HttpClient, ReqwestHttpClient};

/// Entry point of the SDK. Owns one [`RequestExecutor`] that all endpoint
/// modules share, so they also share the transport and the response cache.
///
/// ```no_run
/// # async fn run() -> Result<(), cjkit_core::ApiError> {
/// use cjkit_core::{CjClient, ClientConfig};
///
/// let config = ClientConfig::from_env()?.with_cache(true);
/// let client = CjClient::new(&config)?;
/// let joined = client.advertisers().joined().await?;
/// println!("{} joined programs", joined.total_matched);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct CjClient {
    executor: Arc<RequestExecutor>,
    publisher_id: String,
    website_id: String,
}

impl CjClient {
    /// Build a client over the production reqwest transport.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        Self::with_transport(config, Arc::new(ReqwestHttpClient::new()))
    }

    /// Build a client over an injected transport. Tests use this with a
    /// recording stub.
    pub fn with_transport(
        config: &ClientConfig,
        transport: Arc<dyn HttpClient>,
    ) -> Result<Self, ApiError> {
        let cache = match config.cache_dir() {
            Some(dir) => ResponseCache::new(config.cache_enabled(), config.cache_ttl(), dir),
            None => ResponseCache::in_temp_dir(config.cache_enabled(), config.cache_ttl()),
        };
        let executor = RequestExecutor::new(
            transport,
            config.access_token(),
            config.timeout(),
            config.debug(),
            cache,
        )?;
        Ok(Self {
            executor: Arc::new(executor),
            publisher_id: config.publisher_id().to_owned(),
            website_id: config.website_id().to_owned(),
        })
    }

    pub fn advertisers(&self) -> AdvertiserLookup {
        AdvertiserLookup::new(Arc::clone(&self.executor), self.publisher_id.clone())
    }

    pub fn links(&self) -> LinkSearch {
        LinkSearch::new(Arc::clone(&self.executor), self.website_id.clone())
    }

    pub fn products(&self) -> ProductSearch {
        ProductSearch::new(
            Arc::clone(&self.executor),
            self.publisher_id.clone(),
            self.website_id.clone(),
        )
    }

    pub fn commissions(&self) -> CommissionDetail {
        CommissionDetail::new(Arc::clone(&self.executor), self.publisher_id.clone())
    }

    pub fn program_terms(&self) -> ProgramTerms {
        ProgramTerms::new(Arc::clone(&self.executor), self.publisher_id.clone())
    }

    pub fn promotional_properties(&self) -> PromotionalProperties {
        PromotionalProperties::new(Arc::clone(&self.executor), self.publisher_id.clone())
    }

    pub fn offers(&self) -> OfferFeed {
        OfferFeed::new(Arc::clone(&self.executor))
    }

    /// The response cache backing every endpoint of this client.
    pub fn cache(&self) -> &ResponseCache {
        self.executor.cache()
    }
}
