//! Query-to-weather service
//!
//! Interprets a query, answers from the cache when a fresh response exists
//! and otherwise asks the [`WeatherProvider`], caching what it returns.
//! Geocoding named places is the provider's business.

use crate::cache::{CacheKey, ResponseCache};
use crate::config::WeatherSenseConfig;
use crate::error::WeatherSenseError;
use crate::models::QueryParams;
use crate::query::QueryInterpreter;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Source of weather data for interpreted queries
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Response type stored in the cache
    type Data: Clone + Send + Sync + 'static;

    async fn fetch(&self, params: &QueryParams) -> anyhow::Result<Self::Data>;
}

/// Interpreted query together with its weather data
#[derive(Debug, Clone, Serialize)]
pub struct Answer<D> {
    pub params: QueryParams,
    pub data: D,
    /// True when `data` came from the cache
    pub cached: bool,
}

pub struct WeatherService<P: WeatherProvider> {
    interpreter: QueryInterpreter,
    cache: Arc<ResponseCache<P::Data>>,
    provider: P,
    ttl: Duration,
}

impl<P: WeatherProvider> WeatherService<P> {
    /// Service with its own cache, configured from `config`
    pub fn new(config: &WeatherSenseConfig, provider: P) -> Self {
        let ttl = config.cache.ttl();
        Self::with_cache(
            QueryInterpreter::new(&config.parser),
            Arc::new(ResponseCache::new(ttl)),
            provider,
            ttl,
        )
    }

    /// Service sharing an existing cache
    pub fn with_cache(
        interpreter: QueryInterpreter,
        cache: Arc<ResponseCache<P::Data>>,
        provider: P,
        ttl: Duration,
    ) -> Self {
        Self {
            interpreter,
            cache,
            provider,
            ttl,
        }
    }

    #[must_use]
    pub fn cache(&self) -> &Arc<ResponseCache<P::Data>> {
        &self.cache
    }

    /// Interpret `query` and return weather data for it
    #[tracing::instrument(name = "ask", level = "debug", skip_all)]
    pub async fn ask(
        &self,
        query: &str,
        reference: DateTime<Utc>,
    ) -> crate::Result<Answer<P::Data>> {
        let params = self.interpreter.interpret(query, reference)?;
        let key = CacheKey::from_params(&params);

        if let Some(data) = self.cache.get(&key) {
            info!(%key, "Serving cached weather");
            return Ok(Answer {
                params,
                data,
                cached: true,
            });
        }

        let data = self.provider.fetch(&params).await.map_err(|err| {
            warn!(%key, error = %err, "Weather provider failed");
            WeatherSenseError::provider(format!("{err:#}"))
        })?;

        info!(%key, "Fetched weather from provider");
        self.cache.put(key, data.clone(), self.ttl);
        Ok(Answer {
            params,
            data,
            cached: false,
        })
    }
}
