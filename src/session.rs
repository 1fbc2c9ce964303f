//! The per-session request layer: cache-first queries, the bar-plot
//! single-flight guard, and cache invalidation after mutations.
//!
//! One [`SessionCacheService`] is built when the view loads and shared by
//! `Rc` with everything that talks to the server.

use crate::cache::{Payload, QueryFamily, RequestCache};
use crate::config::SessionConfig;
use crate::endpoint::Endpoint;
use crate::error::RequestError;
use crate::guard::{GuardPolicy, InFlightGuard};
use crate::interactions::Confirm;
use crate::mutation::Mutation;
use crate::params::{CacheKey, ParameterSet};
use crate::query::{BarplotQuery, GeneSetQuery, ScatterplotQuery};
use crate::transport::Transport;
use crate::utils::prepare_barplot;
use futures::future::{self, Either};
use log::{debug, info, warn};
use serde_json::Value;
use std::fmt;
use std::rc::Rc;

/// Where a query result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Cache,
    Network,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Fetched {
    pub payload: Payload,
    pub source: Source,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BarplotOutcome {
    Ready(Fetched),
    /// Dropped because another bar-plot request was outstanding.
    Rejected,
    /// Abandoned by a newer invocation or an invalidation.
    Abandoned,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MutationOutcome {
    /// The user declined the confirmation; nothing was sent.
    Declined,
    Completed { message: String },
}

pub struct SessionCacheService {
    transport: Rc<dyn Transport>,
    config: SessionConfig,
    cache: RequestCache,
    barplot_guard: InFlightGuard,
    mutation_guard: InFlightGuard,
}

impl fmt::Debug for SessionCacheService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionCacheService")
            .field("config", &self.config)
            .field("cache", &self.cache)
            .field("barplot_guard", &self.barplot_guard)
            .field("mutation_guard", &self.mutation_guard)
            .finish_non_exhaustive()
    }
}

fn parse_payload(endpoint: &Endpoint, body: &str) -> Result<Value, RequestError> {
    serde_json::from_str(body).map_err(|source| RequestError::Malformed {
        endpoint: endpoint.path().into_owned(),
        source,
    })
}

impl SessionCacheService {
    pub fn new(transport: Rc<dyn Transport>, config: SessionConfig) -> Self {
        Self {
            transport,
            config,
            cache: RequestCache::new(),
            barplot_guard: InFlightGuard::new("update_barplot"),
            mutation_guard: InFlightGuard::new("cluster operation"),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn cache(&self) -> &RequestCache {
        &self.cache
    }

    pub fn barplot_pending(&self) -> bool {
        self.barplot_guard.is_pending()
    }

    /// Cache-first query on the store of the endpoint's family.
    ///
    /// On a miss the response is parsed and written through; Error Results and
    /// malformed bodies are returned without touching the cache. Bar plots are
    /// refused here since they must pass the single-flight guard.
    pub async fn query(&self, endpoint: &Endpoint, params: &ParameterSet) -> Result<Fetched, RequestError> {
        self.query_keyed(endpoint, params, params.canonicalize()).await
    }

    async fn query_keyed(
        &self,
        endpoint: &Endpoint,
        params: &ParameterSet,
        key: CacheKey,
    ) -> Result<Fetched, RequestError> {
        let family = match endpoint.family() {
            Some(QueryFamily::Barplot) | None => return Err(RequestError::NotCacheable(endpoint.path().into_owned())),
            Some(family) => family,
        };
        if let Some(payload) = self.cache.lookup(family, &key) {
            return Ok(Fetched {
                payload,
                source: Source::Cache,
            });
        }
        let generation = self.cache.generation(family);
        let body = self.transport.post(endpoint, params).await?;
        let payload = Rc::new(parse_payload(endpoint, &body)?);
        self.cache.store_if_current(family, key, generation, payload.clone());
        Ok(Fetched {
            payload,
            source: Source::Network,
        })
    }

    pub async fn update_scatterplot(&self, query: &ScatterplotQuery) -> Result<Fetched, RequestError> {
        self.query(&Endpoint::UpdateScatterplot, &query.to_params()).await
    }

    pub async fn update_gene_query(&self, query: &GeneSetQuery) -> Result<Fetched, RequestError> {
        let endpoint = Endpoint::UpdateGeneSet(query.database.clone());
        self.query_keyed(&endpoint, &query.fields, query.cache_key()).await
    }

    /// Guarded bar-plot query.
    ///
    /// The guard is consulted before the cache, so an invocation while another
    /// is outstanding is dropped even if its answer is cached. The guard is back
    /// to idle on every return path.
    pub async fn update_barplot(&self, query: &BarplotQuery) -> Result<BarplotOutcome, RequestError> {
        let mut permit = match self.config.barplot_policy {
            GuardPolicy::DropNewest => match self.barplot_guard.try_acquire() {
                Ok(permit) => permit,
                Err(rejection) => {
                    debug!("{}, dropping request", rejection);
                    return Ok(BarplotOutcome::Rejected);
                }
            },
            GuardPolicy::SupersedePending => self.barplot_guard.supersede(),
        };

        let params = query.to_params();
        let key = params.canonicalize();
        if let Some(payload) = self.cache.lookup(QueryFamily::Barplot, &key) {
            return Ok(BarplotOutcome::Ready(Fetched {
                payload,
                source: Source::Cache,
            }));
        }

        let endpoint = Endpoint::UpdateBarplot;
        let generation = self.cache.generation(QueryFamily::Barplot);
        let flight = permit.flight();
        let request = self.transport.post(&endpoint, &params);
        let body = match future::select(request, permit.cancelled()).await {
            Either::Left((reply, _)) => reply?,
            Either::Right(_) => {
                debug!("bar plot flight {} abandoned", flight);
                return Ok(BarplotOutcome::Abandoned);
            }
        };

        let mut plot = parse_payload(&endpoint, &body)?;
        prepare_barplot(&mut plot);
        let payload = Rc::new(plot);
        self.cache
            .store_if_current(QueryFamily::Barplot, key, generation, payload.clone());
        Ok(BarplotOutcome::Ready(Fetched {
            payload,
            source: Source::Network,
        }))
    }

    /// Plain JSON read that bypasses the cache.
    pub async fn fetch_uncached(&self, endpoint: &Endpoint, params: &ParameterSet) -> Result<Payload, RequestError> {
        let body = self.transport.post(endpoint, params).await?;
        Ok(Rc::new(parse_payload(endpoint, &body)?))
    }

    /// Plain-text request that bypasses the cache, e.g. a colormap creation ack.
    pub async fn send_uncached(&self, endpoint: &Endpoint, params: &ParameterSet) -> Result<String, RequestError> {
        self.transport.post(endpoint, params).await
    }

    /// Run a session-mutating operation and invalidate every cached result on success.
    pub async fn run_mutation(
        &self,
        mutation: &Mutation,
        confirm: &dyn Confirm,
    ) -> Result<MutationOutcome, RequestError> {
        self.run_mutation_with(mutation, confirm, || ()).await
    }

    /// [`Self::run_mutation`], calling `on_send` once the request is about to go out.
    pub async fn run_mutation_with(
        &self,
        mutation: &Mutation,
        confirm: &dyn Confirm,
        on_send: impl FnOnce(),
    ) -> Result<MutationOutcome, RequestError> {
        mutation.validate()?;
        let _permit = if mutation.is_exclusive() {
            match self.mutation_guard.try_acquire() {
                Ok(permit) => Some(permit),
                Err(_) => return Err(RequestError::AlreadyRunning(mutation.name())),
            }
        } else {
            None
        };
        if let Some(prompt) = mutation.confirmation() {
            if !confirm.confirm(prompt) {
                debug!("{} declined", mutation.name());
                return Ok(MutationOutcome::Declined);
            }
        }

        let endpoint = mutation.endpoint();
        info!("running {}", mutation.name());
        on_send();
        let body = match self.transport.post(&endpoint, &mutation.params()).await {
            Ok(body) => body,
            Err(err) => {
                warn!("{} failed: {}", mutation.name(), err);
                return Err(err);
            }
        };
        if endpoint.invalidates_session() {
            self.invalidate();
        }
        Ok(MutationOutcome::Completed {
            message: mutation.success_message(&body),
        })
    }

    /// Forget every cached result and abandon any bar-plot flight still in the air.
    pub fn invalidate(&self) {
        self.cache.clear_all();
        self.barplot_guard.cancel_pending();
    }
}
