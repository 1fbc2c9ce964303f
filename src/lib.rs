//! Client-side request layer for the single-cell analysis view.
//!
//! Every expensive round trip (scatterplots, differential-expression bar
//! plots, gene-set queries) goes through a [`SessionCacheService`]: results
//! are cached per query family under a canonical parameter fingerprint, bar
//! plots are single-flight, and any operation that changes the dataset on the
//! server clears every cached result.
//!
//! Rendering is delegated to a [`interactions::Renderer`]; in the browser
//! that is [`chart::PlotlyRenderer`].

pub mod browser;
pub mod cache;
pub mod chart;
pub mod components;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod guard;
pub mod hooks;
pub mod interactions;
pub mod mutation;
pub mod params;
pub mod query;
pub mod session;
pub mod transport;
pub mod utils;

pub use cache::{Payload, QueryFamily, RequestCache};
pub use endpoint::{Endpoint, GeneSetDatabase};
pub use error::RequestError;
pub use guard::{GuardPolicy, InFlightGuard};
pub use params::{CacheKey, ParamValue, ParameterSet};
pub use session::{BarplotOutcome, Fetched, MutationOutcome, SessionCacheService, Source};
