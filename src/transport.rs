//! Outbound request seam between the session and the server.

use crate::endpoint::Endpoint;
use crate::error::RequestError;
use crate::params::ParameterSet;
use futures::future::LocalBoxFuture;

/// Posts a parameter set to an endpoint of the current session.
///
/// Implementations return the success body, or an error with the
/// Error Result already split off (see [`crate::error::decode_response`]).
/// Futures are `!Send`; everything runs on the page's event loop.
pub trait Transport {
    fn post<'a>(
        &'a self,
        endpoint: &'a Endpoint,
        params: &'a ParameterSet,
    ) -> LocalBoxFuture<'a, Result<String, RequestError>>;
}
