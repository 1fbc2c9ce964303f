//! Browser-backed collaborators: fetch transport and confirmation dialogs.

use crate::config::{SessionConfig, FORM_CONTENT_TYPE};
use crate::endpoint::Endpoint;
use crate::error::{decode_response, RequestError};
use crate::interactions::Confirm;
use crate::params::ParameterSet;
use crate::transport::Transport;
use futures::future::{FutureExt, LocalBoxFuture};
use js_sys::Promise;
use log::debug;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, Response};

fn js_error(err: JsValue) -> RequestError {
    RequestError::Transport(err.as_string().unwrap_or_else(|| format!("{:?}", err)))
}

impl SessionConfig {
    /// Endpoints live under the page's own path, e.g. `/user/<id>/view`.
    pub fn from_location() -> Result<Self, RequestError> {
        let path = gloo_utils::window().location().pathname().map_err(js_error)?;
        Ok(Self::new(path))
    }
}

/// `POST`s form-encoded parameters with `window.fetch`.
#[derive(Debug, Clone)]
pub struct FetchTransport {
    config: SessionConfig,
}

impl FetchTransport {
    pub fn new(config: SessionConfig) -> Self {
        Self { config }
    }

    async fn send(&self, endpoint: &Endpoint, params: &ParameterSet) -> Result<String, RequestError> {
        let url = self.config.url_for(&endpoint.path());
        debug!("POST {}", url);

        let init = RequestInit::new();
        init.set_method("POST");
        init.set_body(&JsValue::from_str(&params.to_form_body()));
        let request = Request::new_with_str_and_init(&url, &init).map_err(js_error)?;
        request
            .headers()
            .set("Content-Type", FORM_CONTENT_TYPE)
            .map_err(js_error)?;

        let response: Response = JsFuture::from(gloo_utils::window().fetch_with_request(&request))
            .await
            .map_err(js_error)?
            .dyn_into()
            .map_err(js_error)?;
        if !response.ok() {
            return Err(RequestError::Transport(format!(
                "{} returned HTTP {}",
                endpoint,
                response.status()
            )));
        }

        let text: Promise = response.text().map_err(js_error)?;
        let body = JsFuture::from(text).await.map_err(js_error)?;
        let body = body
            .as_string()
            .ok_or_else(|| RequestError::Transport(format!("{} returned a non-text body", endpoint)))?;
        decode_response(body)
    }
}

impl Transport for FetchTransport {
    fn post<'a>(
        &'a self,
        endpoint: &'a Endpoint,
        params: &'a ParameterSet,
    ) -> LocalBoxFuture<'a, Result<String, RequestError>> {
        self.send(endpoint, params).boxed_local()
    }
}

/// `window.confirm`; a dialog that cannot be shown counts as declined.
#[derive(Debug, Default, Clone, Copy)]
pub struct WindowConfirm;

impl Confirm for WindowConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        gloo_utils::window().confirm_with_message(prompt).unwrap_or(false)
    }
}
