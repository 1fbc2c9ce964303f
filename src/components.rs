//! Yew components that expose the session layer to the view.

use crate::interactions::StatusLine;
use crate::session::SessionCacheService;
use std::ops::Deref;
use std::rc::Rc;
use yew::prelude::*;

/// Shared session service, compared by identity so context consumers only
/// re-render when the session itself is replaced.
#[derive(Debug, Clone)]
pub struct SessionHandle(Rc<SessionCacheService>);

impl SessionHandle {
    pub fn new(session: SessionCacheService) -> Self {
        Self(Rc::new(session))
    }

    pub fn rc(&self) -> Rc<SessionCacheService> {
        self.0.clone()
    }
}

impl PartialEq for SessionHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Deref for SessionHandle {
    type Target = SessionCacheService;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[derive(Properties, PartialEq)]
pub struct SessionProviderProps {
    pub session: SessionHandle,
    #[prop_or_default]
    pub children: Html,
}

/// Makes one session available to every component below it.
#[function_component]
pub fn SessionProvider(props: &SessionProviderProps) -> Html {
    html! {
        <ContextProvider<SessionHandle> context={props.session.clone()}>
            { props.children.clone() }
        </ContextProvider<SessionHandle>>
    }
}

#[derive(Properties, PartialEq)]
pub struct StatusBannerProps {
    pub status: StatusLine,
}

/// The view's update area: progress, result, or raw error text.
#[function_component]
pub fn StatusBanner(props: &StatusBannerProps) -> Html {
    let (class, text) = match &props.status {
        StatusLine::Idle => ("update-area idle", ""),
        StatusLine::Progress(text) => ("update-area in-progress", text.as_str()),
        StatusLine::Done(text) => ("update-area done", text.as_str()),
        StatusLine::Error(text) => ("update-area current-error", text.as_str()),
    };
    html! {
        <div id="update-area" class={class}>
            { text }
            if matches!(props.status, StatusLine::Progress(_)) {
                <img src="/static/ajax-loader.gif" />
            }
        </div>
    }
}
