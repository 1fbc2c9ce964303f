//! Browser entry point: builds the session service for the current page
//! and mounts the view.

use log::{error, info};
use sc_explorer::{
    browser::{FetchTransport, WindowConfirm},
    chart::{self, PlotlyRenderer},
    components::{SessionHandle, SessionProvider, StatusBanner},
    config::{SessionConfig, BARPLOT_ID, CLUSTER_SELECT_ID, SCATTER_PLOT_ID, TOP_GENES_VIEW_ID},
    hooks::{use_session, use_status_area},
    interactions::ViewController,
    query::{BarplotQuery, ScatterplotQuery},
    session::SessionCacheService,
};
use std::rc::Rc;
use yew::prelude::*;

fn build_session() -> Option<SessionHandle> {
    match SessionConfig::from_location() {
        Ok(config) => {
            let transport = Rc::new(FetchTransport::new(config.clone()));
            Some(SessionHandle::new(SessionCacheService::new(transport, config)))
        }
        Err(err) => {
            error!("cannot determine session path: {}", err);
            None
        }
    }
}

/// Plot containers, status line and cache control for one session.
#[function_component(Viewer)]
fn viewer() -> Html {
    let session = use_session();
    let (status, status_area) = use_status_area();

    let controller = use_memo(session.clone(), move |session| {
        session.as_ref().map(|handle| {
            Rc::new(ViewController::new(
                handle.rc(),
                Rc::new(PlotlyRenderer),
                status_area.clone(),
                Rc::new(WindowConfirm),
            ))
        })
    });

    // Initial render, same as a page load
    {
        let controller = controller.clone();
        use_effect_with((), move |_| {
            if let Some(controller) = (*controller).clone() {
                let on_click = controller.clone();
                let on_select = controller.clone();
                chart::bind_selection(
                    move |points| {
                        let controller = on_click.clone();
                        wasm_bindgen_futures::spawn_local(async move { controller.click_points(&points).await });
                    },
                    move |points| on_select.select_points(&points),
                );
                wasm_bindgen_futures::spawn_local(async move {
                    controller.load_scatterplot(&ScatterplotQuery::default()).await;
                    controller.load_barplot(&BarplotQuery::for_cluster(0)).await;
                });
            }
            || ()
        });
    }

    let on_clear_cache = {
        let controller = controller.clone();
        Callback::from(move |_: MouseEvent| {
            if let Some(controller) = &*controller {
                controller.clear_cache();
                info!("session cache cleared");
            }
        })
    };

    let on_cell_info = {
        let controller = controller.clone();
        Callback::from(move |_: MouseEvent| {
            if let Some(controller) = (*controller).clone() {
                wasm_bindgen_futures::spawn_local(async move { controller.cell_info().await });
            }
        })
    };

    html! {
        <div class="session-view">
            <StatusBanner status={status} />
            if session.is_none() {
                <div class="current-error">{ "No session is available for this page." }</div>
            }
            <div id={SCATTER_PLOT_ID}></div>
            <select id={CLUSTER_SELECT_ID}></select>
            <div class="barplot-area">
                <div id={BARPLOT_ID}></div>
                <textarea id={TOP_GENES_VIEW_ID} readonly=true></textarea>
            </div>
            <button class="cell-info-button" onclick={on_cell_info}>
                { "Cell info" }
            </button>
            <button class="clear-cache-button" onclick={on_clear_cache}>
                { "Clear Cache" }
            </button>
        </div>
    }
}

/// App wrapper providing the session context.
#[function_component]
pub fn App() -> Html {
    let session = use_memo((), |_| build_session());
    match &*session {
        Some(handle) => html! {
            <SessionProvider session={handle.clone()}>
                <Viewer />
            </SessionProvider>
        },
        None => html! { <Viewer /> },
    }
}

/// Entry point: installs the panic hook and console logger, then renders the App.
fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::new(log::Level::Debug));
    yew::Renderer::<App>::new().render();
}
