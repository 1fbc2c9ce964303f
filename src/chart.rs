//! JavaScript interop for Plotly rendering.
//! Provides Rust bindings to the helpers defined in plot_helpers.js.

use crate::config::{
    BARPLOT_ID, CELL_COLOR_SELECT_ID, CELL_SEARCH_RESULTS_ID, CLUSTER_SELECT_ID, LABEL_SELECT_ID, SCATTER_PLOT_ID,
    TOP_GENES_VIEW_ID,
};
use crate::interactions::{PlotPoint, Renderer, TableTarget};
use crate::utils::ResultTable;
use log::warn;
use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(module = "/plot_helpers.js")]
extern "C" {
    #[wasm_bindgen(js_name = drawPlot)]
    fn draw_plot(element_id: &str, plot: JsValue, selectable: bool);

    #[wasm_bindgen(js_name = drawTable)]
    fn draw_table(element_id: &str, header: JsValue, rows: JsValue);

    #[wasm_bindgen(js_name = setTextLines)]
    fn set_text_lines(element_id: &str, lines: JsValue);

    #[wasm_bindgen(js_name = setSelectOptions)]
    fn set_select_options(element_id: &str, labels: JsValue);

    #[wasm_bindgen(js_name = addSelectOption)]
    fn add_select_option(element_id: &str, name: &str);

    #[wasm_bindgen(js_name = setLabelOptions)]
    fn set_label_select(element_id: &str, names: JsValue);

    #[wasm_bindgen(js_name = setDatalist)]
    fn set_datalist(list_id: &str, values: JsValue);

    #[wasm_bindgen(js_name = setSelectionHandlers)]
    fn set_selection_handlers(on_click: &Closure<dyn FnMut(JsValue)>, on_select: &Closure<dyn FnMut(JsValue)>);
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Option<JsValue> {
    // Plot specs use nested objects, not Maps.
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    match value.serialize(&serializer) {
        Ok(js) => Some(js),
        Err(err) => {
            warn!("could not hand value to plot_helpers.js: {}", err);
            None
        }
    }
}

fn points_from_js(js: JsValue) -> Option<Vec<PlotPoint>> {
    match serde_wasm_bindgen::from_value(js) {
        Ok(points) => Some(points),
        Err(err) => {
            warn!("unreadable plot event: {}", err);
            None
        }
    }
}

/// Route scatterplot click and lasso events to the given handlers.
///
/// Handlers stay installed for the lifetime of the page.
pub fn bind_selection(on_click: impl Fn(Vec<PlotPoint>) + 'static, on_select: impl Fn(Vec<PlotPoint>) + 'static) {
    let click = Closure::<dyn FnMut(JsValue)>::new(move |js: JsValue| {
        if let Some(points) = points_from_js(js) {
            on_click(points);
        }
    });
    let select = Closure::<dyn FnMut(JsValue)>::new(move |js: JsValue| {
        if let Some(points) = points_from_js(js) {
            on_select(points);
        }
    });
    set_selection_handlers(&click, &select);
    click.forget();
    select.forget();
}

fn table_element_id(target: &TableTarget) -> String {
    match target {
        TableTarget::GeneSet(db) => format!("{}-results", db.name()),
        TableTarget::CellSearch => CELL_SEARCH_RESULTS_ID.to_string(),
    }
}

/// [`Renderer`] backed by Plotly on the page.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlotlyRenderer;

impl Renderer for PlotlyRenderer {
    fn render_scatterplot(&self, plot: &Value) {
        if let Some(js) = to_js(plot) {
            draw_plot(SCATTER_PLOT_ID, js, true);
        }
    }

    fn render_barplot(&self, plot: &Value) {
        if let Some(js) = to_js(plot) {
            draw_plot(BARPLOT_ID, js, false);
        }
    }

    fn render_table(&self, target: &TableTarget, table: &ResultTable) {
        if let (Some(header), Some(rows)) = (to_js(&table.header), to_js(&table.rows)) {
            draw_table(&table_element_id(target), header, rows);
        }
    }

    fn show_top_genes(&self, genes: &[String]) {
        if let Some(js) = to_js(genes) {
            set_text_lines(TOP_GENES_VIEW_ID, js);
        }
    }

    fn set_cluster_options(&self, names: &[String]) {
        if let Some(js) = to_js(names) {
            set_select_options(CLUSTER_SELECT_ID, js);
        }
    }

    fn add_color_option(&self, name: &str) {
        add_select_option(CELL_COLOR_SELECT_ID, name);
    }

    fn set_label_options(&self, labels: &[String]) {
        if let Some(js) = to_js(labels) {
            set_label_select(LABEL_SELECT_ID, js);
        }
    }

    fn suggest_values(&self, colormap: &str, values: &[String]) {
        if let Some(js) = to_js(values) {
            set_datalist(colormap, js);
        }
    }
}
