//! Glue between the session layer and the page's collaborators.
//!
//! [`ViewController`] mirrors the view's user actions. Each action leaves
//! the status area in a terminal state on every exit path. A dropped bar-plot
//! request leaves it untouched, and an abandoned one only when a newer load
//! has taken over.

use crate::cache::Payload;
use crate::endpoint::{Endpoint, GeneSetDatabase};
use crate::error::RequestError;
use crate::guard::GuardPolicy;
use crate::mutation::Mutation;
use crate::params::ParameterSet;
use crate::query::{BarplotQuery, GeneSetQuery, ScatterplotQuery};
use crate::session::{BarplotOutcome, MutationOutcome, SessionCacheService, Source};
use crate::utils::{cell_info_summary, cluster_names, selection_summary, string_list, top_gene_names, ResultTable};
use log::{debug, warn};
use serde::Deserialize;
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Where a result table is drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableTarget {
    GeneSet(GeneSetDatabase),
    CellSearch,
}

/// Draws plots and tables. Owns all DOM and canvas work.
pub trait Renderer {
    fn render_scatterplot(&self, plot: &Value);
    fn render_barplot(&self, plot: &Value);
    fn render_table(&self, target: &TableTarget, table: &ResultTable);
    fn show_top_genes(&self, genes: &[String]);
    fn set_cluster_options(&self, names: &[String]);
    /// Adds a colormap to the cell-color choices and selects it.
    fn add_color_option(&self, name: &str);
    fn set_label_options(&self, labels: &[String]);
    /// Completion values for criteria that select on `colormap`.
    fn suggest_values(&self, colormap: &str, values: &[String]);
}

/// One point of a scatterplot click or lasso event.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PlotPoint {
    /// Trace index, which is the cluster number.
    #[serde(rename = "curveNumber")]
    pub curve_number: usize,
    /// Cell id from the hover text.
    #[serde(default)]
    pub text: String,
}

/// Clusters and cells picked on the scatterplot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub clusters: Vec<usize>,
    pub cells: Vec<String>,
}

impl Selection {
    /// Distinct clusters in the order they were first hit.
    pub fn from_points(points: &[PlotPoint]) -> Self {
        let mut clusters = Vec::new();
        for point in points {
            if !clusters.contains(&point.curve_number) {
                clusters.push(point.curve_number);
            }
        }
        Self {
            clusters,
            cells: points.iter().map(|p| p.text.clone()).collect(),
        }
    }
}

/// Transient progress and result text shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StatusLine {
    #[default]
    Idle,
    Progress(String),
    Done(String),
    Error(String),
}

pub trait StatusArea {
    fn show(&self, status: StatusLine);
}

/// How a bar-plot load ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarplotLoad {
    Shown,
    /// Another load was outstanding; nothing changed.
    Dropped,
    Failed,
    Cancelled,
}

/// Asks the user to accept a destructive operation.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

pub struct ViewController {
    session: Rc<SessionCacheService>,
    renderer: Rc<dyn Renderer>,
    status: Rc<dyn StatusArea>,
    confirm: Rc<dyn Confirm>,
    last_scatterplot: RefCell<Option<ScatterplotQuery>>,
    last_barplot: RefCell<Option<BarplotQuery>>,
    current_plot: RefCell<Option<Payload>>,
    selection: RefCell<Selection>,
    barplot_loads: Cell<u64>,
}

impl ViewController {
    pub fn new(
        session: Rc<SessionCacheService>,
        renderer: Rc<dyn Renderer>,
        status: Rc<dyn StatusArea>,
        confirm: Rc<dyn Confirm>,
    ) -> Self {
        Self {
            session,
            renderer,
            status,
            confirm,
            last_scatterplot: RefCell::new(None),
            last_barplot: RefCell::new(None),
            current_plot: RefCell::new(None),
            selection: RefCell::new(Selection::default()),
            barplot_loads: Cell::new(0),
        }
    }

    pub fn session(&self) -> &Rc<SessionCacheService> {
        &self.session
    }

    pub fn selection(&self) -> Selection {
        self.selection.borrow().clone()
    }

    fn fail(&self, err: &RequestError) {
        warn!("{}", err);
        self.status.show(StatusLine::Error(err.to_string()));
    }

    pub async fn load_scatterplot(&self, query: &ScatterplotQuery) {
        *self.last_scatterplot.borrow_mut() = Some(query.clone());
        self.status.show(StatusLine::Progress("Updating scatterplot".to_string()));
        match self.session.update_scatterplot(query).await {
            Ok(fetched) => {
                self.renderer.render_scatterplot(&fetched.payload);
                *self.current_plot.borrow_mut() = Some(fetched.payload.clone());
                if fetched.source == Source::Network {
                    self.renderer.set_cluster_options(&cluster_names(&fetched.payload));
                }
                self.status.show(StatusLine::Done("Scatterplot updated".to_string()));
            }
            Err(err) => self.fail(&err),
        }
    }

    pub async fn load_barplot(&self, query: &BarplotQuery) -> BarplotLoad {
        if self.session.barplot_pending() && self.session.config().barplot_policy == GuardPolicy::DropNewest {
            debug!("update_barplot is already running");
            return BarplotLoad::Dropped;
        }
        *self.last_barplot.borrow_mut() = Some(query.clone());
        let ticket = self.barplot_loads.get() + 1;
        self.barplot_loads.set(ticket);
        self.status.show(StatusLine::Progress("Updating barplot".to_string()));
        match self.session.update_barplot(query).await {
            Ok(BarplotOutcome::Ready(fetched)) => {
                if let Some(genes) = top_gene_names(&fetched.payload) {
                    self.renderer.show_top_genes(&genes);
                }
                self.renderer.render_barplot(&fetched.payload);
                self.status.show(StatusLine::Done("Barplot updated".to_string()));
                BarplotLoad::Shown
            }
            Ok(BarplotOutcome::Rejected) => BarplotLoad::Dropped,
            Ok(BarplotOutcome::Abandoned) => {
                // A newer load owns the status line.
                if self.barplot_loads.get() == ticket {
                    self.status.show(StatusLine::Done("Barplot request cancelled".to_string()));
                }
                BarplotLoad::Cancelled
            }
            Err(err) => {
                self.fail(&err);
                BarplotLoad::Failed
            }
        }
    }

    /// Click on the scatterplot: select the clicked cluster and load its bar plot.
    pub async fn click_points(&self, points: &[PlotPoint]) {
        let Some(cluster) = points.first().map(|p| p.curve_number) else {
            return;
        };
        *self.selection.borrow_mut() = Selection {
            clusters: vec![cluster],
            cells: points.iter().map(|p| p.text.clone()).collect(),
        };
        let query = BarplotQuery {
            input_value: cluster as i64,
            ..self.last_barplot.borrow().clone().unwrap_or_else(|| BarplotQuery::for_cluster(0))
        };
        if self.load_barplot(&query).await == BarplotLoad::Shown {
            let summary = self.summarize_clusters(&[cluster]);
            self.status
                .show(StatusLine::Done(format!("Barplot updated\nselected clusters: {}", summary)));
        }
    }

    /// Lasso or box selection: remember the clusters and cells and report them.
    pub fn select_points(&self, points: &[PlotPoint]) {
        if points.is_empty() {
            return;
        }
        let selection = Selection::from_points(points);
        let summary = self.summarize_clusters(&selection.clusters);
        self.status.show(StatusLine::Done(format!(
            "selected clusters: {}\nNumber of selected cells: {}",
            summary,
            selection.cells.len()
        )));
        *self.selection.borrow_mut() = selection;
    }

    fn summarize_clusters(&self, clusters: &[usize]) -> String {
        self.current_plot
            .borrow()
            .as_ref()
            .map(|plot| selection_summary(plot, clusters))
            .unwrap_or_default()
    }

    /// Read and gene counts for the current selection.
    pub async fn cell_info(&self) {
        let selection = self.selection();
        if selection.clusters.is_empty() {
            return self.fail(&RequestError::InvalidSelection("no selected clusters.".to_string()));
        }
        let color_map = self
            .last_scatterplot
            .borrow()
            .as_ref()
            .map(|q| q.cell_color.clone())
            .unwrap_or_else(|| ScatterplotQuery::default().cell_color);
        let clusters: Vec<String> = selection.clusters.iter().map(usize::to_string).collect();
        let params = ParameterSet::new()
            .with("selected_clusters", clusters.join(","))
            .with("selected_cells", selection.cells.join(","))
            .with("color_map", color_map);
        self.status.show(StatusLine::Progress("Query in progress...".to_string()));
        match self.session.fetch_uncached(&Endpoint::CellInfo, &params).await {
            Ok(info) => {
                let summary = self.summarize_clusters(&selection.clusters);
                self.status.show(StatusLine::Done(format!(
                    "Selected cells: {}\nSelected clusters: {}",
                    cell_info_summary(&selection.cells, &info),
                    summary
                )));
            }
            Err(err) => self.fail(&err),
        }
    }

    /// Create an empty custom colormap and make it the current cell color.
    pub async fn create_colormap(&self, name: &str) {
        let params = ParameterSet::new().with("name", name);
        match self.session.send_uncached(&Endpoint::CustomColorMap, &params).await {
            Ok(_) => {
                self.renderer.add_color_option(name);
                self.status.show(StatusLine::Done(format!("Created colormap {}", name)));
            }
            Err(err) => self.fail(&err),
        }
    }

    /// Load the label names of a custom colormap into the label picker.
    ///
    /// Errors are logged only; the picker keeps its previous labels.
    pub async fn load_colormap_labels(&self, colormap: &str) -> Option<Vec<String>> {
        let params = ParameterSet::new().with("name", colormap);
        match self
            .session
            .fetch_uncached(&Endpoint::GetColormapLabelCriteria, &params)
            .await
        {
            Ok(payload) => {
                let labels: Vec<String> = payload
                    .get("labels")
                    .and_then(Value::as_array)
                    .map(|labels| {
                        labels
                            .iter()
                            .filter_map(|l| l.get("name").and_then(Value::as_str).map(str::to_string))
                            .collect()
                    })
                    .unwrap_or_default();
                self.renderer.set_label_options(&labels);
                Some(labels)
            }
            Err(err) => {
                debug!("no labels for {}: {}", colormap, err);
                None
            }
        }
    }

    /// Offer the known values of `colormap` as completions.
    pub async fn load_colormap_values(&self, colormap: &str) {
        let params = ParameterSet::new().with("name", colormap);
        match self.session.fetch_uncached(&Endpoint::GetColormapValues, &params).await {
            Ok(payload) => self.renderer.suggest_values(colormap, &string_list(&payload)),
            Err(err) => self.fail(&err),
        }
    }

    pub async fn run_gene_query(&self, query: &GeneSetQuery) {
        self.status.show(StatusLine::Progress("Query in progress...".to_string()));
        match self.session.update_gene_query(query).await {
            Ok(fetched) => {
                self.show_table(&TableTarget::GeneSet(query.database.clone()), &fetched.payload);
                self.status.show(StatusLine::Done("Query complete".to_string()));
            }
            Err(err) => self.fail(&err),
        }
    }

    /// Cell similarity search; never cached.
    pub async fn cell_search(&self, fields: &ParameterSet) {
        self.status.show(StatusLine::Progress("Cell search query".to_string()));
        match self.session.fetch_uncached(&Endpoint::DbQuery, fields).await {
            Ok(payload) => {
                self.show_table(&TableTarget::CellSearch, &payload);
                self.status.show(StatusLine::Done("Completed cell search query".to_string()));
            }
            Err(err) => self.fail(&err),
        }
    }

    fn show_table(&self, target: &TableTarget, payload: &Value) {
        match ResultTable::from_payload(payload) {
            Some(table) => self.renderer.render_table(target, &table),
            None => debug!("empty result table for {:?}", target),
        }
    }

    /// Drop every cached result; a bar plot still loading is cancelled.
    pub fn clear_cache(&self) {
        self.session.invalidate();
        self.status.show(StatusLine::Done("Cache cleared".to_string()));
    }

    /// Run a mutation, then redraw the views that depended on the old state.
    pub async fn mutate(&self, mutation: &Mutation) {
        let status = self.status.clone();
        let on_send = move || status.show(StatusLine::Progress(mutation.progress_message()));
        let outcome = match self
            .session
            .run_mutation_with(mutation, self.confirm.as_ref(), on_send)
            .await
        {
            Ok(outcome) => outcome,
            Err(err) => return self.fail(&err),
        };
        let message = match outcome {
            MutationOutcome::Declined => return,
            MutationOutcome::Completed { message } => message,
        };
        self.status.show(StatusLine::Done(message));
        if !mutation.refreshes_view() {
            return;
        }
        let scatterplot = self.last_scatterplot.borrow().clone();
        if let Some(query) = scatterplot {
            self.load_scatterplot(&query).await;
        }
        let barplot = self.last_barplot.borrow().clone();
        if let Some(query) = barplot {
            self.load_barplot(&query).await;
        }
    }

    /// Returns the page to navigate to, if the user accepted.
    pub fn delete_rerun(&self) -> Option<String> {
        let accepted = self
            .confirm
            .confirm("Do you wish to delete the current results for this dataset and re-run the entire pipeline?");
        accepted.then(|| self.session.config().url_for("delete_rerun"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;
    use crate::params::ParamValue;
    use crate::transport::mock::ScriptedTransport;
    use futures::executor::block_on;
    use futures::poll;
    use pretty_assertions::assert_eq;

    #[derive(Default)]
    struct Recorder {
        events: RefCell<Vec<String>>,
        statuses: RefCell<Vec<StatusLine>>,
        decline: Cell<bool>,
    }

    impl Recorder {
        fn last_status(&self) -> Option<StatusLine> {
            self.statuses.borrow().last().cloned()
        }
    }

    impl Renderer for Recorder {
        fn render_scatterplot(&self, _plot: &Value) {
            self.events.borrow_mut().push("scatterplot".to_string());
        }
        fn render_barplot(&self, _plot: &Value) {
            self.events.borrow_mut().push("barplot".to_string());
        }
        fn render_table(&self, target: &TableTarget, table: &ResultTable) {
            self.events.borrow_mut().push(format!("table {:?} {}", target, table.rows.len()));
        }
        fn show_top_genes(&self, genes: &[String]) {
            self.events.borrow_mut().push(format!("genes {}", genes.join(",")));
        }
        fn set_cluster_options(&self, names: &[String]) {
            self.events.borrow_mut().push(format!("clusters {}", names.join(",")));
        }
        fn add_color_option(&self, name: &str) {
            self.events.borrow_mut().push(format!("color {}", name));
        }
        fn set_label_options(&self, labels: &[String]) {
            self.events.borrow_mut().push(format!("labels {}", labels.join(",")));
        }
        fn suggest_values(&self, colormap: &str, values: &[String]) {
            self.events.borrow_mut().push(format!("values {} {}", colormap, values.join(",")));
        }
    }

    impl StatusArea for Recorder {
        fn show(&self, status: StatusLine) {
            self.statuses.borrow_mut().push(status);
        }
    }

    impl Confirm for Recorder {
        fn confirm(&self, _prompt: &str) -> bool {
            !self.decline.get()
        }
    }

    fn controller(transport: &Rc<ScriptedTransport>) -> (ViewController, Rc<Recorder>) {
        controller_with(transport, GuardPolicy::DropNewest)
    }

    fn controller_with(transport: &Rc<ScriptedTransport>, policy: GuardPolicy) -> (ViewController, Rc<Recorder>) {
        let recorder = Rc::new(Recorder::default());
        let config = SessionConfig::new("/user/u1/view").with_barplot_policy(policy);
        let session = Rc::new(SessionCacheService::new(transport.clone(), config));
        let view = ViewController::new(session, recorder.clone(), recorder.clone(), recorder.clone());
        (view, recorder)
    }

    fn point(cluster: usize, cell: &str) -> PlotPoint {
        PlotPoint {
            curve_number: cluster,
            text: cell.to_string(),
        }
    }

    const SCATTER: &str = r#"{"data": [{"name": "0", "x": [1]}, {"name": "1", "x": [2, 3]}], "layout": {}}"#;
    const BARS: &str = r#"{"data": [{"type": "bar", "x": [5, 4], "y": ["CD3E", "CD4"]}], "layout": {}}"#;

    #[test]
    fn scatterplot_error_ends_in_error_status() {
        let transport = Rc::new(ScriptedTransport::new());
        transport.reply("Error: unknown scatter type");
        let (view, recorder) = controller(&transport);
        block_on(view.load_scatterplot(&ScatterplotQuery::default()));
        assert_eq!(
            recorder.statuses.borrow().last(),
            Some(&StatusLine::Error("Error: unknown scatter type".to_string()))
        );
        assert!(recorder.events.borrow().is_empty());
    }

    #[test]
    fn cluster_options_refresh_only_on_fresh_data() {
        let transport = Rc::new(ScriptedTransport::new());
        transport.reply(SCATTER);
        let (view, recorder) = controller(&transport);
        block_on(view.load_scatterplot(&ScatterplotQuery::default()));
        block_on(view.load_scatterplot(&ScatterplotQuery::default()));
        assert_eq!(
            *recorder.events.borrow(),
            vec!["scatterplot", "clusters 0,1", "scatterplot"]
        );
    }

    #[test]
    fn barplot_shows_genes_in_rank_order() {
        let transport = Rc::new(ScriptedTransport::new());
        transport.reply(BARS);
        let (view, recorder) = controller(&transport);
        assert_eq!(block_on(view.load_barplot(&BarplotQuery::for_cluster(0))), BarplotLoad::Shown);
        assert_eq!(*recorder.events.borrow(), vec!["genes CD3E,CD4", "barplot"]);
        assert_eq!(
            recorder.statuses.borrow().last(),
            Some(&StatusLine::Done("Barplot updated".to_string()))
        );
    }

    #[test]
    fn split_refreshes_both_views() {
        let transport = Rc::new(ScriptedTransport::new());
        transport.reply(SCATTER);
        transport.reply(BARS);
        transport.reply("Split cluster 1");
        transport.reply(SCATTER);
        transport.reply(BARS);
        let (view, recorder) = controller(&transport);

        block_on(async {
            view.load_scatterplot(&ScatterplotQuery::default()).await;
            view.load_barplot(&BarplotQuery::for_cluster(1)).await;
            view.mutate(&Mutation::SplitOrMerge {
                mode: crate::mutation::SplitOrMerge::Split,
                target: crate::mutation::SelectionTarget::Clusters,
                ids: vec!["1".to_string()],
            })
            .await;
        });

        assert_eq!(
            transport.endpoints(),
            vec![
                "update_scatterplot",
                "update_barplot",
                "split_or_merge_cluster",
                "update_scatterplot",
                "update_barplot",
            ]
        );
        assert!(recorder
            .statuses
            .borrow()
            .contains(&StatusLine::Done("Split cluster 1".to_string())));
    }

    #[test]
    fn clearing_cache_mid_barplot_ends_in_terminal_status() {
        let transport = Rc::new(ScriptedTransport::new());
        let _gate = transport.gated();
        let (view, recorder) = controller(&transport);
        let query = BarplotQuery::for_cluster(0);

        let outcome = block_on(async {
            let mut load = Box::pin(view.load_barplot(&query));
            assert!(poll!(&mut load).is_pending());
            view.clear_cache();
            load.await
        });
        assert_eq!(outcome, BarplotLoad::Cancelled);
        assert_eq!(
            recorder.last_status(),
            Some(StatusLine::Done("Barplot request cancelled".to_string()))
        );
        assert!(!view.session().barplot_pending());
    }

    #[test]
    fn superseded_load_leaves_status_to_newer_load() {
        let transport = Rc::new(ScriptedTransport::new());
        let _gate = transport.gated();
        transport.reply(BARS);
        let (view, recorder) = controller_with(&transport, GuardPolicy::SupersedePending);
        let older = BarplotQuery::for_cluster(0);

        block_on(async {
            let mut old = Box::pin(view.load_barplot(&older));
            assert!(poll!(&mut old).is_pending());
            let newer = view.load_barplot(&BarplotQuery::for_cluster(1)).await;
            assert_eq!(newer, BarplotLoad::Shown);
            assert_eq!(old.await, BarplotLoad::Cancelled);
        });
        assert_eq!(recorder.last_status(), Some(StatusLine::Done("Barplot updated".to_string())));
    }

    #[test]
    fn click_selects_cluster_and_loads_its_barplot() {
        let transport = Rc::new(ScriptedTransport::new());
        transport.reply(SCATTER);
        transport.reply(BARS);
        let (view, recorder) = controller(&transport);

        block_on(async {
            view.load_scatterplot(&ScatterplotQuery::default()).await;
            view.click_points(&[point(1, "17")]).await;
        });

        assert_eq!(transport.calls.borrow()[1].1.get("input_value"), Some(&ParamValue::Int(1)));
        assert_eq!(view.selection(), Selection { clusters: vec![1], cells: vec!["17".to_string()] });
        assert_eq!(
            recorder.last_status(),
            Some(StatusLine::Done("Barplot updated\nselected clusters: cluster 1 (2 cells), ".to_string()))
        );
    }

    #[test]
    fn failed_click_keeps_error_status() {
        let transport = Rc::new(ScriptedTransport::new());
        transport.reply("Error: no such cluster");
        let (view, recorder) = controller(&transport);
        block_on(view.click_points(&[point(4, "2")]));
        assert_eq!(recorder.last_status(), Some(StatusLine::Error("Error: no such cluster".to_string())));
    }

    #[test]
    fn lasso_reports_clusters_and_cell_count() {
        let transport = Rc::new(ScriptedTransport::new());
        transport.reply(SCATTER);
        let (view, recorder) = controller(&transport);
        block_on(view.load_scatterplot(&ScatterplotQuery::default()));

        view.select_points(&[point(1, "4"), point(0, "9"), point(1, "5")]);
        assert_eq!(view.selection().clusters, vec![1, 0]);
        assert_eq!(
            recorder.last_status(),
            Some(StatusLine::Done(
                "selected clusters: cluster 1 (2 cells), cluster 0 (1 cells), \nNumber of selected cells: 3".to_string()
            ))
        );
        // Selections never reach the server.
        assert_eq!(transport.call_count(), 1);
    }

    #[test]
    fn cell_info_posts_current_selection() {
        let transport = Rc::new(ScriptedTransport::new());
        transport.reply(SCATTER);
        transport.reply(r#"{"gene_counts": [120, 98], "read_counts": [800, 640]}"#);
        let (view, recorder) = controller(&transport);

        block_on(async {
            view.load_scatterplot(&ScatterplotQuery::default()).await;
            view.select_points(&[point(1, "4"), point(1, "5")]);
            view.cell_info().await;
        });

        let sent = transport.calls.borrow()[1].1.to_form_body();
        assert_eq!(sent, "color_map=cluster&selected_cells=4%2C5&selected_clusters=1");
        assert_eq!(
            recorder.last_status(),
            Some(StatusLine::Done(
                "Selected cells: cell 4 (120 genes, 800 reads), cell 5 (98 genes, 640 reads), \n\
                 Selected clusters: cluster 1 (2 cells), "
                    .to_string()
            ))
        );
    }

    #[test]
    fn cell_info_without_selection_sends_nothing() {
        let transport = Rc::new(ScriptedTransport::new());
        let (view, recorder) = controller(&transport);
        block_on(view.cell_info());
        assert_eq!(transport.call_count(), 0);
        assert!(matches!(recorder.last_status(), Some(StatusLine::Error(_))));
    }

    #[test]
    fn colormap_flows_feed_the_pickers() {
        let transport = Rc::new(ScriptedTransport::new());
        transport.reply("success");
        transport.reply(r#"{"name": "tissue", "labels": [{"name": "liver", "criteria": []}, {"name": "lung", "criteria": []}]}"#);
        transport.reply(r#"["liver", "lung", "kidney"]"#);
        let (view, recorder) = controller(&transport);

        let labels = block_on(async {
            view.create_colormap("tissue").await;
            let labels = view.load_colormap_labels("tissue").await;
            view.load_colormap_values("tissue").await;
            labels
        });

        assert_eq!(labels, Some(vec!["liver".to_string(), "lung".to_string()]));
        assert_eq!(
            *recorder.events.borrow(),
            vec!["color tissue", "labels liver,lung", "values tissue liver,lung,kidney"]
        );
        assert_eq!(
            transport.endpoints(),
            vec!["custom_color_map", "get_colormap_label_criteria", "get_colormap_values"]
        );
    }

    #[test]
    fn failed_colormap_creation_adds_no_option() {
        let transport = Rc::new(ScriptedTransport::new());
        transport.reply("Error: name already exists");
        let (view, recorder) = controller(&transport);
        block_on(view.create_colormap("tissue"));
        assert!(recorder.events.borrow().is_empty());
        assert_eq!(recorder.last_status(), Some(StatusLine::Error("Error: name already exists".to_string())));
    }

    #[test]
    fn mutation_shows_progress_before_sending() {
        let transport = Rc::new(ScriptedTransport::new());
        transport.reply("Finished");
        let (view, recorder) = controller(&transport);

        block_on(view.mutate(&Mutation::Recluster { method: "leiden".to_string() }));
        assert_eq!(
            *recorder.statuses.borrow(),
            vec![
                StatusLine::Progress("Re-clustering + recalculating differential expression...".to_string()),
                StatusLine::Done("Finished re-clustering.".to_string()),
            ]
        );
    }

    #[test]
    fn declined_mutation_shows_no_progress() {
        let transport = Rc::new(ScriptedTransport::new());
        let (view, recorder) = controller(&transport);
        recorder.decline.set(true);
        block_on(view.mutate(&Mutation::Recluster { method: "leiden".to_string() }));
        assert!(recorder.statuses.borrow().is_empty());
        assert_eq!(transport.call_count(), 0);
    }

    #[test]
    fn gene_query_renders_table() {
        let transport = Rc::new(ScriptedTransport::new());
        transport.reply(r#"[["Term", "P-value"], ["T cell activation", 0.001]]"#);
        let (view, recorder) = controller(&transport);
        let query = GeneSetQuery::new(GeneSetDatabase::Go, ParameterSet::new().with("gene_list", "CD3E"));
        block_on(view.run_gene_query(&query));
        assert_eq!(*recorder.events.borrow(), vec!["table GeneSet(Go) 1"]);
    }

    #[test]
    fn delete_rerun_points_at_session_path() {
        let transport = Rc::new(ScriptedTransport::new());
        let (view, _) = controller(&transport);
        assert_eq!(view.delete_rerun().as_deref(), Some("/user/u1/view/delete_rerun"));
    }
}
