use crate::config::TICK_LABEL_GENE_LIMIT;
use serde_json::{json, Value};

fn first_trace(plot: &Value) -> Option<&Value> {
    plot.get("data")?.get(0)
}

/// True if the bar plot is a gene histogram rather than a ranked gene list.
pub fn is_histogram(plot: &Value) -> bool {
    first_trace(plot)
        .and_then(|trace| trace.get("type"))
        .and_then(Value::as_str)
        == Some("histogram")
}

/// Put a freshly received bar plot into display order.
///
/// Ranked gene lists are reversed so the top gene is drawn at the top, and
/// long lists hide their y tick labels. Histograms are left alone.
pub fn prepare_barplot(plot: &mut Value) {
    if is_histogram(plot) {
        return;
    }
    let mut gene_count = 0;
    if let Some(trace) = plot.get_mut("data").and_then(|d| d.get_mut(0)) {
        for axis in ["x", "y"] {
            if let Some(values) = trace.get_mut(axis).and_then(Value::as_array_mut) {
                values.reverse();
            }
        }
        gene_count = trace.get("y").and_then(Value::as_array).map_or(0, Vec::len);
    }
    if gene_count > TICK_LABEL_GENE_LIMIT {
        if let Some(layout) = plot.get_mut("layout").and_then(Value::as_object_mut) {
            layout.insert("yaxis".to_string(), json!({ "showticklabels": false }));
        }
    }
}

/// Gene names of a prepared bar plot, best-ranked first.
pub fn top_gene_names(plot: &Value) -> Option<Vec<String>> {
    if is_histogram(plot) {
        return None;
    }
    let genes = first_trace(plot)?.get("y")?.as_array()?;
    Some(genes.iter().rev().map(value_text).collect())
}

/// Trace names of a scatterplot, one per cluster.
pub fn cluster_names(plot: &Value) -> Vec<String> {
    plot.get("data")
        .and_then(Value::as_array)
        .map(|traces| {
            traces
                .iter()
                .enumerate()
                .map(|(i, trace)| {
                    trace
                        .get("name")
                        .map(value_text)
                        .unwrap_or_else(|| i.to_string())
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Number of cells drawn for a cluster.
pub fn cluster_size(plot: &Value, cluster: usize) -> Option<usize> {
    plot.get("data")?.get(cluster)?.get("x")?.as_array().map(Vec::len)
}

/// `"cluster 3 (120 cells), "` for every selected cluster present in the plot.
pub fn selection_summary(plot: &Value, clusters: &[usize]) -> String {
    clusters
        .iter()
        .filter_map(|&c| cluster_size(plot, c).map(|len| format!("cluster {} ({} cells), ", c, len)))
        .collect()
}

/// `"cell 7 (812 genes, 2301 reads), "` for every selected cell.
///
/// Cells without counts in the response are listed by id alone.
pub fn cell_info_summary(cells: &[String], info: &Value) -> String {
    let count = |field: &str, i: usize| info.get(field).and_then(|v| v.get(i)).map(value_text);
    cells
        .iter()
        .enumerate()
        .map(|(i, cell)| match (count("gene_counts", i), count("read_counts", i)) {
            (Some(genes), Some(reads)) => format!("cell {} ({} genes, {} reads), ", cell, genes, reads),
            _ => format!("cell {}, ", cell),
        })
        .collect()
}

/// Elements of a JSON array as display strings.
pub fn string_list(payload: &Value) -> Vec<String> {
    payload
        .as_array()
        .map(|values| values.iter().map(value_text).collect())
        .unwrap_or_default()
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Row-major result table: the first payload row is the header.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ResultTable {
    pub fn from_payload(payload: &Value) -> Option<Self> {
        let mut rows = payload.as_array()?.iter().map(|row| {
            row.as_array()
                .map(|cells| cells.iter().map(value_text).collect::<Vec<_>>())
                .unwrap_or_default()
        });
        let header = rows.next()?;
        Some(Self {
            header,
            rows: rows.collect(),
        })
    }
}
