//! Family-specific parameter schemas for the cached query endpoints.

use crate::config::{DEFAULT_BARPLOT_MODE, DEFAULT_CELL_COLOR, DEFAULT_NUM_GENES, DEFAULT_SCATTER_TYPE};
use crate::endpoint::GeneSetDatabase;
use crate::params::{CacheKey, ParameterSet};

/// Inputs of the main scatterplot view.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterplotQuery {
    pub scatter_type: String,
    pub cell_color: String,
    pub gene_name: String,
    pub gene_name_1: String,
    pub gene_name_2: String,
    pub use_mw: String,
    pub cluster_input: String,
}

impl Default for ScatterplotQuery {
    fn default() -> Self {
        Self {
            scatter_type: DEFAULT_SCATTER_TYPE.to_string(),
            cell_color: DEFAULT_CELL_COLOR.to_string(),
            gene_name: String::new(),
            gene_name_1: String::new(),
            gene_name_2: String::new(),
            use_mw: String::new(),
            cluster_input: String::new(),
        }
    }
}

impl ScatterplotQuery {
    pub fn to_params(&self) -> ParameterSet {
        ParameterSet::new()
            .with("scatter_type", &self.scatter_type)
            .with("cell_color", &self.cell_color)
            .with("gene_name", &self.gene_name)
            .with("gene_name_1", &self.gene_name_1)
            .with("gene_name_2", &self.gene_name_2)
            .with("use_mw", &self.use_mw)
            .with("cluster_input", &self.cluster_input)
    }
}

/// Inputs of the differential-expression bar plot.
#[derive(Debug, Clone, PartialEq)]
pub struct BarplotQuery {
    /// Comparison mode, e.g. `top_1_vs_rest`, `top_pairwise`, `hist`.
    pub top_or_bulk: String,
    /// Selected cluster.
    pub input_value: i64,
    pub num_genes: i64,
    pub cell_color: String,
    pub cluster1: String,
    pub cluster2: String,
    pub selected_gene: String,
}

impl BarplotQuery {
    pub fn for_cluster(cluster: i64) -> Self {
        Self {
            top_or_bulk: DEFAULT_BARPLOT_MODE.to_string(),
            input_value: cluster,
            num_genes: DEFAULT_NUM_GENES,
            cell_color: DEFAULT_CELL_COLOR.to_string(),
            cluster1: String::new(),
            cluster2: String::new(),
            selected_gene: String::new(),
        }
    }

    pub fn to_params(&self) -> ParameterSet {
        ParameterSet::new()
            .with("top_or_bulk", &self.top_or_bulk)
            .with("input_value", self.input_value)
            .with("num_genes", self.num_genes)
            .with("cell_color", &self.cell_color)
            .with("cluster1", &self.cluster1)
            .with("cluster2", &self.cluster2)
            .with("selected_gene", &self.selected_gene)
    }
}

/// A gene-set enrichment query against one database.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneSetQuery {
    pub database: GeneSetDatabase,
    /// Serialized query form fields, sent as-is.
    pub fields: ParameterSet,
}

impl GeneSetQuery {
    pub fn new(database: GeneSetDatabase, fields: ParameterSet) -> Self {
        Self { database, fields }
    }

    /// The database scopes the key but is not part of the body.
    pub fn cache_key(&self) -> CacheKey {
        self.fields.canonicalize_scoped(self.database.name())
    }
}
