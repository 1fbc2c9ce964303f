//! Server endpoints reachable from the view, relative to the session path.

use crate::cache::QueryFamily;
use std::borrow::Cow;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Pluggable gene-set backend, addressed as `update_<name>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GeneSetDatabase {
    Enrichr,
    CellMarker,
    CellMesh,
    CellMeshAnatomy,
    Go,
    SubtiWiki,
    Kegg,
    Custom(String),
}

impl GeneSetDatabase {
    pub fn name(&self) -> &str {
        match self {
            GeneSetDatabase::Enrichr => "enrichr",
            GeneSetDatabase::CellMarker => "cellmarker",
            GeneSetDatabase::CellMesh => "cellmesh",
            GeneSetDatabase::CellMeshAnatomy => "cellmesh_anatomy",
            GeneSetDatabase::Go => "go",
            GeneSetDatabase::SubtiWiki => "subtiwiki",
            GeneSetDatabase::Kegg => "kegg",
            GeneSetDatabase::Custom(name) => name,
        }
    }
}

impl FromStr for GeneSetDatabase {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "enrichr" => GeneSetDatabase::Enrichr,
            "cellmarker" => GeneSetDatabase::CellMarker,
            "cellmesh" => GeneSetDatabase::CellMesh,
            "cellmesh_anatomy" => GeneSetDatabase::CellMeshAnatomy,
            "go" => GeneSetDatabase::Go,
            "subtiwiki" => GeneSetDatabase::SubtiWiki,
            "kegg" => GeneSetDatabase::Kegg,
            other => GeneSetDatabase::Custom(other.to_string()),
        })
    }
}

impl fmt::Display for GeneSetDatabase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Endpoint {
    // Cached queries
    UpdateScatterplot,
    UpdateBarplot,
    UpdateGeneSet(GeneSetDatabase),
    // Uncached reads
    CellInfo,
    DbQuery,
    GetColormapLabelCriteria,
    GetColormapValues,
    CustomColorMap,
    // Session-mutating
    SplitOrMergeCluster,
    Recluster,
    RunBatchCorrection,
    Subset,
    CopyDataset,
    UpdateColormapLabelCriteria,
}

impl Endpoint {
    pub fn path(&self) -> Cow<'static, str> {
        match self {
            Endpoint::UpdateScatterplot => "update_scatterplot".into(),
            Endpoint::UpdateBarplot => "update_barplot".into(),
            Endpoint::UpdateGeneSet(db) => format!("update_{}", db.name()).into(),
            Endpoint::CellInfo => "cell_info".into(),
            Endpoint::DbQuery => "db_query".into(),
            Endpoint::GetColormapLabelCriteria => "get_colormap_label_criteria".into(),
            Endpoint::GetColormapValues => "get_colormap_values".into(),
            Endpoint::CustomColorMap => "custom_color_map".into(),
            Endpoint::SplitOrMergeCluster => "split_or_merge_cluster".into(),
            Endpoint::Recluster => "recluster".into(),
            Endpoint::RunBatchCorrection => "run_batch_correction".into(),
            Endpoint::Subset => "subset".into(),
            Endpoint::CopyDataset => "copy_dataset".into(),
            Endpoint::UpdateColormapLabelCriteria => "update_colormap_label_criteria".into(),
        }
    }

    /// Cache family whose store fronts this endpoint.
    pub fn family(&self) -> Option<QueryFamily> {
        match self {
            Endpoint::UpdateScatterplot => Some(QueryFamily::Scatterplot),
            Endpoint::UpdateBarplot => Some(QueryFamily::Barplot),
            Endpoint::UpdateGeneSet(_) => Some(QueryFamily::GeneSet),
            _ => None,
        }
    }

    /// Whether a successful call changes server state that cached results depend on.
    pub fn invalidates_session(&self) -> bool {
        matches!(
            self,
            Endpoint::SplitOrMergeCluster
                | Endpoint::Recluster
                | Endpoint::RunBatchCorrection
                | Endpoint::Subset
                | Endpoint::CopyDataset
                | Endpoint::UpdateColormapLabelCriteria
        )
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
