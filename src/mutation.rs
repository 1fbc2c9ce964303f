//! Operations that change server-side dataset or labeling state.
//!
//! Every successful mutation invalidates all cached query results.

use crate::endpoint::Endpoint;
use crate::error::RequestError;
use crate::params::ParameterSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitOrMerge {
    Split,
    Merge,
}

impl SplitOrMerge {
    pub fn as_str(self) -> &'static str {
        match self {
            SplitOrMerge::Split => "split",
            SplitOrMerge::Merge => "merge",
        }
    }
}

/// Whether ids refer to individual cells or whole clusters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionTarget {
    Cells,
    Clusters,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    SplitOrMerge {
        mode: SplitOrMerge,
        target: SelectionTarget,
        ids: Vec<String>,
    },
    Recluster {
        method: String,
    },
    BatchCorrection {
        fields: ParameterSet,
    },
    Subset {
        target: SelectionTarget,
        ids: Vec<String>,
    },
    CopyDataset,
    UpdateLabelCriteria {
        colormap: String,
        label: String,
        fields: ParameterSet,
    },
}

impl Mutation {
    pub fn endpoint(&self) -> Endpoint {
        match self {
            Mutation::SplitOrMerge { .. } => Endpoint::SplitOrMergeCluster,
            Mutation::Recluster { .. } => Endpoint::Recluster,
            Mutation::BatchCorrection { .. } => Endpoint::RunBatchCorrection,
            Mutation::Subset { .. } => Endpoint::Subset,
            Mutation::CopyDataset => Endpoint::CopyDataset,
            Mutation::UpdateLabelCriteria { .. } => Endpoint::UpdateColormapLabelCriteria,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Mutation::SplitOrMerge { mode: SplitOrMerge::Split, .. } => "split cluster",
            Mutation::SplitOrMerge { mode: SplitOrMerge::Merge, .. } => "merge cluster",
            Mutation::Recluster { .. } => "recluster",
            Mutation::BatchCorrection { .. } => "batch correction",
            Mutation::Subset { .. } => "subset",
            Mutation::CopyDataset => "copy dataset",
            Mutation::UpdateLabelCriteria { .. } => "update label criteria",
        }
    }

    pub fn params(&self) -> ParameterSet {
        match self {
            Mutation::SplitOrMerge { mode, ids, .. } => ParameterSet::new()
                .with("split_or_merge", mode.as_str())
                .with("selected_clusters", ids.join(",")),
            Mutation::Recluster { method } => ParameterSet::new().with("clustering_method", method),
            Mutation::BatchCorrection { fields } => fields.clone(),
            Mutation::Subset { target, ids } => ParameterSet::new()
                .with("is_cells", *target == SelectionTarget::Cells)
                .with("cell_ids", ids.join(",")),
            Mutation::CopyDataset => ParameterSet::new(),
            Mutation::UpdateLabelCriteria { colormap, label, fields } => {
                fields.clone().with("name", colormap).with("label", label)
            }
        }
    }

    /// Prompt the user must accept before the request is sent.
    pub fn confirmation(&self) -> Option<&'static str> {
        match self {
            Mutation::SplitOrMerge { .. } => Some(
                "Warning: splitting or merging might take a while, depending on the size of the dataset. \
                 Are you sure you wish to run this operation?",
            ),
            Mutation::Recluster { .. } | Mutation::BatchCorrection { .. } => {
                Some("Warning: this may take a while. Continue?")
            }
            Mutation::Subset { .. } => Some("Do you wish to run a new analysis on the selected cells?"),
            Mutation::CopyDataset => Some("Do you wish to copy this dataset to a new user id?"),
            Mutation::UpdateLabelCriteria { .. } => None,
        }
    }

    /// Status text while the request is outstanding.
    pub fn progress_message(&self) -> String {
        match self {
            Mutation::SplitOrMerge { mode, .. } => format!(
                "{} clusters in progress... (re-running UNCURL, recalculating differentially expressed genes)",
                mode.as_str()
            ),
            Mutation::Recluster { .. } => "Re-clustering + recalculating differential expression...".to_string(),
            Mutation::BatchCorrection { .. } => "Running batch correction...".to_string(),
            Mutation::Subset { .. } => "Copying data, generating summary".to_string(),
            Mutation::CopyDataset => "Copying data and results".to_string(),
            Mutation::UpdateLabelCriteria { label, .. } => format!("Updating label {}", label),
        }
    }

    /// Long-running pipeline reruns; at most one may be outstanding.
    pub fn is_exclusive(&self) -> bool {
        matches!(
            self,
            Mutation::SplitOrMerge { .. } | Mutation::Recluster { .. } | Mutation::BatchCorrection { .. }
        )
    }

    /// Whether the current view should be re-rendered after success.
    ///
    /// Subset and copy produce a new dataset elsewhere; the current one is untouched.
    pub fn refreshes_view(&self) -> bool {
        !matches!(self, Mutation::Subset { .. } | Mutation::CopyDataset)
    }

    pub fn validate(&self) -> Result<(), RequestError> {
        match self {
            Mutation::SplitOrMerge { mode, target, ids } => {
                if ids.is_empty() {
                    return Err(RequestError::InvalidSelection("no selected clusters.".to_string()));
                }
                if *mode == SplitOrMerge::Merge && *target == SelectionTarget::Clusters && ids.len() < 2 {
                    return Err(RequestError::InvalidSelection("cannot merge a single cluster.".to_string()));
                }
                Ok(())
            }
            Mutation::Subset { ids, .. } if ids.is_empty() => {
                Err(RequestError::InvalidSelection("no selected cells.".to_string()))
            }
            Mutation::UpdateLabelCriteria { label, .. } if label.trim().is_empty() => {
                Err(RequestError::InvalidSelection("label name cannot be empty.".to_string()))
            }
            _ => Ok(()),
        }
    }

    /// Status text for a successful response body.
    pub fn success_message(&self, body: &str) -> String {
        match self {
            Mutation::Subset { .. } | Mutation::CopyDataset => format!("New results page: {}", body.trim()),
            Mutation::Recluster { .. } => "Finished re-clustering.".to_string(),
            Mutation::BatchCorrection { .. } => "Finished batch correction.".to_string(),
            Mutation::UpdateLabelCriteria { label, .. } => format!("Updated label {}", label),
            Mutation::SplitOrMerge { .. } => body.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn merge(ids: &[&str]) -> Mutation {
        Mutation::SplitOrMerge {
            mode: SplitOrMerge::Merge,
            target: SelectionTarget::Clusters,
            ids: ids.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn progress_names_the_operation() {
        assert!(merge(&["3", "4"]).progress_message().starts_with("merge clusters in progress"));
        assert_eq!(Mutation::CopyDataset.progress_message(), "Copying data and results");
    }

    #[test]
    fn merge_needs_two_clusters() {
        assert!(matches!(merge(&[]).validate(), Err(RequestError::InvalidSelection(_))));
        assert!(matches!(merge(&["3"]).validate(), Err(RequestError::InvalidSelection(_))));
        assert!(merge(&["3", "4"]).validate().is_ok());
    }

    #[test]
    fn split_or_merge_params() {
        let params = merge(&["3", "4"]).params();
        assert_eq!(params.to_form_body(), "selected_clusters=3%2C4&split_or_merge=merge");
    }

    #[test]
    fn subset_sends_cell_flag_as_integer() {
        let subset = Mutation::Subset {
            target: SelectionTarget::Clusters,
            ids: vec!["1".to_string()],
        };
        assert_eq!(subset.params().to_form_body(), "cell_ids=1&is_cells=0");
        assert_eq!(subset.success_message("u42\n"), "New results page: u42");
        assert!(!subset.refreshes_view());
    }

    #[test]
    fn label_update_needs_no_confirmation() {
        let update = Mutation::UpdateLabelCriteria {
            colormap: "custom".to_string(),
            label: "T cells".to_string(),
            fields: ParameterSet::new(),
        };
        assert!(update.confirmation().is_none());
        assert!(!update.is_exclusive());
        assert!(update.endpoint().invalidates_session());
    }

    #[test]
    fn every_mutation_endpoint_invalidates() {
        let all = [
            merge(&["1", "2"]),
            Mutation::Recluster { method: "leiden".to_string() },
            Mutation::BatchCorrection { fields: ParameterSet::new() },
            Mutation::Subset { target: SelectionTarget::Cells, ids: vec!["c1".to_string()] },
            Mutation::CopyDataset,
        ];
        for mutation in all {
            assert!(mutation.endpoint().invalidates_session(), "{}", mutation.name());
        }
    }
}
