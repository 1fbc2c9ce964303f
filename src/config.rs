//! Application-level configuration constants.

use crate::guard::GuardPolicy;

// Wire conventions
pub const ERROR_PREFIX: &str = "Error";
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

// Cache sizing
pub const INITIAL_STORE_CAPACITY: usize = 64;

// Bar plots with more genes than this hide their y tick labels
pub const TICK_LABEL_GENE_LIMIT: usize = 20;

// Element ids owned by plot_helpers.js
pub const SCATTER_PLOT_ID: &str = "means-scatter-plot";
pub const BARPLOT_ID: &str = "top-genes";
pub const TOP_GENES_VIEW_ID: &str = "top-genes-view";
pub const CLUSTER_SELECT_ID: &str = "cell_search_cluster";
pub const CELL_SEARCH_RESULTS_ID: &str = "cell_search_results";
pub const CELL_COLOR_SELECT_ID: &str = "cell-color";
pub const LABEL_SELECT_ID: &str = "label_select";

// Defaults for the startup render
pub const DEFAULT_SCATTER_TYPE: &str = "Means";
pub const DEFAULT_CELL_COLOR: &str = "cluster";
pub const DEFAULT_BARPLOT_MODE: &str = "top_1_vs_rest";
pub const DEFAULT_NUM_GENES: i64 = 10;

/// Per-session settings handed to [`crate::session::SessionCacheService`].
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Path every endpoint is appended to, e.g. `/user/abc123/view`.
    pub base_path: String,
    /// What the bar-plot guard does with an invocation while one is pending.
    pub barplot_policy: GuardPolicy,
}

impl SessionConfig {
    pub fn new(base_path: impl Into<String>) -> Self {
        Self {
            base_path: base_path.into().trim_end_matches('/').to_string(),
            barplot_policy: GuardPolicy::default(),
        }
    }

    pub fn with_barplot_policy(mut self, policy: GuardPolicy) -> Self {
        self.barplot_policy = policy;
        self
    }

    /// Full request URL for an endpoint path.
    pub fn url_for(&self, endpoint_path: &str) -> String {
        format!("{}/{}", self.base_path, endpoint_path)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_for_joins_without_double_slash() {
        let config = SessionConfig::new("/user/abc/view/");
        assert_eq!(config.url_for("update_barplot"), "/user/abc/view/update_barplot");
    }

    #[test]
    fn default_policy_drops_newest() {
        assert_eq!(SessionConfig::default().barplot_policy, GuardPolicy::DropNewest);
    }
}
