//! Stage funnel statistics
//!
//! Computes the per-stage counts behind the dashboard's numeric tiles.
//! Counts are cumulative: a stage's count is the number of products at
//! or beyond it, so `scraped` always equals the catalog total and the
//! series never increases along the funnel. Both facts are checked
//! before a snapshot leaves this module; a snapshot that fails them is
//! replaced by `StatsUnavailable` rather than served partially.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::entities::{DashboardStats, DatabaseCheck};
use crate::domain::errors::{WorkflowError, WorkflowResult};
use crate::domain::funnel::WorkflowStage;
use crate::domain::repositories::CatalogRepository;

pub struct StatsAggregator {
    catalog: Arc<dyn CatalogRepository>,
}

impl StatsAggregator {
    pub fn new(catalog: Arc<dyn CatalogRepository>) -> Self {
        Self { catalog }
    }

    /// Recompute the funnel snapshot from the catalog. Never cached;
    /// every stats request pays for a fresh read.
    pub async fn compute_stats(&self) -> WorkflowResult<DashboardStats> {
        let total = self
            .catalog
            .count_all()
            .await
            .map_err(stats_unavailable)?;

        let mut stats = DashboardStats {
            total,
            ..DashboardStats::default()
        };
        for stage in WorkflowStage::ALL {
            let count = self
                .catalog
                .count_at_or_beyond(stage)
                .await
                .map_err(stats_unavailable)?;
            stats.set_count(stage, count);
        }

        self.check_funnel_shape(&stats)?;
        debug!(total = stats.total, listed = stats.listed, "funnel snapshot computed");
        Ok(stats)
    }

    /// Connectivity probe behind the `test_database` action. A failing
    /// store is reported in the payload, not as an error envelope.
    pub async fn probe_database(&self) -> DatabaseCheck {
        match self.catalog.count_all().await {
            Ok(total) => DatabaseCheck {
                status: "connected".to_string(),
                total_records: total,
                message: format!("catalog reachable, {total} records"),
            },
            Err(err) => {
                warn!(error = %err, "database probe failed");
                DatabaseCheck {
                    status: "error".to_string(),
                    total_records: 0,
                    message: err.to_string(),
                }
            }
        }
    }

    // Counts are read one query at a time, so a write landing
    // mid-aggregation can leave the series inconsistent. Such a
    // snapshot is discarded here.
    fn check_funnel_shape(&self, stats: &DashboardStats) -> WorkflowResult<()> {
        if stats.scraped != stats.total {
            warn!(
                total = stats.total,
                scraped = stats.scraped,
                "funnel snapshot rejected: scraped count does not cover the catalog"
            );
            return Err(WorkflowError::stats_unavailable(format!(
                "scraped count {} does not match catalog total {}",
                stats.scraped, stats.total
            )));
        }

        let counts: Vec<u64> = WorkflowStage::ALL
            .iter()
            .map(|stage| stats.count_for(*stage))
            .collect();
        for pair in counts.windows(2) {
            if pair[1] > pair[0] {
                warn!(?counts, "funnel snapshot rejected: counts increase along the funnel");
                return Err(WorkflowError::stats_unavailable(
                    "stage counts increase along the funnel",
                ));
            }
        }
        Ok(())
    }
}

fn stats_unavailable(err: WorkflowError) -> WorkflowError {
    match err {
        WorkflowError::StoreUnavailable { message } => WorkflowError::StatsUnavailable { message },
        other => other,
    }
}
