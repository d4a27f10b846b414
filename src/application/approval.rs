//! Product approval
//!
//! An approval advances each product exactly one funnel step (a
//! `Ready` item becomes `Listed`, a `Filtered` item becomes `Ready`,
//! and so on). Products already at the terminal stage are skipped, as
//! is any id that vanished or moved concurrently; a batch never aborts
//! on individual skips and reports the count actually advanced.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::errors::WorkflowResult;
use crate::domain::funnel::{self, WorkflowStage};
use crate::domain::repositories::CatalogRepository;

pub struct ApprovalUseCase {
    catalog: Arc<dyn CatalogRepository>,
}

impl ApprovalUseCase {
    pub fn new(catalog: Arc<dyn CatalogRepository>) -> Self {
        Self { catalog }
    }

    /// Returns the number of products actually advanced, which may be
    /// less than `ids.len()`. A decision other than `"approve"` applies
    /// no transitions and returns 0.
    pub async fn approve_products(
        &self,
        ids: &[String],
        decision: &str,
        reviewer: &str,
    ) -> WorkflowResult<u64> {
        if decision != "approve" {
            info!(reviewer, decision, requested = ids.len(), "non-approve decision, nothing applied");
            return Ok(0);
        }
        if ids.is_empty() {
            return Ok(0);
        }

        let products = self.catalog.find_by_ids(ids).await?;

        // Group by current stage so each group advances with a single
        // guarded update.
        let mut groups: BTreeMap<WorkflowStage, Vec<String>> = BTreeMap::new();
        for product in products {
            groups.entry(product.stage).or_default().push(product.id);
        }

        let mut approved = 0u64;
        for (stage, group_ids) in &groups {
            let Some(next) = stage.next_stage() else {
                debug!(
                    stage = stage.as_str(),
                    skipped = group_ids.len(),
                    "terminal stage, nothing to advance"
                );
                continue;
            };
            if let Err(err) = funnel::check_transition(*stage, next) {
                debug!(error = %err, skipped = group_ids.len(), "transition rejected");
                continue;
            }
            approved += self.catalog.update_stage(group_ids, *stage, next).await?;
        }

        info!(
            reviewer,
            requested = ids.len(),
            approved,
            "product approval applied"
        );
        Ok(approved)
    }
}
