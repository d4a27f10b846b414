//! Product search over the catalog
//!
//! Resolves a free-text term plus optional filters into a bounded,
//! deterministically ordered result set. An empty search box with no
//! filters is answered with an explicit no-criteria signal instead of
//! a full catalog dump.

use std::sync::Arc;

use serde::Deserialize;
use tracing::debug;

use crate::domain::entities::{ProductProjection, RiskLevel, SearchCriteria};
use crate::domain::errors::WorkflowResult;
use crate::domain::funnel::WorkflowStage;
use crate::domain::repositories::CatalogRepository;

/// Ephemeral search request. Not persisted; a fresh query recomputes
/// from scratch.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub term: String,
    #[serde(default)]
    pub filters: SearchFilters,
    #[serde(default)]
    pub offset: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchFilters {
    pub stage: Option<WorkflowStage>,
    pub risk_level: Option<RiskLevel>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

impl SearchFilters {
    pub fn is_empty(&self) -> bool {
        self.stage.is_none()
            && self.risk_level.is_none()
            && self.min_price.is_none()
            && self.max_price.is_none()
    }
}

impl SearchQuery {
    /// A query carries criteria when the trimmed term is non-empty or
    /// any filter is set. Filters alone are enough.
    pub fn has_criteria(&self) -> bool {
        !self.term.trim().is_empty() || !self.filters.is_empty()
    }
}

/// Distinguishes "nothing asked" from "nothing found".
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    NoCriteria,
    Matches(Vec<ProductProjection>),
}

pub struct SearchEngine {
    catalog: Arc<dyn CatalogRepository>,
    result_cap: u32,
}

impl SearchEngine {
    pub fn new(catalog: Arc<dyn CatalogRepository>, result_cap: u32) -> Self {
        Self {
            catalog,
            result_cap,
        }
    }

    /// Read-only and idempotent; safe to retry. Term matching is a
    /// case-insensitive substring match on `title`; filters are ANDed
    /// on top. Results are price-descending (id ascending on ties) and
    /// never exceed the cap; callers page via `offset`.
    pub async fn search(&self, query: &SearchQuery) -> WorkflowResult<SearchOutcome> {
        if !query.has_criteria() {
            debug!("search refused: no criteria supplied");
            return Ok(SearchOutcome::NoCriteria);
        }

        let term = query.term.trim();
        let criteria = SearchCriteria {
            title_term: (!term.is_empty()).then(|| term.to_string()),
            stage: query.filters.stage,
            risk_level: query.filters.risk_level,
            min_price: query.filters.min_price,
            max_price: query.filters.max_price,
            limit: self.result_cap,
            offset: query.offset,
        };

        let products = self.catalog.find(&criteria).await?;
        let mut matches: Vec<ProductProjection> =
            products.into_iter().map(ProductProjection::from).collect();
        matches.truncate(self.result_cap as usize);

        debug!(term, matched = matches.len(), offset = query.offset, "search resolved");
        Ok(SearchOutcome::Matches(matches))
    }
}
