//! Repository interfaces for the listing workflow
//!
//! Contains trait definitions for the narrow read/update contract the
//! core depends on. No business rules live here; forward-only stage
//! enforcement belongs to callers.

use async_trait::async_trait;

use crate::domain::entities::{
    KeywordPatch, NewProhibitedKeyword, Product, ProhibitedKeyword, SearchCriteria,
};
use crate::domain::errors::WorkflowResult;
use crate::domain::funnel::WorkflowStage;

#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Total number of catalog records.
    async fn count_all(&self) -> WorkflowResult<u64>;

    /// Number of products whose stage is `stage` or later in the funnel.
    async fn count_at_or_beyond(&self, stage: WorkflowStage) -> WorkflowResult<u64>;

    /// Execute the criteria as-is: intersection of all present filters,
    /// ordered by descending price then ascending id, bounded by
    /// `limit`/`offset`.
    async fn find(&self, criteria: &SearchCriteria) -> WorkflowResult<Vec<Product>>;

    /// Fetch the listed ids; unknown ids are simply absent from the
    /// result.
    async fn find_by_ids(&self, ids: &[String]) -> WorkflowResult<Vec<Product>>;

    /// Move every listed product currently at `from_stage` to
    /// `new_stage`, returning the number of rows affected. The
    /// `from_stage` guard makes each row update atomic against
    /// concurrent movers.
    async fn update_stage(
        &self,
        ids: &[String],
        from_stage: WorkflowStage,
        new_stage: WorkflowStage,
    ) -> WorkflowResult<u64>;

    async fn insert_product(&self, product: &Product) -> WorkflowResult<()>;
}

#[async_trait]
pub trait KeywordRepository: Send + Sync {
    /// Insert a keyword record, returning its id. Fails with
    /// `DuplicateKeyword` when the `(keyword, category)` pair exists.
    async fn insert(&self, keyword: &NewProhibitedKeyword) -> WorkflowResult<i64>;

    /// Apply a partial update. Fails with `NotFound` for unknown ids.
    async fn update(&self, id: i64, patch: &KeywordPatch) -> WorkflowResult<()>;

    /// Delete by id. Fails with `NotFound` for unknown ids.
    async fn delete(&self, id: i64) -> WorkflowResult<()>;

    async fn find_all(&self) -> WorkflowResult<Vec<ProhibitedKeyword>>;
}
