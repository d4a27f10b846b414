//! Prohibited-keyword list maintenance
//!
//! Thin use cases over the keyword repository. The filtering that
//! consumes this list runs outside this core.

use std::sync::Arc;

use tracing::info;

use crate::domain::entities::{KeywordPatch, NewProhibitedKeyword, ProhibitedKeyword};
use crate::domain::errors::WorkflowResult;
use crate::domain::repositories::KeywordRepository;

pub struct KeywordUseCase {
    keywords: Arc<dyn KeywordRepository>,
}

impl KeywordUseCase {
    pub fn new(keywords: Arc<dyn KeywordRepository>) -> Self {
        Self { keywords }
    }

    pub async fn add_keyword(&self, keyword: &NewProhibitedKeyword) -> WorkflowResult<i64> {
        let id = self.keywords.insert(keyword).await?;
        info!(id, keyword = %keyword.keyword, category = %keyword.category, "prohibited keyword added");
        Ok(id)
    }

    pub async fn update_keyword(&self, id: i64, patch: &KeywordPatch) -> WorkflowResult<()> {
        self.keywords.update(id, patch).await?;
        info!(id, "prohibited keyword updated");
        Ok(())
    }

    pub async fn delete_keyword(&self, id: i64) -> WorkflowResult<()> {
        self.keywords.delete(id).await?;
        info!(id, "prohibited keyword deleted");
        Ok(())
    }

    pub async fn list_keywords(&self) -> WorkflowResult<Vec<ProhibitedKeyword>> {
        self.keywords.find_all().await
    }
}
