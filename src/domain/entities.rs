//! Domain entities
//!
//! Core catalog entities and the derived snapshots served to the
//! dashboard.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::funnel::WorkflowStage;

/// One catalog item. `id` is opaque and stable across stages; `sku` is
/// assigned once the item reaches `Ready` or later.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub sku: Option<String>,
    pub title: String,
    pub current_price: f64,
    pub stage: WorkflowStage,
    pub risk_level: RiskLevel,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// Advisory risk flag. Does not gate stage transitions by itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

/// Subset of product fields returned by search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductProjection {
    pub id: String,
    pub title: String,
    #[serde(rename = "currentPrice")]
    pub current_price: f64,
    pub sku: Option<String>,
}

impl From<Product> for ProductProjection {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            title: product.title,
            current_price: product.current_price,
            sku: product.sku,
        }
    }
}

/// Cumulative funnel snapshot: each stage count is the number of
/// products at or beyond that stage. Recomputed on every stats request,
/// never cached across requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total: u64,
    pub scraped: u64,
    pub calculated: u64,
    pub filtered: u64,
    pub ready: u64,
    pub listed: u64,
}

impl DashboardStats {
    pub fn count_for(&self, stage: WorkflowStage) -> u64 {
        match stage {
            WorkflowStage::Scraped => self.scraped,
            WorkflowStage::Calculated => self.calculated,
            WorkflowStage::Filtered => self.filtered,
            WorkflowStage::Ready => self.ready,
            WorkflowStage::Listed => self.listed,
        }
    }

    pub fn set_count(&mut self, stage: WorkflowStage, count: u64) {
        match stage {
            WorkflowStage::Scraped => self.scraped = count,
            WorkflowStage::Calculated => self.calculated = count,
            WorkflowStage::Filtered => self.filtered = count,
            WorkflowStage::Ready => self.ready = count,
            WorkflowStage::Listed => self.listed = count,
        }
    }
}

/// Connectivity probe payload for the `test_database` action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseCheck {
    pub status: String,
    pub total_records: u64,
    pub message: String,
}

/// Filter-list record consulted by catalog filtering (the filtering
/// itself lives outside this core).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProhibitedKeyword {
    pub id: i64,
    pub keyword: String,
    pub category: String,
    pub priority: i64,
    pub status: String,
    pub description: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// Insert payload for the prohibited-keyword list.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProhibitedKeyword {
    pub keyword: String,
    pub category: String,
    #[serde(default)]
    pub priority: i64,
    #[serde(default = "default_keyword_status")]
    pub status: String,
    #[serde(default)]
    pub description: Option<String>,
}

fn default_keyword_status() -> String {
    "active".to_string()
}

/// Partial update for a keyword record. `None` fields are left as-is.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KeywordPatch {
    pub keyword: Option<String>,
    pub category: Option<String>,
    pub priority: Option<i64>,
    pub status: Option<String>,
    pub description: Option<String>,
}

impl KeywordPatch {
    pub fn is_empty(&self) -> bool {
        self.keyword.is_none()
            && self.category.is_none()
            && self.priority.is_none()
            && self.status.is_none()
            && self.description.is_none()
    }
}

/// Adapter-level search criteria, produced by the search engine and
/// executed verbatim by the catalog store.
#[derive(Debug, Clone, Default)]
pub struct SearchCriteria {
    pub title_term: Option<String>,
    pub stage: Option<WorkflowStage>,
    pub risk_level: Option<RiskLevel>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub limit: u32,
    pub offset: u32,
}
