//! Catalog store adapter backed by SQLite
//!
//! Pure reads and writes against the `products` table. Stage strings
//! are decoded through the funnel model; a row that fails to decode is
//! treated as a store failure rather than silently dropped.

#![allow(clippy::uninlined_format_args)]

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::domain::entities::{Product, RiskLevel, SearchCriteria};
use crate::domain::errors::{WorkflowError, WorkflowResult};
use crate::domain::funnel::WorkflowStage;
use crate::domain::repositories::CatalogRepository;

#[derive(Clone)]
pub struct SqliteCatalogRepository {
    pool: Arc<SqlitePool>,
}

enum BindValue {
    Text(String),
    Real(f64),
}

impl SqliteCatalogRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    fn product_from_row(row: &SqliteRow) -> WorkflowResult<Product> {
        let id: String = row.get("id");
        let stage_raw: String = row.get("stage");
        let stage = WorkflowStage::parse(&stage_raw).ok_or_else(|| {
            WorkflowError::store_unavailable(format!(
                "unrecognized stage '{}' on product {}",
                stage_raw, id
            ))
        })?;
        let risk_raw: String = row.get("risk_level");
        let risk_level = RiskLevel::parse(&risk_raw).ok_or_else(|| {
            WorkflowError::store_unavailable(format!(
                "unrecognized risk level '{}' on product {}",
                risk_raw, id
            ))
        })?;

        Ok(Product {
            id,
            sku: row.get("sku"),
            title: row.get("title"),
            current_price: row.get("current_price"),
            stage,
            risk_level,
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }

    fn placeholders(count: usize) -> String {
        vec!["?"; count].join(", ")
    }
}

#[async_trait]
impl CatalogRepository for SqliteCatalogRepository {
    async fn count_all(&self) -> WorkflowResult<u64> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&*self.pool)
            .await?;
        Ok(total as u64)
    }

    async fn count_at_or_beyond(&self, stage: WorkflowStage) -> WorkflowResult<u64> {
        let stages = stage.and_beyond();
        let sql = format!(
            "SELECT COUNT(*) FROM products WHERE stage IN ({})",
            Self::placeholders(stages.len())
        );
        let mut query = sqlx::query_scalar::<_, i64>(&sql);
        for s in stages {
            query = query.bind(s.as_str());
        }
        let count = query.fetch_one(&*self.pool).await?;
        Ok(count as u64)
    }

    async fn find(&self, criteria: &SearchCriteria) -> WorkflowResult<Vec<Product>> {
        let mut conditions: Vec<&str> = Vec::new();
        let mut binds: Vec<BindValue> = Vec::new();

        // Build WHERE clause based on criteria
        if let Some(term) = &criteria.title_term {
            conditions.push("LOWER(title) LIKE ?");
            binds.push(BindValue::Text(format!("%{}%", term.to_lowercase())));
        }
        if let Some(stage) = criteria.stage {
            conditions.push("stage = ?");
            binds.push(BindValue::Text(stage.as_str().to_string()));
        }
        if let Some(risk) = criteria.risk_level {
            conditions.push("risk_level = ?");
            binds.push(BindValue::Text(risk.as_str().to_string()));
        }
        if let Some(min_price) = criteria.min_price {
            conditions.push("current_price >= ?");
            binds.push(BindValue::Real(min_price));
        }
        if let Some(max_price) = criteria.max_price {
            conditions.push("current_price <= ?");
            binds.push(BindValue::Real(max_price));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let sql = format!(
            r#"
            SELECT id, sku, title, current_price, stage, risk_level, created_at, updated_at
            FROM products
            {}
            ORDER BY current_price DESC, id ASC
            LIMIT ? OFFSET ?
            "#,
            where_clause
        );

        let mut query = sqlx::query(&sql);
        for bind in &binds {
            query = match bind {
                BindValue::Text(value) => query.bind(value),
                BindValue::Real(value) => query.bind(value),
            };
        }
        query = query.bind(i64::from(criteria.limit)).bind(i64::from(criteria.offset));

        let rows = query.fetch_all(&*self.pool).await?;
        rows.iter().map(Self::product_from_row).collect()
    }

    async fn find_by_ids(&self, ids: &[String]) -> WorkflowResult<Vec<Product>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            r#"
            SELECT id, sku, title, current_price, stage, risk_level, created_at, updated_at
            FROM products
            WHERE id IN ({})
            "#,
            Self::placeholders(ids.len())
        );
        let mut query = sqlx::query(&sql);
        for id in ids {
            query = query.bind(id);
        }
        let rows = query.fetch_all(&*self.pool).await?;
        rows.iter().map(Self::product_from_row).collect()
    }

    async fn update_stage(
        &self,
        ids: &[String],
        from_stage: WorkflowStage,
        new_stage: WorkflowStage,
    ) -> WorkflowResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }
        // The stage guard keeps each row update atomic: a row moved by
        // a concurrent request no longer matches and is left alone.
        let sql = format!(
            "UPDATE products SET stage = ?, updated_at = ? WHERE stage = ? AND id IN ({})",
            Self::placeholders(ids.len())
        );
        let mut query = sqlx::query(&sql)
            .bind(new_stage.as_str())
            .bind(Utc::now())
            .bind(from_stage.as_str());
        for id in ids {
            query = query.bind(id);
        }
        let result = query.execute(&*self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn insert_product(&self, product: &Product) -> WorkflowResult<()> {
        sqlx::query(
            r#"
            INSERT INTO products (id, sku, title, current_price, stage, risk_level, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&product.id)
        .bind(&product.sku)
        .bind(&product.title)
        .bind(product.current_price)
        .bind(product.stage.as_str())
        .bind(product.risk_level.as_str())
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&*self.pool)
        .await?;
        Ok(())
    }
}
