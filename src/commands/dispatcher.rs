//! Single-endpoint action dispatcher
//!
//! A linear state machine over one request: parse, classify, guard,
//! execute, respond. Requests without an `action` parameter belong to
//! the page-render path and are passed back to the caller untouched.
//! The only cross-request state is the session's CSRF token, which is
//! read-only here.

use std::sync::Arc;

use serde_json::Value;
use tracing::{error, warn};

use crate::application::dto::{ActionRequest, ActionResponse, ResponsePayload, SessionContext};
use crate::application::search::{SearchEngine, SearchOutcome};
use crate::application::{ApprovalUseCase, KeywordUseCase, StatsAggregator};
use crate::domain::errors::{WorkflowError, WorkflowResult};
use crate::domain::repositories::{CatalogRepository, KeywordRepository};

/// What the caller should do with the request.
#[derive(Debug)]
pub enum DispatchOutcome {
    /// No `action` parameter: render the dashboard page (outside this
    /// core).
    RenderPage,
    /// JSON action: serialize this envelope.
    Json(ActionResponse),
}

pub struct Dispatcher {
    stats: StatsAggregator,
    search: SearchEngine,
    approval: ApprovalUseCase,
    keywords: KeywordUseCase,
}

impl Dispatcher {
    pub fn new(
        catalog: Arc<dyn CatalogRepository>,
        keywords: Arc<dyn KeywordRepository>,
        search_result_cap: u32,
    ) -> Self {
        Self {
            stats: StatsAggregator::new(Arc::clone(&catalog)),
            search: SearchEngine::new(Arc::clone(&catalog), search_result_cap),
            approval: ApprovalUseCase::new(catalog),
            keywords: KeywordUseCase::new(keywords),
        }
    }

    /// Handle one request. `params` is the merged query-string/body
    /// parameter map; `session` carries the session's CSRF token.
    pub async fn dispatch(&self, params: &Value, session: &SessionContext) -> DispatchOutcome {
        // Parse
        let request = match ActionRequest::from_params(params) {
            Ok(Some(request)) => request,
            Ok(None) => return DispatchOutcome::RenderPage,
            Err(err) => {
                warn!(error = %err, "request rejected at parse");
                return DispatchOutcome::Json(ActionResponse::from_error("invalid", &err));
            }
        };
        let action = request.name();

        // Classify + guard: mutations fail closed before any execution.
        if request.is_mutating() {
            let supplied = params.get("csrf_token").and_then(Value::as_str);
            let accepted = matches!(supplied, Some(token) if session.csrf_token.matches(token));
            if !accepted {
                warn!(action, supplied = supplied.is_some(), "csrf check failed, mutation refused");
                return DispatchOutcome::Json(ActionResponse::from_error(
                    action,
                    &WorkflowError::CsrfRejected,
                ));
            }
        }

        // Execute + respond
        let response = match self.execute(request).await {
            Ok(response) => response,
            Err(err) => {
                if err.is_client_fault() {
                    warn!(action, error = %err, "action failed");
                } else {
                    error!(action, error = %err, "action failed");
                }
                ActionResponse::from_error(action, &err)
            }
        };
        DispatchOutcome::Json(response)
    }

    async fn execute(&self, request: ActionRequest) -> WorkflowResult<ActionResponse> {
        let action = request.name();
        match request {
            ActionRequest::GetDashboardStats => {
                let stats = self.stats.compute_stats().await?;
                Ok(ActionResponse::ok(action, ResponsePayload::Stats(stats)))
            }
            ActionRequest::SearchProducts { query } => {
                match self.search.search(&query).await? {
                    SearchOutcome::NoCriteria => {
                        Ok(ActionResponse::failure(action, "no search criteria supplied"))
                    }
                    SearchOutcome::Matches(products) => {
                        Ok(ActionResponse::ok(action, ResponsePayload::Products(products)))
                    }
                }
            }
            ActionRequest::TestDatabase => {
                let check = self.stats.probe_database().await;
                Ok(ActionResponse::ok(action, ResponsePayload::Database(check)))
            }
            ActionRequest::ApproveProducts {
                ids,
                decision,
                reviewer,
            } => {
                let approved = self
                    .approval
                    .approve_products(&ids, &decision, &reviewer)
                    .await?;
                Ok(ActionResponse::ok(action, ResponsePayload::Approved { approved }))
            }
            ActionRequest::AddProhibitedKeyword { keyword } => {
                self.keywords.add_keyword(&keyword).await?;
                Ok(ActionResponse::ok(action, ResponsePayload::Applied(true)))
            }
            ActionRequest::UpdateProhibitedKeyword { id, patch } => {
                self.keywords.update_keyword(id, &patch).await?;
                Ok(ActionResponse::ok(action, ResponsePayload::Applied(true)))
            }
            ActionRequest::DeleteProhibitedKeyword { id } => {
                self.keywords.delete_keyword(id).await?;
                Ok(ActionResponse::ok(action, ResponsePayload::Applied(true)))
            }
        }
    }
}
