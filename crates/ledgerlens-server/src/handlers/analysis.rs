//! Spending analysis handlers
//!
//! All three accept the window fields (`days`, `weeks`, `months`, `years`,
//! `period`, `startDate`, `endDate`) as query parameters.

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use super::transactions::query_params;
use crate::{AppError, AppState, Owner};
use ledgerlens_core::models::{CategoryAnalysis, SpendingAnalysis, SpendingSummary};
use ledgerlens_core::WindowQuery;

/// Analysis body with `success` alongside the flattened result
#[derive(Debug, Serialize)]
pub struct AnalysisResponse<T> {
    pub success: bool,
    #[serde(flatten)]
    pub body: T,
}

impl<T> From<T> for AnalysisResponse<T> {
    fn from(body: T) -> Self {
        Self {
            success: true,
            body,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CategoryQuery {
    #[serde(flatten)]
    pub window: WindowQuery,
    /// Restrict the analysis to one category (exact match)
    pub category: Option<String>,
}

/// GET /api/transactions/analysis/summary
pub async fn spending_summary(
    State(state): State<Arc<AppState>>,
    Extension(owner): Extension<Owner>,
    params: Result<Query<WindowQuery>, QueryRejection>,
) -> Result<Json<AnalysisResponse<SpendingSummary>>, AppError> {
    let spec = query_params(params)?.parse()?;
    let summary = state.service.spending_summary(&owner.0, &spec)?;
    Ok(Json(summary.into()))
}

/// GET /api/transactions/analysis/spending
pub async fn spending_analysis(
    State(state): State<Arc<AppState>>,
    Extension(owner): Extension<Owner>,
    params: Result<Query<WindowQuery>, QueryRejection>,
) -> Result<Json<AnalysisResponse<SpendingAnalysis>>, AppError> {
    let spec = query_params(params)?.parse()?;
    let analysis = state.service.spending_analysis(&owner.0, &spec)?;
    Ok(Json(analysis.into()))
}

/// GET /api/transactions/analysis/categories
pub async fn category_analysis(
    State(state): State<Arc<AppState>>,
    Extension(owner): Extension<Owner>,
    params: Result<Query<CategoryQuery>, QueryRejection>,
) -> Result<Json<AnalysisResponse<CategoryAnalysis>>, AppError> {
    let params = query_params(params)?;
    let spec = params.window.parse()?;
    let analysis = state
        .service
        .category_analysis(&owner.0, &spec, params.category.as_deref())?;
    Ok(Json(analysis.into()))
}
