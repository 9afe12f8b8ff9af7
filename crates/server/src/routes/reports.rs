//! Report route handlers.

use axum::{Json, extract::State};
use chrono::Utc;
use serde::Deserialize;
use tracing::instrument;

use crate::db::OrderRepository;
use crate::error::Result;
use crate::middleware::{RequireAdmin, RequireAuth};
use crate::routes::AppQuery;
use crate::services::reports::{
    PurchaseReport, ReportPeriod, SalesReport, purchase_report, sales_report,
};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct PeriodQuery {
    #[serde(default)]
    pub period: ReportPeriod,
}

/// The logged-in customer's purchase report.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn purchases(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    AppQuery(query): AppQuery<PeriodQuery>,
) -> Result<Json<PurchaseReport>> {
    let orders = OrderRepository::new(state.pool())
        .list_for_user(user.id)
        .await?;
    let orders = query.period.filter(orders, Utc::now());

    Ok(Json(purchase_report(
        orders,
        query.period,
        state.config().report_offset,
    )))
}

/// Store-wide sales report.
#[instrument(skip(state, admin), fields(admin_id = %admin.id))]
pub async fn sales(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    AppQuery(query): AppQuery<PeriodQuery>,
) -> Result<Json<SalesReport>> {
    let orders = OrderRepository::new(state.pool()).list_all().await?;
    let orders = query.period.filter(orders, Utc::now());

    Ok(Json(sales_report(
        &orders,
        query.period,
        state.config().report_offset,
    )))
}
