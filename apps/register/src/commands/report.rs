//! # Report Commands
//!
//! Read-only views over recorded sales.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ApiError;
use shopfront_core::{Money, Sale};
use shopfront_db::Database;

/// Sales for one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyReport {
    pub date: NaiveDate,
    pub total: Money,
    pub sale_count: i64,
    pub units_sold: i64,
    pub sales: Vec<Sale>,
}

/// All recorded sales, newest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesHistory {
    pub total: Money,
    pub sales: Vec<Sale>,
}

pub async fn daily_report(db: &Database, date: NaiveDate) -> Result<DailyReport, ApiError> {
    debug!(date = %date, "daily_report command");

    let sales_repo = db.sales();
    let total = sales_repo.total_for_date(date).await?;
    let sale_count = sales_repo.count_for_date(date).await?;
    let sales = sales_repo.for_date(date).await?;

    Ok(DailyReport {
        date,
        total,
        sale_count,
        units_sold: sales.iter().map(Sale::total_quantity).sum(),
        sales,
    })
}

/// Report for the local calendar day.
pub async fn today_report(db: &Database) -> Result<DailyReport, ApiError> {
    daily_report(db, Local::now().date_naive()).await
}

pub async fn sales_history(db: &Database) -> Result<SalesHistory, ApiError> {
    debug!("sales_history command");
    let sales = db.sales().list_all().await?;
    Ok(SalesHistory {
        total: sales.iter().map(|s| s.total_amount).sum(),
        sales,
    })
}
