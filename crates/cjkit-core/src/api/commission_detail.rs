//! Commission Detail GraphQL endpoint.
//!
//! Near-real-time commission records for publishers and advertisers. The
//! raw queries return the normalized GraphQL tree untouched; `summary`
//! aggregates publisher records into a [`CommissionSummary`].

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use serde_json::{json, Value};
use time::{Date, OffsetDateTime};

use super::{float, gql_string, text};
use crate::decode::as_items;
use crate::error::ApiError;
use crate::executor::{RequestBody, RequestExecutor};

const ENDPOINT: &str = "https://commissions.api.cj.com/query";

/// Date range and publisher scope for commission queries. Dates are
/// `YYYY-MM-DD` strings as the upstream expects them.
#[derive(Debug, Clone, Default)]
pub struct CommissionQuery {
    publisher_id: Option<String>,
    start_date: Option<String>,
    end_date: Option<String>,
}

impl CommissionQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_publisher_id(mut self, publisher_id: impl Into<String>) -> Self {
        self.publisher_id = Some(publisher_id.into());
        self
    }

    pub fn with_start_date(mut self, start_date: impl Into<String>) -> Self {
        self.start_date = Some(start_date.into());
        self
    }

    pub fn with_end_date(mut self, end_date: impl Into<String>) -> Self {
        self.end_date = Some(end_date.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct AdvertiserTotals {
    pub count: u64,
    pub amount: f64,
}

/// Aggregated view of one period of publisher commissions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommissionSummary {
    pub total_commissions: u64,
    /// Sum of `pubCommissionAmountUsd` over the period.
    pub total_amount: f64,
    pub by_status: BTreeMap<String, u64>,
    pub by_advertiser: BTreeMap<String, AdvertiserTotals>,
    pub period_start: String,
    pub period_end: String,
}

#[derive(Clone)]
pub struct CommissionDetail {
    executor: Arc<RequestExecutor>,
    publisher_id: String,
}

impl CommissionDetail {
    pub(crate) fn new(executor: Arc<RequestExecutor>, publisher_id: String) -> Self {
        Self {
            executor,
            publisher_id,
        }
    }

    /// Commission records for the publisher. The date range defaults to
    /// the last 30 days.
    pub async fn publisher_commissions(&self, query: CommissionQuery) -> Result<Value, ApiError> {
        let publisher_id = query
            .publisher_id
            .unwrap_or_else(|| self.publisher_id.clone());
        let start = query.start_date.unwrap_or_else(thirty_days_ago);
        let end = query.end_date.unwrap_or_else(today);
        let document = publisher_commissions_query(&publisher_id, &start, &end);
        self.execute(document).await
    }

    /// Commission records as seen from an advertiser account. The date
    /// range defaults to the last 30 days; the query's publisher scope is
    /// not used here.
    pub async fn advertiser_commissions(
        &self,
        advertiser_id: &str,
        query: CommissionQuery,
    ) -> Result<Value, ApiError> {
        let start = query.start_date.unwrap_or_else(thirty_days_ago);
        let end = query.end_date.unwrap_or_else(today);
        let document = advertiser_commissions_query(advertiser_id, &start, &end);
        self.execute(document).await
    }

    /// Aggregate the period's publisher commissions by status and by
    /// advertiser. The period defaults to the current month to date.
    pub async fn summary(&self, query: CommissionQuery) -> Result<CommissionSummary, ApiError> {
        let publisher_id = query
            .publisher_id
            .unwrap_or_else(|| self.publisher_id.clone());
        let start = query.start_date.unwrap_or_else(first_of_month);
        let end = query.end_date.unwrap_or_else(today);

        let value = self
            .publisher_commissions(
                CommissionQuery::new()
                    .with_publisher_id(publisher_id)
                    .with_start_date(start.clone())
                    .with_end_date(end.clone()),
            )
            .await?;
        Ok(summarize(&value, start, end))
    }

    async fn execute(&self, document: String) -> Result<Value, ApiError> {
        self.executor
            .post(ENDPOINT, &RequestBody::Json(json!({ "query": document })))
            .await
    }
}

fn publisher_commissions_query(publisher_id: &str, start: &str, end: &str) -> String {
    format!(
        "{{\n  publisherCommissions(\n    forPublishers: [{publisher}],\n    dateRange: \
         {{startDate: {start}, endDate: {end}}}\n  ) {{\n    totalCount\n    records {{\n      \
         commissionId\n      actionDate\n      eventDate\n      orderId\n      advertiserId\n      \
         advertiserName\n      commissionAmount\n      saleAmount\n      pubCommissionAmountUsd\n      \
         actionStatus\n      actionType\n      websiteName\n      postingDate\n    }}\n  }}\n}}",
        publisher = gql_string(publisher_id),
        start = gql_string(start),
        end = gql_string(end)
    )
}

fn advertiser_commissions_query(advertiser_id: &str, start: &str, end: &str) -> String {
    format!(
        "{{\n  advertiserCommissions(\n    forAdvertisers: [{advertiser}],\n    dateRange: \
         {{startDate: {start}, endDate: {end}}}\n  ) {{\n    totalCount\n    records {{\n      \
         commissionId\n      actionDate\n      orderId\n      publisherId\n      publisherName\n      \
         commissionAmount\n      saleAmount\n      actionStatus\n      actionType\n    }}\n  }}\n}}",
        advertiser = gql_string(advertiser_id),
        start = gql_string(start),
        end = gql_string(end)
    )
}

fn summarize(value: &Value, period_start: String, period_end: String) -> CommissionSummary {
    let mut summary = CommissionSummary {
        total_commissions: 0,
        total_amount: 0.0,
        by_status: BTreeMap::new(),
        by_advertiser: BTreeMap::new(),
        period_start,
        period_end,
    };

    let records = value
        .pointer("/data/publisherCommissions/records")
        .map(as_items)
        .unwrap_or_default();
    for record in records {
        let amount = float(record.get("pubCommissionAmountUsd"));
        summary.total_commissions += 1;
        summary.total_amount += amount;

        let status = text(record.get("actionStatus"));
        *summary.by_status.entry(status).or_insert(0) += 1;

        let advertiser = text(record.get("advertiserName"));
        let totals = summary.by_advertiser.entry(advertiser).or_default();
        totals.count += 1;
        totals.amount += amount;
    }
    summary
}

fn today() -> String {
    format_date(OffsetDateTime::now_utc().date())
}

fn thirty_days_ago() -> String {
    format_date(OffsetDateTime::now_utc().date() - time::Duration::days(30))
}

fn first_of_month() -> String {
    let date = OffsetDateTime::now_utc().date();
    format_date(date.replace_day(1).unwrap_or(date))
}

fn format_date(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}
