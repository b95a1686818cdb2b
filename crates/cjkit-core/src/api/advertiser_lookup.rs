//! Advertiser Lookup REST endpoint.
//!
//! Searches the advertiser directory and maps the XML response into
//! [`AdvertiserPage`]. The `requestor-cid` parameter is injected from the
//! configured publisher ID when the query does not set one.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use super::{field, flag, float, int, int_or, text, text_or, unwrap_cj_api};
use crate::decode::as_items;
use crate::error::ApiError;
use crate::executor::{Params, RequestExecutor};

const ENDPOINT: &str = "https://advertiser-lookup.api.cj.com/v3/advertiser-lookup";

/// Search parameters. Unset fields fall back to the documented defaults
/// (`records-per-page` 50, `page-number` 1).
#[derive(Debug, Clone, Default)]
pub struct AdvertiserQuery {
    requestor_cid: Option<String>,
    advertiser_ids: Option<String>,
    advertiser_name: Option<String>,
    keywords: Option<String>,
    page_number: Option<u32>,
    records_per_page: Option<u32>,
    mobile_tracking_certified: Option<bool>,
}

impl AdvertiserQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_requestor_cid(mut self, cid: impl Into<String>) -> Self {
        self.requestor_cid = Some(cid.into());
        self
    }

    /// `"joined"`, `"notjoined"`, or comma-separated advertiser IDs.
    pub fn with_advertiser_ids(mut self, ids: impl Into<String>) -> Self {
        self.advertiser_ids = Some(ids.into());
        self
    }

    pub fn with_advertiser_name(mut self, name: impl Into<String>) -> Self {
        self.advertiser_name = Some(name.into());
        self
    }

    pub fn with_keywords(mut self, keywords: impl Into<String>) -> Self {
        self.keywords = Some(keywords.into());
        self
    }

    pub fn with_page_number(mut self, page_number: u32) -> Self {
        self.page_number = Some(page_number);
        self
    }

    pub fn with_records_per_page(mut self, records_per_page: u32) -> Self {
        self.records_per_page = Some(records_per_page);
        self
    }

    pub fn with_mobile_tracking_certified(mut self, certified: bool) -> Self {
        self.mobile_tracking_certified = Some(certified);
        self
    }

    fn into_params(self, publisher_id: &str) -> Params {
        let mut params = Params::new();
        params.insert(
            String::from("requestor-cid"),
            self.requestor_cid
                .unwrap_or_else(|| publisher_id.to_owned()),
        );
        if let Some(ids) = self.advertiser_ids {
            params.insert(String::from("advertiser-ids"), ids);
        }
        if let Some(name) = self.advertiser_name {
            params.insert(String::from("advertiser-name"), name);
        }
        if let Some(keywords) = self.keywords {
            params.insert(String::from("keywords"), keywords);
        }
        params.insert(
            String::from("records-per-page"),
            self.records_per_page.unwrap_or(50).to_string(),
        );
        params.insert(
            String::from("page-number"),
            self.page_number.unwrap_or(1).to_string(),
        );
        if let Some(certified) = self.mobile_tracking_certified {
            params.insert(
                String::from("mobile-tracking-certified"),
                certified.to_string(),
            );
        }
        params
    }
}

/// One advertiser program as returned by the directory.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Advertiser {
    pub advertiser_id: String,
    pub advertiser_name: String,
    pub program_url: String,
    pub relationship_status: String,
    pub network_rank: i64,
    /// Category subtree as-is; the endpoint nests `parent`/`child` names.
    pub primary_category: Value,
    pub performance_incentives: bool,
    pub actions: Vec<Value>,
    pub seven_day_epc: f64,
    pub three_month_epc: f64,
    pub language: String,
    /// Untouched source map for fields the typed view omits.
    pub raw: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdvertiserPage {
    pub advertisers: Vec<Advertiser>,
    pub total_matched: i64,
    pub records_returned: i64,
    pub page_number: i64,
}

#[derive(Clone)]
pub struct AdvertiserLookup {
    executor: Arc<RequestExecutor>,
    publisher_id: String,
}

impl AdvertiserLookup {
    pub(crate) fn new(executor: Arc<RequestExecutor>, publisher_id: String) -> Self {
        Self {
            executor,
            publisher_id,
        }
    }

    pub async fn search(&self, query: AdvertiserQuery) -> Result<AdvertiserPage, ApiError> {
        let params = query.into_params(&self.publisher_id);
        let value = self.executor.get(ENDPOINT, &params).await?;
        Ok(map_page(&value))
    }

    pub async fn get_by_id(&self, advertiser_id: &str) -> Result<Option<Advertiser>, ApiError> {
        let page = self
            .search(AdvertiserQuery::new().with_advertiser_ids(advertiser_id))
            .await?;
        Ok(page.advertisers.into_iter().next())
    }

    /// Advertisers the publisher already has a relationship with.
    pub async fn joined(&self) -> Result<AdvertiserPage, ApiError> {
        self.search(AdvertiserQuery::new().with_advertiser_ids("joined"))
            .await
    }

    pub async fn not_joined(&self) -> Result<AdvertiserPage, ApiError> {
        self.search(AdvertiserQuery::new().with_advertiser_ids("notjoined"))
            .await
    }

    pub async fn by_name(&self, name: &str) -> Result<AdvertiserPage, ApiError> {
        self.search(AdvertiserQuery::new().with_advertiser_name(name))
            .await
    }

    pub async fn by_keywords(&self, keywords: &str) -> Result<AdvertiserPage, ApiError> {
        self.search(AdvertiserQuery::new().with_keywords(keywords))
            .await
    }
}

fn map_page(value: &Value) -> AdvertiserPage {
    let root = unwrap_cj_api(value);
    let advertisers = root.get("advertisers").unwrap_or(root);
    let mapped: Vec<Advertiser> = advertisers
        .get("advertiser")
        .map(as_items)
        .unwrap_or_default()
        .into_iter()
        .filter(|item| item.as_object().is_some_and(|map| !map.is_empty()))
        .map(map_advertiser)
        .collect();

    AdvertiserPage {
        advertisers: mapped,
        total_matched: int(field(advertisers, "total-matched")),
        records_returned: int(field(advertisers, "records-returned")),
        page_number: int_or(field(advertisers, "page-number"), 1),
    }
}

fn map_advertiser(value: &Value) -> Advertiser {
    Advertiser {
        advertiser_id: text(field(value, "advertiser-id")),
        advertiser_name: text(field(value, "advertiser-name")),
        program_url: text(field(value, "program-url")),
        relationship_status: text(field(value, "relationship-status")),
        network_rank: int(field(value, "network-rank")),
        primary_category: field(value, "primary-category")
            .cloned()
            .unwrap_or(Value::Null),
        performance_incentives: flag(field(value, "performance-incentives")),
        actions: extract_actions(value),
        seven_day_epc: float(field(value, "seven-day-epc")),
        three_month_epc: float(field(value, "three-month-epc")),
        language: text_or(field(value, "language"), "en"),
        raw: value.clone(),
    }
}

/// `actions/action` holds one map or a folded list of maps.
fn extract_actions(advertiser: &Value) -> Vec<Value> {
    advertiser
        .get("actions")
        .and_then(|actions| actions.get("action"))
        .map(as_items)
        .unwrap_or_default()
        .into_iter()
        .filter(|action| action.is_object())
        .cloned()
        .collect()
}
