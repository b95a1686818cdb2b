//! Link Search REST endpoint.
//!
//! Finds banner/text links for joined programs. The endpoint answers XML
//! with hyphenated tags but camelCase JSON behind some gateways, so the
//! mapping tolerates both spellings.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use super::{field_any, text, unwrap_cj_api};
use crate::decode::as_items;
use crate::error::ApiError;
use crate::executor::{Params, RequestExecutor};

const ENDPOINT: &str = "https://linksearch.api.cj.com/v2/link-search";

/// Search parameters. `website-id` comes from the client configuration
/// unless overridden here; it must not resolve to an empty value.
#[derive(Debug, Clone, Default)]
pub struct LinkQuery {
    website_id: Option<String>,
    advertiser_ids: Option<String>,
    keywords: Option<String>,
    link_type: Option<String>,
    promotion_type: Option<String>,
    category: Option<String>,
    relationship_status: Option<String>,
    page_number: Option<u32>,
    records_per_page: Option<u32>,
}

impl LinkQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_website_id(mut self, website_id: impl Into<String>) -> Self {
        self.website_id = Some(website_id.into());
        self
    }

    pub fn with_advertiser_ids(mut self, ids: impl Into<String>) -> Self {
        self.advertiser_ids = Some(ids.into());
        self
    }

    pub fn with_keywords(mut self, keywords: impl Into<String>) -> Self {
        self.keywords = Some(keywords.into());
        self
    }

    /// `"Banner"`, `"Text Link"`, `"Advanced"`, ...
    pub fn with_link_type(mut self, link_type: impl Into<String>) -> Self {
        self.link_type = Some(link_type.into());
        self
    }

    pub fn with_promotion_type(mut self, promotion_type: impl Into<String>) -> Self {
        self.promotion_type = Some(promotion_type.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// `"joined"` or `"not-joined"`.
    pub fn with_relationship_status(mut self, status: impl Into<String>) -> Self {
        self.relationship_status = Some(status.into());
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

    fn into_params(self, website_id: String) -> Params {
        let mut params = Params::new();
        params.insert(String::from("website-id"), website_id);
        if let Some(ids) = self.advertiser_ids {
            params.insert(String::from("advertiser-ids"), ids);
        }
        if let Some(keywords) = self.keywords {
            params.insert(String::from("keywords"), keywords);
        }
        if let Some(link_type) = self.link_type {
            params.insert(String::from("link-type"), link_type);
        }
        if let Some(promotion_type) = self.promotion_type {
            params.insert(String::from("promotion-type"), promotion_type);
        }
        if let Some(category) = self.category {
            params.insert(String::from("category"), category);
        }
        if let Some(status) = self.relationship_status {
            params.insert(String::from("relationship-status"), status);
        }
        params.insert(
            String::from("records-per-page"),
            self.records_per_page.unwrap_or(50).to_string(),
        );
        params.insert(
            String::from("page-number"),
            self.page_number.unwrap_or(1).to_string(),
        );
        params
    }
}

/// One affiliate link with its tracking code variants.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Link {
    pub link_id: String,
    pub link_name: String,
    pub link_type: String,
    pub advertiser_id: String,
    pub advertiser_name: String,
    pub category: String,
    pub link_code_html: String,
    pub link_code_javascript: String,
    pub description: String,
    pub destination: String,
    pub click_commission: String,
    pub sale_commission: String,
    pub relationship_status: String,
    pub promotion_type: String,
    pub promotion_start_date: Option<String>,
    pub promotion_end_date: Option<String>,
    pub coupon_code: String,
    pub raw: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkPage {
    pub links: Vec<Link>,
    pub total_matched: i64,
    pub records_returned: i64,
    pub page_number: i64,
}

#[derive(Clone)]
pub struct LinkSearch {
    executor: Arc<RequestExecutor>,
    website_id: String,
}

impl LinkSearch {
    pub(crate) fn new(executor: Arc<RequestExecutor>, website_id: String) -> Self {
        Self {
            executor,
            website_id,
        }
    }

    pub async fn search(&self, query: LinkQuery) -> Result<LinkPage, ApiError> {
        let website_id = query
            .website_id
            .clone()
            .unwrap_or_else(|| self.website_id.clone());
        if website_id.trim().is_empty() {
            return Err(ApiError::invalid_request(
                "website-id is required for link search",
            ));
        }
        let params = query.into_params(website_id);
        let value = self.executor.get(ENDPOINT, &params).await?;
        Ok(map_page(&value))
    }

    pub async fn by_advertiser(&self, advertiser_id: &str) -> Result<LinkPage, ApiError> {
        self.search(LinkQuery::new().with_advertiser_ids(advertiser_id))
            .await
    }

    pub async fn by_keywords(&self, keywords: &str) -> Result<LinkPage, ApiError> {
        self.search(LinkQuery::new().with_keywords(keywords)).await
    }
}

fn map_page(value: &Value) -> LinkPage {
    let root = unwrap_cj_api(value);
    let links_el = root.get("links").unwrap_or(root);
    let links: Vec<Link> = links_el
        .get("link")
        .map(as_items)
        .unwrap_or_default()
        .into_iter()
        .filter(|item| item.as_object().is_some_and(|map| !map.is_empty()))
        .map(map_link)
        .collect();

    let fallback = links.len() as i64;
    LinkPage {
        total_matched: number_or(links_el, &["totalMatched", "total-matched"], fallback),
        records_returned: number_or(links_el, &["recordsReturned", "records-returned"], fallback),
        page_number: number_or(links_el, &["pageNumber", "page-number"], 1),
        links,
    }
}

fn number_or(value: &Value, names: &[&str], default: i64) -> i64 {
    super::int_or(field_any(value, names), default)
}

fn map_link(value: &Value) -> Link {
    let take = |names: &[&str]| text(field_any(value, names));
    let take_opt = |names: &[&str]| {
        let found = text(field_any(value, names));
        if found.is_empty() {
            None
        } else {
            Some(found)
        }
    };

    Link {
        link_id: take(&["linkId", "link-id"]),
        link_name: take(&["linkName", "link-name"]),
        link_type: take(&["linkType", "link-type"]),
        advertiser_id: take(&["advertiserId", "advertiser-id"]),
        advertiser_name: take(&["advertiserName", "advertiser-name"]),
        category: take(&["category"]),
        link_code_html: take(&["linkCodeHtml", "link-code-html"]),
        link_code_javascript: take(&["linkCodeJavascript", "link-code-javascript"]),
        description: take(&["description"]),
        destination: take(&["destination"]),
        click_commission: take(&["clickCommission", "click-commission"]),
        sale_commission: take(&["saleCommission", "sale-commission"]),
        relationship_status: take(&["relationshipStatus", "relationship-status"]),
        promotion_type: take(&["promotionType", "promotion-type"]),
        promotion_start_date: take_opt(&["promotionStartDate", "promotion-start-date"]),
        promotion_end_date: take_opt(&["promotionEndDate", "promotion-end-date"]),
        coupon_code: take(&["couponCode", "coupon-code"]),
        raw: value.clone(),
    }
}
