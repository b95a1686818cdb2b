//! Product Feed GraphQL endpoint.
//!
//! Searches advertiser product catalogs. The publisher ID becomes the
//! GraphQL `companyId` argument and the website ID is passed as the `pid`
//! of the `linkCode` field so every product carries a tracking URL.

use std::sync::Arc;

use serde::Serialize;
use serde_json::{json, Value};

use super::{float, gql_string, gql_string_list, text, text_or};
use crate::decode::as_items;
use crate::error::ApiError;
use crate::executor::{RequestBody, RequestExecutor};

const ENDPOINT: &str = "https://ads.api.cj.com/query";

/// Hard upstream cap on the `limit` argument.
const MAX_LIMIT: u32 = 10_000;

#[derive(Debug, Clone, Default)]
pub struct ProductQuery {
    advertiser_ids: Vec<String>,
    keywords: Vec<String>,
    limit: Option<u32>,
    offset: Option<u32>,
}

impl ProductQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_advertiser_id(mut self, id: impl Into<String>) -> Self {
        self.advertiser_ids.push(id.into());
        self
    }

    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keywords.push(keyword.into());
        self
    }

    /// Defaults to 50; values above 10 000 are clamped.
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }
}

/// Monetary amount as the feed reports it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Money {
    pub amount: f64,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    pub id: String,
    pub title: String,
    pub description: String,
    pub price: Money,
    pub sale_price: Option<Money>,
    pub link: String,
    /// Tracking URL minted for the configured website ID.
    pub affiliate_link: Option<String>,
    pub image_url: String,
    pub brand: String,
    pub advertiser_id: String,
    pub advertiser_name: String,
    pub raw: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub total_count: i64,
    pub count: i64,
}

#[derive(Clone)]
pub struct ProductSearch {
    executor: Arc<RequestExecutor>,
    publisher_id: String,
    website_id: String,
}

impl ProductSearch {
    pub(crate) fn new(
        executor: Arc<RequestExecutor>,
        publisher_id: String,
        website_id: String,
    ) -> Self {
        Self {
            executor,
            publisher_id,
            website_id,
        }
    }

    pub async fn search(&self, query: ProductQuery) -> Result<ProductPage, ApiError> {
        let document = build_query(&self.publisher_id, &self.website_id, &query);
        let value = self
            .executor
            .post(ENDPOINT, &RequestBody::Json(json!({ "query": document })))
            .await?;
        Ok(map_page(&value))
    }

    /// Looks the product up in the first page of an (optionally
    /// advertiser-scoped) single-record search.
    pub async fn get_by_id(
        &self,
        product_id: &str,
        advertiser_id: Option<&str>,
    ) -> Result<Option<Product>, ApiError> {
        let mut query = ProductQuery::new().with_limit(1);
        if let Some(advertiser_id) = advertiser_id {
            query = query.with_advertiser_id(advertiser_id);
        }
        let page = self.search(query).await?;
        Ok(page
            .products
            .into_iter()
            .find(|product| product.id == product_id))
    }
}

fn build_query(publisher_id: &str, website_id: &str, query: &ProductQuery) -> String {
    let mut args = vec![format!("companyId: {}", gql_string(publisher_id))];
    if !query.advertiser_ids.is_empty() {
        args.push(format!(
            "partnerIds: {}",
            gql_string_list(&query.advertiser_ids)
        ));
    }
    if !query.keywords.is_empty() {
        args.push(format!("keywords: {}", gql_string_list(&query.keywords)));
    }
    args.push(format!(
        "limit: {}",
        query.limit.unwrap_or(50).min(MAX_LIMIT)
    ));
    if let Some(offset) = query.offset.filter(|offset| *offset > 0) {
        args.push(format!("offset: {offset}"));
    }

    format!(
        "{{\n  products({args}) {{\n    totalCount\n    count\n    resultList {{\n      id\n      \
         title\n      description\n      price {{\n        amount\n        currency\n      }}\n      \
         salePrice {{\n        amount\n        currency\n      }}\n      link\n      imageLink\n      \
         brand\n      advertiserId\n      advertiserName\n      linkCode(pid: {pid}) {{ clickUrl }}\n    \
         }}\n  }}\n}}",
        args = args.join(", "),
        pid = gql_string(website_id)
    )
}

fn map_page(value: &Value) -> ProductPage {
    let data = value.pointer("/data/products");
    let products: Vec<Product> = data
        .and_then(|products| products.get("resultList"))
        .map(as_items)
        .unwrap_or_default()
        .into_iter()
        .filter(|item| item.as_object().is_some_and(|map| !map.is_empty()))
        .map(map_product)
        .collect();

    ProductPage {
        products,
        total_count: super::int(data.and_then(|products| products.get("totalCount"))),
        count: super::int(data.and_then(|products| products.get("count"))),
    }
}

fn map_product(value: &Value) -> Product {
    Product {
        id: text(value.get("id")),
        title: text(value.get("title")),
        description: text(value.get("description")),
        price: map_money(value.get("price")),
        sale_price: value
            .get("salePrice")
            .filter(|sale| !sale.is_null())
            .map(|sale| map_money(Some(sale))),
        link: text(value.get("link")),
        affiliate_link: value
            .pointer("/linkCode/clickUrl")
            .and_then(Value::as_str)
            .map(str::to_owned),
        image_url: text(value.get("imageLink")),
        brand: text(value.get("brand")),
        advertiser_id: text(value.get("advertiserId")),
        advertiser_name: text(value.get("advertiserName")),
        raw: value.clone(),
    }
}

fn map_money(value: Option<&Value>) -> Money {
    Money {
        amount: float(value.and_then(|money| money.get("amount"))),
        currency: text_or(value.and_then(|money| money.get("currency")), "USD"),
    }
}
