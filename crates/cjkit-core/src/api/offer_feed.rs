//! Offer Feed REST endpoint.
//!
//! Automated offer and promotion listings. The response schema varies by
//! account, so this module returns the normalized tree untouched and only
//! applies paging defaults.

use std::sync::Arc;

use serde_json::Value;

use crate::error::ApiError;
use crate::executor::{Params, RequestExecutor};

const ENDPOINT: &str = "https://api.cj.com/query";

#[derive(Clone)]
pub struct OfferFeed {
    executor: Arc<RequestExecutor>,
}

impl OfferFeed {
    pub(crate) fn new(executor: Arc<RequestExecutor>) -> Self {
        Self { executor }
    }

    pub async fn search(&self, params: &Params) -> Result<Value, ApiError> {
        let params = with_paging_defaults(params.clone());
        self.executor.get(ENDPOINT, &params).await
    }

    pub async fn active_offers(&self) -> Result<Value, ApiError> {
        let mut params = Params::new();
        params.insert(String::from("status"), String::from("active"));
        self.search(&params).await
    }
}

fn with_paging_defaults(mut params: Params) -> Params {
    params
        .entry(String::from("records-per-page"))
        .or_insert_with(|| String::from("50"));
    params
        .entry(String::from("page-number"))
        .or_insert_with(|| String::from("1"));
    params
}
