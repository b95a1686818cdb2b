//! Client SDK for the CJ Affiliate (Commission Junction) APIs.
//!
//! This crate contains:
//! - A transport seam (`HttpClient` trait) with a reqwest implementation
//! - The request executor: bearer auth, response cache, decode, classify
//! - XML/JSON normalization into one `serde_json::Value` shape
//! - Typed endpoint modules for the REST and GraphQL APIs
//! - File-backed TTL response caching

pub mod api;
pub mod cache;
pub mod client;
pub mod config;
pub mod decode;
pub mod error;
pub mod executor;
pub mod http_client;

pub use api::{
    Advertiser, AdvertiserLookup, AdvertiserPage, AdvertiserQuery, AdvertiserTotals,
    CommissionDetail, CommissionQuery, CommissionSummary, Link, LinkPage, LinkQuery, LinkSearch,
    Money, NewPromotionalProperty, OfferFeed, Product, ProductPage, ProductQuery, ProductSearch,
    ProgramTerms, PromotionalProperties, PromotionalPropertyUpdate,
};
pub use cache::{CacheMode, ResponseCache};
pub use client::CjClient;
pub use config::ClientConfig;
pub use decode::{as_items, decode};
pub use error::ApiError;
pub use executor::{Params, RequestBody, RequestExecutor};
pub use http_client::{
    HttpAuth, HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse, ReqwestHttpClient,
};
