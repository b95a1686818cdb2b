//! Promotional Properties GraphQL endpoint.
//!
//! Manages the publisher's promotional properties (PIDs). Every call runs
//! with [`CacheMode::Bypass`]: the listing must reflect mutations
//! immediately and the mutations themselves must never be replayed from
//! cache.

use std::sync::Arc;

use serde_json::{json, Value};

use super::gql_string;
use crate::cache::CacheMode;
use crate::error::ApiError;
use crate::executor::{RequestBody, RequestExecutor};

const ENDPOINT: &str = "https://accounts.api.cj.com/graphql";

/// Fields for creating a promotional property; only the name is required.
#[derive(Debug, Clone)]
pub struct NewPromotionalProperty {
    name: String,
    description: Option<String>,
    website_url: Option<String>,
}

impl NewPromotionalProperty {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            website_url: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_website_url(mut self, website_url: impl Into<String>) -> Self {
        self.website_url = Some(website_url.into());
        self
    }
}

/// Partial update; unset fields are left untouched upstream.
#[derive(Debug, Clone, Default)]
pub struct PromotionalPropertyUpdate {
    name: Option<String>,
    description: Option<String>,
    website_url: Option<String>,
}

impl PromotionalPropertyUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_website_url(mut self, website_url: impl Into<String>) -> Self {
        self.website_url = Some(website_url.into());
        self
    }

    fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.website_url.is_none()
    }
}

#[derive(Clone)]
pub struct PromotionalProperties {
    executor: Arc<RequestExecutor>,
    publisher_id: String,
}

impl PromotionalProperties {
    pub(crate) fn new(executor: Arc<RequestExecutor>, publisher_id: String) -> Self {
        Self {
            executor,
            publisher_id,
        }
    }

    pub async fn list(&self) -> Result<Value, ApiError> {
        self.execute(list_query(&self.publisher_id)).await
    }

    pub async fn create(&self, property: &NewPromotionalProperty) -> Result<Value, ApiError> {
        self.execute(create_mutation(&self.publisher_id, property))
            .await
    }

    pub async fn update(
        &self,
        pid: &str,
        update: &PromotionalPropertyUpdate,
    ) -> Result<Value, ApiError> {
        if update.is_empty() {
            return Err(ApiError::invalid_request(
                "promotional property update requires at least one field",
            ));
        }
        self.execute(update_mutation(pid, update)).await
    }

    pub async fn delete(&self, pid: &str) -> Result<Value, ApiError> {
        self.execute(delete_mutation(pid)).await
    }

    async fn execute(&self, document: String) -> Result<Value, ApiError> {
        self.executor
            .post_with(
                ENDPOINT,
                &RequestBody::Json(json!({ "query": document })),
                CacheMode::Bypass,
            )
            .await
    }
}

fn list_query(publisher_id: &str) -> String {
    format!(
        "{{\n  promotionalProperties(publisherId: {publisher}) {{\n    totalCount\n    resultList \
         {{\n      pid\n      name\n      description\n      websiteUrl\n      status\n      \
         createdDate\n    }}\n  }}\n}}",
        publisher = gql_string(publisher_id)
    )
}

fn create_mutation(publisher_id: &str, property: &NewPromotionalProperty) -> String {
    format!(
        "mutation {{\n  createPromotionalProperty(\n    publisherId: {publisher},\n    name: \
         {name},\n    description: {description},\n    websiteUrl: {website_url}\n  ) {{\n    \
         pid\n    name\n    status\n  }}\n}}",
        publisher = gql_string(publisher_id),
        name = gql_string(&property.name),
        description = gql_string(property.description.as_deref().unwrap_or("")),
        website_url = gql_string(property.website_url.as_deref().unwrap_or(""))
    )
}

fn update_mutation(pid: &str, update: &PromotionalPropertyUpdate) -> String {
    let mut fields = Vec::new();
    if let Some(name) = &update.name {
        fields.push(format!("name: {}", gql_string(name)));
    }
    if let Some(description) = &update.description {
        fields.push(format!("description: {}", gql_string(description)));
    }
    if let Some(website_url) = &update.website_url {
        fields.push(format!("websiteUrl: {}", gql_string(website_url)));
    }

    format!(
        "mutation {{\n  updatePromotionalProperty(\n    pid: {pid},\n    {fields}\n  ) {{\n    \
         pid\n    name\n    status\n  }}\n}}",
        pid = gql_string(pid),
        fields = fields.join(",\n    ")
    )
}

fn delete_mutation(pid: &str) -> String {
    format!(
        "mutation {{\n  deletePromotionalProperty(pid: {pid}) {{\n    success\n    message\n  }}\n}}",
        pid = gql_string(pid)
    )
}
