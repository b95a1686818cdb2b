//! Program Terms GraphQL endpoint.
//!
//! Detailed commission rates per program situation and item list. Both
//! queries return the normalized GraphQL tree untouched.

use std::sync::Arc;

use serde_json::{json, Value};

use super::gql_string;
use crate::error::ApiError;
use crate::executor::{RequestBody, RequestExecutor};

const ENDPOINT: &str = "https://accounts.api.cj.com/graphql";

#[derive(Clone)]
pub struct ProgramTerms {
    executor: Arc<RequestExecutor>,
    publisher_id: String,
}

impl ProgramTerms {
    pub(crate) fn new(executor: Arc<RequestExecutor>, publisher_id: String) -> Self {
        Self {
            executor,
            publisher_id,
        }
    }

    /// Commission terms agreed with one advertiser.
    pub async fn program_terms(&self, advertiser_id: &str) -> Result<Value, ApiError> {
        self.execute(program_terms_query(&self.publisher_id, advertiser_id))
            .await
    }

    /// Every program the publisher participates in.
    pub async fn list_programs(&self) -> Result<Value, ApiError> {
        self.execute(list_programs_query(&self.publisher_id)).await
    }

    async fn execute(&self, document: String) -> Result<Value, ApiError> {
        self.executor
            .post(ENDPOINT, &RequestBody::Json(json!({ "query": document })))
            .await
    }
}

fn program_terms_query(publisher_id: &str, advertiser_id: &str) -> String {
    format!(
        "{{\n  programTerms(\n    publisherId: {publisher},\n    advertiserId: {advertiser}\n  ) \
         {{\n    advertiserId\n    advertiserName\n    publisherId\n    situations {{\n      \
         situationId\n      situationName\n      commissionRate\n      commissionType\n    }}\n    \
         itemLists {{\n      itemListId\n      itemListName\n      commissionRate\n    }}\n  }}\n}}",
        publisher = gql_string(publisher_id),
        advertiser = gql_string(advertiser_id)
    )
}

fn list_programs_query(publisher_id: &str) -> String {
    format!(
        "{{\n  publisherPrograms(publisherId: {publisher}) {{\n    totalCount\n    programs \
         {{\n      advertiserId\n      advertiserName\n      programStatus\n      \
         relationshipStatus\n    }}\n  }}\n}}",
        publisher = gql_string(publisher_id)
    )
}
