use cjkit_core::{CjClient, ProductQuery};
use serde_json::Value;

use crate::cli::ProductsArgs;
use crate::error::CliError;

pub async fn run(args: &ProductsArgs, client: &CjClient) -> Result<Value, CliError> {
    let mut query = ProductQuery::new();
    for keyword in &args.keywords {
        query = query.with_keyword(keyword);
    }
    for advertiser in &args.advertiser {
        query = query.with_advertiser_id(advertiser);
    }
    if let Some(limit) = args.limit {
        query = query.with_limit(limit);
    }
    if let Some(offset) = args.offset {
        query = query.with_offset(offset);
    }

    let page = client.products().search(query).await?;
    Ok(serde_json::to_value(page)?)
}
