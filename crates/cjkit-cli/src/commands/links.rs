use cjkit_core::{CjClient, LinkQuery};
use serde_json::Value;

use crate::cli::LinksArgs;
use crate::error::CliError;

pub async fn run(args: &LinksArgs, client: &CjClient) -> Result<Value, CliError> {
    let mut query = LinkQuery::new();
    if let Some(advertiser) = &args.advertiser {
        query = query.with_advertiser_ids(advertiser);
    }
    if let Some(keywords) = &args.keywords {
        query = query.with_keywords(keywords);
    }
    if let Some(link_type) = &args.link_type {
        query = query.with_link_type(link_type);
    }
    if let Some(promotion_type) = &args.promotion_type {
        query = query.with_promotion_type(promotion_type);
    }
    if let Some(website_id) = &args.website_id {
        query = query.with_website_id(website_id);
    }
    if let Some(page) = args.page {
        query = query.with_page_number(page);
    }
    if let Some(per_page) = args.per_page {
        query = query.with_records_per_page(per_page);
    }

    let page = client.links().search(query).await?;
    Ok(serde_json::to_value(page)?)
}
