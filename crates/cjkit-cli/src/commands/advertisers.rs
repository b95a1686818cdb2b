use cjkit_core::{AdvertiserQuery, CjClient};
use serde_json::Value;

use crate::cli::AdvertisersArgs;
use crate::error::CliError;

pub async fn run(args: &AdvertisersArgs, client: &CjClient) -> Result<Value, CliError> {
    let mut query = AdvertiserQuery::new();
    if args.joined {
        query = query.with_advertiser_ids("joined");
    }
    if args.not_joined {
        query = query.with_advertiser_ids("notjoined");
    }
    if let Some(ids) = &args.ids {
        query = query.with_advertiser_ids(ids);
    }
    if let Some(name) = &args.name {
        query = query.with_advertiser_name(name);
    }
    if let Some(keywords) = &args.keywords {
        query = query.with_keywords(keywords);
    }
    if let Some(page) = args.page {
        query = query.with_page_number(page);
    }
    if let Some(per_page) = args.per_page {
        query = query.with_records_per_page(per_page);
    }

    let page = client.advertisers().search(query).await?;
    Ok(serde_json::to_value(page)?)
}
