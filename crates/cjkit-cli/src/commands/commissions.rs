use cjkit_core::{CjClient, CommissionQuery};
use serde_json::Value;

use crate::cli::CommissionsArgs;
use crate::error::CliError;

pub async fn run(args: &CommissionsArgs, client: &CjClient) -> Result<Value, CliError> {
    let mut query = CommissionQuery::new();
    if let Some(start_date) = &args.start_date {
        query = query.with_start_date(start_date);
    }
    if let Some(end_date) = &args.end_date {
        query = query.with_end_date(end_date);
    }

    let commissions = client.commissions();
    if args.summary {
        let summary = commissions.summary(query).await?;
        return Ok(serde_json::to_value(summary)?);
    }
    if let Some(advertiser) = &args.advertiser {
        return Ok(commissions.advertiser_commissions(advertiser, query).await?);
    }
    Ok(commissions.publisher_commissions(query).await?)
}
