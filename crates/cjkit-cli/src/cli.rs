//! CLI argument definitions for cjkit.
//!
//! This module contains the command-line interface structure using Clap.
//! The CLI wraps the CJ Affiliate publisher APIs: the advertiser
//! directory, link search, the product feed and commission reports.
//!
//! Credentials are read from the environment: `CJ_ACCESS_TOKEN`,
//! `CJ_PUBLISHER_ID` and `CJ_WEBSITE_ID` must all be set.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `advertisers` | Search the advertiser directory |
//! | `links` | Search affiliate links for joined programs |
//! | `products` | Search advertiser product catalogs |
//! | `commissions` | Fetch or summarize commission records |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--debug` | `false` | Trace requests and cache activity on stderr |
//! | `--timeout-secs` | `30` | Request timeout in seconds |
//! | `--cache` | `false` | Cache responses on disk |
//! | `--cache-ttl-secs` | `3600` | Cache entry lifetime in seconds |
//!
//! # Examples
//!
//! ```bash
//! # Programs the publisher has joined
//! cjkit advertisers --joined
//!
//! # Text links for one advertiser
//! cjkit links --advertiser 1234 --link-type "Text Link" --pretty
//!
//! # Product search with cached responses
//! cjkit products "running shoes" --limit 10 --cache
//!
//! # Month-to-date commission summary
//! cjkit commissions --summary
//! ```

use clap::{Args, Parser, Subcommand};

/// CJ Affiliate publisher API client
///
/// Search advertisers, links and products, and pull commission reports,
/// with unified JSON output and optional on-disk response caching.
#[derive(Debug, Parser)]
#[command(
    name = "cjkit",
    author,
    version,
    about = "CJ Affiliate publisher API client",
    long_about = "cjkit wraps the CJ Affiliate (Commission Junction) publisher APIs:\n\
\n\
  • Advertiser directory lookup\n\
  • Affiliate link search\n\
  • Product feed search (GraphQL)\n\
  • Commission detail and summaries\n\
\n\
Set CJ_ACCESS_TOKEN, CJ_PUBLISHER_ID and CJ_WEBSITE_ID before use.\n\
Use 'cjkit <command> --help' for command-specific help."
)]
pub struct Cli {
    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Trace requests and cache activity on stderr.
    #[arg(long, global = true, default_value_t = false)]
    pub debug: bool,

    /// Request timeout in seconds.
    #[arg(long, global = true, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Cache responses on disk and serve repeats from the cache.
    #[arg(long, global = true, default_value_t = false)]
    pub cache: bool,

    /// Cache entry lifetime in seconds.
    #[arg(long, global = true, default_value_t = 3600)]
    pub cache_ttl_secs: u64,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// 🏪 Search the advertiser directory.
    ///
    /// With no filter the whole directory page is returned. The
    /// relationship filters and `--ids` are mutually exclusive.
    ///
    /// # Examples
    ///
    ///   cjkit advertisers --joined
    ///   cjkit advertisers --name "Acme Outdoors"
    ///   cjkit advertisers --ids 1234,5678 --pretty
    Advertisers(AdvertisersArgs),

    /// 🔗 Search affiliate links for joined programs.
    ///
    /// # Examples
    ///
    ///   cjkit links --advertiser 1234
    ///   cjkit links --keywords "spring sale" --link-type Banner
    Links(LinksArgs),

    /// 🛒 Search advertiser product catalogs.
    ///
    /// Every product carries a tracking link minted for the configured
    /// website ID.
    ///
    /// # Examples
    ///
    ///   cjkit products "running shoes"
    ///   cjkit products laptop --advertiser 1234 --limit 5
    Products(ProductsArgs),

    /// 💰 Fetch or summarize commission records.
    ///
    /// Dates are `YYYY-MM-DD`. Without an explicit range, records cover
    /// the last 30 days and summaries cover the month to date.
    ///
    /// # Examples
    ///
    ///   cjkit commissions
    ///   cjkit commissions --start-date 2026-08-01 --end-date 2026-08-25
    ///   cjkit commissions --summary
    Commissions(CommissionsArgs),
}

/// Arguments for the `advertisers` command.
#[derive(Debug, Args)]
pub struct AdvertisersArgs {
    /// Only advertisers the publisher has joined.
    #[arg(long, conflicts_with_all = ["not_joined", "ids"])]
    pub joined: bool,

    /// Only advertisers the publisher has not joined.
    #[arg(long, conflicts_with = "ids")]
    pub not_joined: bool,

    /// Comma-separated advertiser IDs.
    #[arg(long)]
    pub ids: Option<String>,

    /// Exact advertiser name to match.
    #[arg(long)]
    pub name: Option<String>,

    /// Keywords to search the directory with.
    #[arg(long)]
    pub keywords: Option<String>,

    /// Page number to fetch.
    #[arg(long)]
    pub page: Option<u32>,

    /// Records per page.
    #[arg(long)]
    pub per_page: Option<u32>,
}

/// Arguments for the `links` command.
#[derive(Debug, Args)]
pub struct LinksArgs {
    /// Comma-separated advertiser IDs, or `joined`.
    #[arg(long)]
    pub advertiser: Option<String>,

    /// Keywords to search link names and descriptions with.
    #[arg(long)]
    pub keywords: Option<String>,

    /// Link type filter (e.g. "Text Link", "Banner").
    #[arg(long)]
    pub link_type: Option<String>,

    /// Promotion type filter (e.g. "coupon").
    #[arg(long)]
    pub promotion_type: Option<String>,

    /// Website ID to search for, overriding the configured one.
    #[arg(long)]
    pub website_id: Option<String>,

    /// Page number to fetch.
    #[arg(long)]
    pub page: Option<u32>,

    /// Records per page.
    #[arg(long)]
    pub per_page: Option<u32>,
}

/// Arguments for the `products` command.
#[derive(Debug, Args)]
pub struct ProductsArgs {
    /// One or more search keywords.
    #[arg(required = true, num_args = 1..)]
    pub keywords: Vec<String>,

    /// Restrict to these advertiser IDs (repeatable).
    #[arg(long)]
    pub advertiser: Vec<String>,

    /// Maximum number of products to return.
    #[arg(long)]
    pub limit: Option<u32>,

    /// Number of products to skip.
    #[arg(long)]
    pub offset: Option<u32>,
}

/// Arguments for the `commissions` command.
#[derive(Debug, Args)]
pub struct CommissionsArgs {
    /// Period start date (YYYY-MM-DD).
    #[arg(long)]
    pub start_date: Option<String>,

    /// Period end date (YYYY-MM-DD).
    #[arg(long)]
    pub end_date: Option<String>,

    /// Aggregate records by status and advertiser instead of listing them.
    #[arg(long, conflicts_with = "advertiser")]
    pub summary: bool,

    /// Fetch records as this advertiser instead of the publisher.
    #[arg(long)]
    pub advertiser: Option<String>,
}
