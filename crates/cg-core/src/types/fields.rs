//! Canonical field names produced by the cleaning pipeline.

pub const ID: &str = "id";
pub const SYMBOL: &str = "symbol";
pub const NAME: &str = "name";
pub const PRICE_USD: &str = "price_usd";
pub const MARKET_CAP: &str = "market_cap";
pub const MARKET_CAP_RANK: &str = "market_cap_rank";
pub const TOTAL_VOLUME: &str = "total_volume";
pub const PRICE_CHANGE_24H: &str = "price_change_24h";
pub const CHANGE_24H_PERCENT: &str = "change_24h_percent";
pub const CIRCULATING_SUPPLY: &str = "circulating_supply";
pub const LAST_UPDATED: &str = "last_updated";
pub const SCRAPED_AT: &str = "scraped_at";

// Source-side names that get renamed.
pub const SRC_CURRENT_PRICE: &str = "current_price";
pub const SRC_CHANGE_PCT_24H: &str = "price_change_percentage_24h";

/// Output column order used when no record defines one.
pub const CANONICAL_COLUMNS: [&str; 12] = [
    ID,
    SYMBOL,
    NAME,
    PRICE_USD,
    MARKET_CAP,
    MARKET_CAP_RANK,
    TOTAL_VOLUME,
    PRICE_CHANGE_24H,
    CHANGE_24H_PERCENT,
    CIRCULATING_SUPPLY,
    LAST_UPDATED,
    SCRAPED_AT,
];

/// Fields requested from the markets endpoint, in output order.
pub const SOURCE_FIELDS: [&str; 11] = [
    ID,
    SYMBOL,
    NAME,
    SRC_CURRENT_PRICE,
    MARKET_CAP,
    MARKET_CAP_RANK,
    TOTAL_VOLUME,
    PRICE_CHANGE_24H,
    SRC_CHANGE_PCT_24H,
    CIRCULATING_SUPPLY,
    LAST_UPDATED,
];
