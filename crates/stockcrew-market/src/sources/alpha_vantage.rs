//! Alpha Vantage REST API

use super::mcp::parse_extra;
use super::{check_alpha_vantage_payload, non_empty};
use crate::{
    CompanyOverview, DataSource, FinancialStatements, MarketDataSource, MarketError, Result,
    SourceData, alpha_vantage_symbol,
};
use async_trait::async_trait;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::Client;
use serde_json::Value;
use std::num::NonZeroU32;
use std::sync::Arc;
use stockcrew_core::{ProviderConfig, ProviderIdentity};
use stockcrew_utils::Secret;
use tracing::{debug, info};

const BASE_URL: &str = "https://www.alphavantage.co/query";
const FREE_TIER_PER_MINUTE: NonZeroU32 = match NonZeroU32::new(5) {
    Some(n) => n,
    None => unreachable!(),
};

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// Secondary enrichment source: `OVERVIEW` and `EARNINGS`, plus the three
/// statements on premium plans
#[derive(Debug, Clone)]
pub struct AlphaVantageSource {
    client: Client,
    base_url: String,
    api_key: Secret,
    premium: bool,
    rate_limiter: SharedRateLimiter,
}

impl AlphaVantageSource {
    /// Create a client allowing `rate_limit` requests per minute
    pub fn new(api_key: impl Into<Secret>, rate_limit: u32, premium: bool) -> Self {
        let quota = Quota::per_minute(NonZeroU32::new(rate_limit).unwrap_or(FREE_TIER_PER_MINUTE));

        Self {
            client: Client::new(),
            base_url: BASE_URL.to_string(),
            api_key: api_key.into(),
            premium,
            rate_limiter: Arc::new(RateLimiter::direct(quota)),
        }
    }

    /// Build from the `alpha_vantage` provider config (`ALPHA_VANTAGE_*`)
    pub fn from_config(config: &ProviderConfig<DataSource>) -> Result<Self> {
        let api_key = config
            .credential()
            .cloned()
            .ok_or_else(|| MarketError::ProviderUnavailable(config.identity.to_string()))?;
        let rate_limit = parse_extra::<u32>(config, "ALPHA_VANTAGE_RATE_LIMIT", "RATE_LIMIT")?.unwrap_or(5);

        let mut source = Self::new(api_key, rate_limit, config.extra_flag("PREMIUM"));
        source.client = Client::builder().timeout(config.timeout).build()?;
        if let Some(base_url) = &config.base_url {
            source.base_url.clone_from(base_url);
        }
        Ok(source)
    }

    pub fn is_premium(&self) -> bool {
        self.premium
    }

    async fn query(&self, function: &str, symbol: &str) -> Result<Value> {
        self.rate_limiter.until_ready().await;
        debug!(function, symbol, "Alpha Vantage request");

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("function", function),
                ("symbol", symbol),
                ("apikey", self.api_key.expose()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(MarketError::request_failed(
                DataSource::AlphaVantage,
                format!("HTTP {}", response.status()),
            ));
        }

        let payload: Value = response.json().await?;
        check_alpha_vantage_payload(DataSource::AlphaVantage.as_str(), &payload)?;
        Ok(payload)
    }

    /// Company fundamentals, `None` when Alpha Vantage does not know the symbol
    pub async fn company_overview(&self, symbol: &str) -> Result<Option<CompanyOverview>> {
        let payload = self.query("OVERVIEW", alpha_vantage_symbol(symbol)).await?;
        Ok(CompanyOverview::from_payload(&payload))
    }

    async fn report(&self, function: &str, symbol: &str) -> Option<Value> {
        match self.query(function, symbol).await {
            Ok(payload) => non_empty(payload),
            Err(e) => {
                debug!(function, symbol, error = %e, "Alpha Vantage report unavailable");
                None
            }
        }
    }
}

#[async_trait]
impl MarketDataSource for AlphaVantageSource {
    fn source(&self) -> DataSource {
        DataSource::AlphaVantage
    }

    async fn fetch(&self, symbol: &str) -> Result<SourceData> {
        let symbol = alpha_vantage_symbol(symbol);
        info!(symbol, premium = self.premium, "Collecting data via Alpha Vantage");

        // Requests go out one at a time; the rate limiter paces them anyway.
        let overview = self.company_overview(symbol).await?;
        let mut statements = FinancialStatements {
            earnings: self.report("EARNINGS", symbol).await,
            ..FinancialStatements::default()
        };
        if self.premium {
            statements.cash_flow = self.report("CASH_FLOW", symbol).await;
            statements.income_statement = self.report("INCOME_STATEMENT", symbol).await;
            statements.balance_sheet = self.report("BALANCE_SHEET", symbol).await;
        }

        let data = SourceData {
            overview,
            statements: (!statements.is_empty()).then_some(statements),
            ..SourceData::default()
        };
        if data.is_empty() {
            return Err(MarketError::no_data(DataSource::AlphaVantage, symbol));
        }
        Ok(data)
    }
}
