//! Alpha Vantage over the Model Context Protocol (JSON-RPC 2.0 over HTTP)

use super::non_empty;
use crate::record::parse_daily_series;
use crate::{
    CompanyOverview, DataSource, FinancialStatements, MarketDataSource, MarketError, Result,
    RetryPolicy, SourceData, alpha_vantage_symbol,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use stockcrew_core::ProviderConfig;
use stockcrew_utils::{ConfigError, Secret};
use tracing::{debug, info, warn};

const USER_AGENT: &str = concat!("stockcrew/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    id: String,
    method: &'a str,
    params: Value,
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse {
    result: Option<Value>,
    error: Option<JsonRpcError>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcError {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: String,
}

/// Enhanced-protocol source: company overview, statements and daily prices
/// from the Alpha Vantage MCP endpoint
#[derive(Debug, Clone)]
pub struct McpSource {
    client: Client,
    endpoint: String,
    api_key: Secret,
    retry: RetryPolicy,
}

impl McpSource {
    pub fn new(base_url: &str, api_key: impl Into<Secret>, retry: RetryPolicy) -> Result<Self> {
        Self::with_client(Client::builder().user_agent(USER_AGENT).build()?, base_url, api_key, retry)
    }

    fn with_client(
        client: Client,
        base_url: &str,
        api_key: impl Into<Secret>,
        retry: RetryPolicy,
    ) -> Result<Self> {
        Ok(Self {
            client,
            endpoint: format!("{}/v1/mcp", base_url.trim_end_matches('/')),
            api_key: api_key.into(),
            retry,
        })
    }

    /// Build from the `mcp` provider config (`ALPHA_VANTAGE_MCP_*`)
    pub fn from_config(config: &ProviderConfig<DataSource>) -> Result<Self> {
        let api_key = config
            .credential()
            .cloned()
            .ok_or_else(|| MarketError::ProviderUnavailable(config.identity.to_string()))?;
        let retries = parse_extra::<u32>(config, "ALPHA_VANTAGE_MCP_RETRIES", "RETRIES")?.unwrap_or(3);
        let base_url = config
            .base_url
            .as_deref()
            .unwrap_or("https://mcp.alphavantage.co");

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .build()?;
        Self::with_client(client, base_url, api_key, RetryPolicy::with_attempts(retries))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn request_body<'a>(&self, method: &'a str, symbol: &str, mut params: Map<String, Value>) -> JsonRpcRequest<'a> {
        params.insert("apikey".to_string(), json!(self.api_key.expose()));
        params.insert("symbol".to_string(), json!(symbol));
        JsonRpcRequest {
            jsonrpc: "2.0",
            id: format!("alphavantage_{method}_{symbol}"),
            method,
            params: Value::Object(params),
        }
    }

    async fn call(&self, method: &str, symbol: &str, params: Map<String, Value>) -> Result<Value> {
        let body = self.request_body(method, symbol, params);
        self.retry
            .execute(method, || {
                let request = self
                    .client
                    .post(&self.endpoint)
                    .bearer_auth(self.api_key.expose())
                    .json(&body);
                async move {
                    let response = request
                        .send()
                        .await
                        .map_err(|e| MarketError::request_failed(DataSource::Mcp, e))?;

                    let status = response.status();
                    if !status.is_success() {
                        return Err(MarketError::request_failed(DataSource::Mcp, format!("HTTP {status}")));
                    }
                    let rpc: JsonRpcResponse = response
                        .json()
                        .await
                        .map_err(|e| MarketError::request_failed(DataSource::Mcp, e))?;
                    unwrap_rpc(rpc)
                }
            })
            .await
    }

    async fn overview(&self, symbol: &str) -> Option<CompanyOverview> {
        let payload = self
            .call("company_overview", symbol, Map::new())
            .await
            .inspect_err(|e| warn!(symbol, error = %e, "MCP company overview failed"))
            .ok()?;
        CompanyOverview::from_payload(&payload)
    }

    async fn statements(&self, symbol: &str) -> Option<FinancialStatements> {
        let (income, balance, cash_flow, earnings) = tokio::join!(
            self.call("income_statement", symbol, Map::new()),
            self.call("balance_sheet", symbol, Map::new()),
            self.call("cash_flow", symbol, Map::new()),
            self.call("earnings", symbol, Map::new()),
        );
        let keep = |name: &str, result: Result<Value>| match result {
            Ok(payload) => non_empty(payload),
            Err(e) => {
                debug!(symbol, report = name, error = %e, "MCP statement unavailable");
                None
            }
        };
        let statements = FinancialStatements {
            income_statement: keep("income_statement", income),
            balance_sheet: keep("balance_sheet", balance),
            cash_flow: keep("cash_flow", cash_flow),
            earnings: keep("earnings", earnings),
        };
        (!statements.is_empty()).then_some(statements)
    }

    async fn daily_series(&self, symbol: &str) -> Option<Vec<crate::PriceBar>> {
        let mut params = Map::new();
        params.insert("function".to_string(), json!("TIME_SERIES_DAILY"));
        params.insert("outputsize".to_string(), json!("compact"));
        let payload = self
            .call("time_series", symbol, params)
            .await
            .inspect_err(|e| warn!(symbol, error = %e, "MCP time series failed"))
            .ok()?;
        let bars = parse_daily_series(&payload);
        (!bars.is_empty()).then_some(bars)
    }
}

fn unwrap_rpc(rpc: JsonRpcResponse) -> Result<Value> {
    if let Some(error) = rpc.error {
        return Err(MarketError::Mcp {
            code: error.code,
            message: error.message,
        });
    }
    Ok(rpc.result.unwrap_or(Value::Null))
}

pub(crate) fn parse_extra<T: std::str::FromStr>(
    config: &ProviderConfig<DataSource>,
    key: &str,
    suffix: &str,
) -> Result<Option<T>>
where
    T::Err: std::fmt::Display,
{
    config
        .extra(suffix)
        .map(|raw| {
            raw.trim().parse::<T>().map_err(|e| {
                MarketError::Config(ConfigError::InvalidValue {
                    key: key.to_string(),
                    value: raw.to_string(),
                    reason: e.to_string(),
                })
            })
        })
        .transpose()
}

#[async_trait]
impl MarketDataSource for McpSource {
    fn source(&self) -> DataSource {
        DataSource::Mcp
    }

    async fn fetch(&self, symbol: &str) -> Result<SourceData> {
        let symbol = alpha_vantage_symbol(symbol);
        info!(symbol, "Collecting data via Alpha Vantage MCP");

        let (overview, statements, quotes) = tokio::join!(
            self.overview(symbol),
            self.statements(symbol),
            self.daily_series(symbol),
        );
        let data = SourceData {
            overview,
            statements,
            quotes,
            dividends: None,
        };
        if data.is_empty() {
            return Err(MarketError::no_data(DataSource::Mcp, symbol));
        }
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockcrew_utils::MapSource;

    fn source() -> McpSource {
        McpSource::new("https://mcp.example.com/", "av-key", RetryPolicy::no_retry()).unwrap()
    }

    #[test]
    fn test_endpoint() {
        assert_eq!(source().endpoint(), "https://mcp.example.com/v1/mcp");
    }

    #[test]
    fn test_request_body() {
        let body = source().request_body("company_overview", "PETR4", Map::new());
        let value = serde_json::to_value(&body).unwrap();

        assert_eq!(value["jsonrpc"], "2.0");
        assert_eq!(value["method"], "company_overview");
        assert_eq!(value["id"], "alphavantage_company_overview_PETR4");
        assert_eq!(value["params"]["symbol"], "PETR4");
        assert_eq!(value["params"]["apikey"], "av-key");
    }

    #[test]
    fn test_rpc_error_is_surfaced() {
        let rpc: JsonRpcResponse =
            serde_json::from_str(r#"{"jsonrpc":"2.0","id":"1","error":{"code":-32601,"message":"Method not found"}}"#)
                .unwrap();
        let err = unwrap_rpc(rpc).unwrap_err();
        assert!(matches!(err, MarketError::Mcp { code: -32601, .. }));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_rpc_result() {
        let rpc: JsonRpcResponse =
            serde_json::from_str(r#"{"jsonrpc":"2.0","id":"1","result":{"Symbol":"VALE3"}}"#).unwrap();
        assert_eq!(unwrap_rpc(rpc).unwrap()["Symbol"], "VALE3");
    }

    #[test]
    fn test_from_config_rejects_bad_retries() {
        let env: MapSource = [
            ("ALPHA_VANTAGE_API_KEY", "k"),
            ("ALPHA_VANTAGE_MCP_RETRIES", "many"),
        ]
        .into_iter()
        .collect();
        let config = ProviderConfig::from_source(DataSource::Mcp, &env).unwrap().unwrap();
        assert!(matches!(McpSource::from_config(&config), Err(MarketError::Config(_))));
    }
}
