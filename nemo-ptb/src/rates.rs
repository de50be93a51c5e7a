//! HTTP backed [`ExchangeRateSource`].

use std::time::Duration;

use async_trait::async_trait;
use nemo_common::{
    models::error::RateSourceError,
    traits::{DepositRatio, ExchangeRateSource},
    ObjectId,
};
use reqwest::{header, Client, ClientBuilder, StatusCode, Url};
use serde::Deserialize;
use tracing::{debug, instrument, warn};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Vault totals as served by the rate API. Both are base-unit integers encoded as strings.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VaultTotals {
    total_assets: String,
    total_supply: String,
}

impl VaultTotals {
    fn into_ratio(self) -> Result<DepositRatio, RateSourceError> {
        let parse = |name: &str, value: &str| {
            value
                .parse::<u128>()
                .map_err(|e| RateSourceError::Parse(format!("`{name}` is not an integer: {e}")))
        };
        let ratio = DepositRatio::new(
            parse("totalAssets", &self.total_assets)?,
            parse("totalSupply", &self.total_supply)?,
        );
        if ratio.total_assets == 0 {
            return Err(RateSourceError::InvalidRatio("vault holds no assets".to_string()));
        }
        Ok(ratio)
    }
}

/// Reads vault totals from `GET {base}/vaults/{vault}?coinType={coin_type}`.
#[derive(Debug, Clone)]
pub struct HttpRateSource {
    http_client: Client,
    url: Url,
}

impl HttpRateSource {
    pub fn new(base_uri: &str) -> Result<Self, RateSourceError> {
        Self::with_timeout(base_uri, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_uri: &str, timeout: Duration) -> Result<Self, RateSourceError> {
        let url = base_uri
            .parse::<Url>()
            .map_err(|e| RateSourceError::Request(format!("invalid url {base_uri}: {e}")))?;

        let mut headers = header::HeaderMap::new();
        headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));
        let user_agent = format!("nemo-ptb-{version}", version = env!("CARGO_PKG_VERSION"));
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_str(&user_agent)
                .map_err(|e| RateSourceError::Request(format!("invalid user agent: {e}")))?,
        );

        let http_client = ClientBuilder::new()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| RateSourceError::Request(e.to_string()))?;
        Ok(Self { http_client, url })
    }

    fn vault_url(&self, vault: &ObjectId) -> Result<Url, RateSourceError> {
        self.url
            .join(&format!("vaults/{vault}"))
            .map_err(|e| RateSourceError::Request(format!("invalid vault url: {e}")))
    }
}

#[async_trait]
impl ExchangeRateSource for HttpRateSource {
    #[instrument(skip(self), fields(vault = %vault))]
    async fn deposit_ratio(
        &self,
        vault: &ObjectId,
        coin_type: &str,
    ) -> Result<DepositRatio, RateSourceError> {
        let url = self.vault_url(vault)?;
        debug!(%url, "Requesting vault totals");
        let response = self
            .http_client
            .get(url)
            .query(&[("coinType", coin_type)])
            .send()
            .await
            .map_err(|e| RateSourceError::Request(e.to_string()))?;

        match response.status() {
            StatusCode::OK => {}
            status => {
                let body = response.text().await.unwrap_or_default();
                warn!(%status, %body, "Rate request rejected");
                return Err(RateSourceError::Request(format!("unexpected status {status}: {body}")));
            }
        }

        let body = response
            .text()
            .await
            .map_err(|e| RateSourceError::Request(e.to_string()))?;
        serde_json::from_str::<VaultTotals>(&body)
            .map_err(|e| RateSourceError::Parse(e.to_string()))?
            .into_ratio()
    }
}

#[cfg(test)]
mod tests {
    use mockito::{Matcher, Server};
    use pretty_assertions::assert_eq;

    use super::*;

    fn vault() -> ObjectId {
        ObjectId::from_low_u64(0xa17)
    }

    #[test_log::test(tokio::test)]
    async fn test_deposit_ratio() {
        let mut server = Server::new_async().await;
        let mocked = server
            .mock("GET", format!("/vaults/{}", vault()).as_str())
            .match_query(Matcher::UrlEncoded("coinType".into(), "0x2::sui::SUI".into()))
            .expect(1)
            .with_body(r#"{"totalAssets":"1100","totalSupply":"1000"}"#)
            .create_async()
            .await;
        let source = HttpRateSource::new(&format!("{}/", server.url())).expect("create source");

        let ratio = source
            .deposit_ratio(&vault(), "0x2::sui::SUI")
            .await
            .expect("ratio");

        mocked.assert();
        assert_eq!(ratio, DepositRatio::new(1100, 1000));
        assert_eq!(ratio.shares_for(1100), Some(1000));
    }

    #[test_log::test(tokio::test)]
    async fn test_error_status_is_reported() {
        let mut server = Server::new_async().await;
        let _mocked = server
            .mock("GET", Matcher::Any)
            .with_status(503)
            .with_body("maintenance")
            .create_async()
            .await;
        let source = HttpRateSource::new(&format!("{}/", server.url())).expect("create source");

        let err = source
            .deposit_ratio(&vault(), "0x2::sui::SUI")
            .await
            .unwrap_err();

        assert!(matches!(err, RateSourceError::Request(ref msg) if msg.contains("503")), "{err}");
    }

    #[tokio::test]
    async fn test_malformed_body_is_a_parse_error() {
        let mut server = Server::new_async().await;
        let _mocked = server
            .mock("GET", Matcher::Any)
            .with_body(r#"{"totalAssets":"lots","totalSupply":"1"}"#)
            .create_async()
            .await;
        let source = HttpRateSource::new(&format!("{}/", server.url())).expect("create source");

        let err = source
            .deposit_ratio(&vault(), "0x2::sui::SUI")
            .await
            .unwrap_err();

        assert!(matches!(err, RateSourceError::Parse(_)), "{err}");
    }

    #[tokio::test]
    async fn test_empty_vault_is_rejected() {
        let mut server = Server::new_async().await;
        let _mocked = server
            .mock("GET", Matcher::Any)
            .with_body(r#"{"totalAssets":"0","totalSupply":"0"}"#)
            .create_async()
            .await;
        let source = HttpRateSource::new(&format!("{}/", server.url())).expect("create source");

        let err = source
            .deposit_ratio(&vault(), "0x2::sui::SUI")
            .await
            .unwrap_err();

        assert!(matches!(err, RateSourceError::InvalidRatio(_)));
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(HttpRateSource::new("not a url"), Err(RateSourceError::Request(_))));
    }
}
