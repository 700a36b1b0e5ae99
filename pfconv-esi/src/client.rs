use crate::error::{EsiError, Result};
use crate::lookup::UniverseLookup;
use crate::record::{StargateId, StargateRecord, SystemId, SystemRecord};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

pub const DEFAULT_ESI_URL: &str = "https://esi.evetech.net/latest";
pub const DEFAULT_DATASOURCE: &str = "tranquility";

/// ESI client. Every lookup is a single round trip; nothing is cached or
/// retried here.
pub struct EsiClient {
    client: Client,
    base_url: String,
    datasource: String,
}

impl EsiClient {
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_ESI_URL)
    }

    pub fn with_base_url(base_url: &str) -> Result<Self> {
        let parsed = Url::parse(base_url)
            .map_err(|e| EsiError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if parsed.cannot_be_a_base() {
            return Err(EsiError::InvalidUrl(format!(
                "{}: cannot be used as a base URL",
                base_url
            )));
        }

        let client = Client::builder()
            .user_agent("pfconv/0.1 (https://github.com/trapdoorsec/pfconv)")
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            datasource: DEFAULT_DATASOURCE.to_string(),
        })
    }

    pub fn with_datasource(mut self, datasource: &str) -> Self {
        self.datasource = datasource.to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /universe/systems/{id}/`
    pub async fn fetch_system(&self, id: SystemId) -> Result<Option<SystemRecord>> {
        let url = self.endpoint(&format!("universe/systems/{}/", id))?;
        let id = id.to_string();
        self.get_json(url, &[("datasource", self.datasource.as_str()), ("search", id.as_str())])
            .await
    }

    /// `GET /universe/stargates/{id}/`
    pub async fn fetch_stargate(&self, id: StargateId) -> Result<Option<StargateRecord>> {
        let url = self.endpoint(&format!("universe/stargates/{}/", id))?;
        self.get_json(url, &[("datasource", self.datasource.as_str())])
            .await
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        let raw = format!("{}/{}", self.base_url, path);
        Url::parse(&raw).map_err(|e| EsiError::InvalidUrl(format!("{}: {}", raw, e)))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, &str)],
    ) -> Result<Option<T>> {
        debug!("Fetching {}", url);

        let response = self.client.get(url.clone()).query(query).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!("ESI answered {} for {}", status, url);
            return Ok(None);
        }

        let body = response.text().await?;
        serde_json::from_str(&body)
            .map(Some)
            .map_err(|e| EsiError::ParseError(format!("{}: {}", url, e)))
    }
}

impl UniverseLookup for EsiClient {
    async fn system(&self, id: SystemId) -> Result<Option<SystemRecord>> {
        self.fetch_system(id).await
    }

    async fn stargate(&self, id: StargateId) -> Result<Option<StargateRecord>> {
        self.fetch_stargate(id).await
    }
}
