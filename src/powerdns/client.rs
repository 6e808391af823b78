use crate::config::ClientConfig;
use crate::powerdns::ControlPlane;
use crate::powerdns::types::*;
use crate::state::ZoneMetadata;
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Serialize;
use tracing::debug;

#[derive(Clone)]
pub struct PowerDnsClient {
    http: Client,
    base_url: String, // e.g. "http://127.0.0.1:8081/api/v1"
    api_key: String,
}

impl PowerDnsClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.base_url(), &config.api_key)
    }

    fn auth_header(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        req.header("X-API-Key", &self.api_key)
    }

    fn url(&self, server_id: &str, path: &str) -> String {
        format!(
            "{}/servers/{}/{}",
            self.base_url,
            server_id,
            path.trim_start_matches('/')
        )
    }

    async fn check(op: &str, res: Response) -> anyhow::Result<Response> {
        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            anyhow::bail!("PowerDNS {op} failed with {status}: {}", body.trim());
        }
        Ok(res)
    }
}

#[async_trait]
impl ControlPlane for PowerDnsClient {
    async fn list_zones(&self, server_id: &str) -> anyhow::Result<Vec<PdnsZoneSummary>> {
        let url = self.url(server_id, "zones");
        debug!(%url, "listing zones");
        let res = self.auth_header(self.http.get(url)).send().await?;
        let res = Self::check("list_zones", res).await?;
        Ok(res.json::<Vec<PdnsZoneSummary>>().await?)
    }

    async fn get_zone(&self, server_id: &str, name: &str) -> anyhow::Result<PdnsZone> {
        let url = self.url(server_id, &format!("zones/{}", name));
        debug!(%url, "fetching zone");
        let res = self.auth_header(self.http.get(url)).send().await?;
        let res = Self::check("get_zone", res).await?;
        Ok(res.json::<PdnsZone>().await?)
    }

    async fn get_metadata(&self, server_id: &str, name: &str) -> anyhow::Result<ZoneMetadata> {
        let url = self.url(server_id, &format!("zones/{}/metadata", name));
        debug!(%url, "fetching zone metadata");
        let res = self.auth_header(self.http.get(url)).send().await?;
        let res = Self::check("get_metadata", res).await?;
        let entries = res.json::<Vec<PdnsMetadata>>().await?;
        Ok(entries.into_iter().map(|m| (m.kind, m.metadata)).collect())
    }

    async fn create_zone(&self, server_id: &str, z: &PdnsZoneCreate) -> anyhow::Result<()> {
        let url = self.url(server_id, "zones");
        debug!(%url, zone = %z.name, "creating zone");
        let res = self.auth_header(self.http.post(url)).json(z).send().await?;
        Self::check("create_zone", res).await?;
        Ok(())
    }

    async fn change_zone(
        &self,
        server_id: &str,
        name: &str,
        changes: &PdnsZoneUpdate,
    ) -> anyhow::Result<()> {
        let url = self.url(server_id, &format!("zones/{}", name));
        debug!(%url, "changing zone attributes");
        let res = self
            .auth_header(self.http.put(url))
            .json(changes)
            .send()
            .await?;
        Self::check("change_zone", res).await?;
        Ok(())
    }

    async fn patch_rrsets(
        &self,
        server_id: &str,
        zone_name: &str,
        rrsets: &[PdnsRrsetChange],
    ) -> anyhow::Result<()> {
        #[derive(Serialize)]
        struct PatchBody<'a> {
            rrsets: &'a [PdnsRrsetChange],
        }

        let url = self.url(server_id, &format!("zones/{}", zone_name));
        debug!(%url, count = rrsets.len(), "patching rrsets");
        let body = PatchBody { rrsets };
        let res = self
            .auth_header(self.http.patch(url))
            .json(&body)
            .send()
            .await?;
        Self::check("patch_rrsets", res).await?;
        Ok(())
    }

    async fn put_metadata(
        &self,
        server_id: &str,
        zone_name: &str,
        kind: &str,
        values: &[String],
    ) -> anyhow::Result<()> {
        let url = self.url(server_id, &format!("zones/{}/metadata/{}", zone_name, kind));
        debug!(%url, "setting zone metadata");
        let body = PdnsMetadata {
            kind: kind.to_string(),
            metadata: values.to_vec(),
        };
        let res = self.auth_header(self.http.put(url)).json(&body).send().await?;
        Self::check("put_metadata", res).await?;
        Ok(())
    }

    async fn delete_metadata(
        &self,
        server_id: &str,
        zone_name: &str,
        kind: &str,
    ) -> anyhow::Result<()> {
        let url = self.url(server_id, &format!("zones/{}/metadata/{}", zone_name, kind));
        debug!(%url, "deleting zone metadata");
        let res = self.auth_header(self.http.delete(url)).send().await?;
        Self::check("delete_metadata", res).await?;
        Ok(())
    }
}
