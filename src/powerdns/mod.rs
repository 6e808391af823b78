pub mod client;
pub mod types;

use async_trait::async_trait;

use crate::state::ZoneMetadata;
use types::{PdnsRrsetChange, PdnsZone, PdnsZoneCreate, PdnsZoneSummary, PdnsZoneUpdate};

/// Operations the planner and the apply step need from a PowerDNS control plane.
///
/// [`client::PowerDnsClient`] talks to the HTTP API; tests provide in-memory fakes.
#[async_trait]
pub trait ControlPlane: Send + Sync {
    async fn list_zones(&self, server_id: &str) -> anyhow::Result<Vec<PdnsZoneSummary>>;

    async fn get_zone(&self, server_id: &str, zone: &str) -> anyhow::Result<PdnsZone>;

    async fn get_metadata(&self, server_id: &str, zone: &str) -> anyhow::Result<ZoneMetadata>;

    async fn create_zone(&self, server_id: &str, z: &PdnsZoneCreate) -> anyhow::Result<()>;

    async fn change_zone(
        &self,
        server_id: &str,
        zone: &str,
        changes: &PdnsZoneUpdate,
    ) -> anyhow::Result<()>;

    async fn patch_rrsets(
        &self,
        server_id: &str,
        zone: &str,
        rrsets: &[PdnsRrsetChange],
    ) -> anyhow::Result<()>;

    async fn put_metadata(
        &self,
        server_id: &str,
        zone: &str,
        kind: &str,
        values: &[String],
    ) -> anyhow::Result<()>;

    async fn delete_metadata(&self, server_id: &str, zone: &str, kind: &str)
    -> anyhow::Result<()>;
}
