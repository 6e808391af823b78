// Shared fixtures for integration tests

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use zoneplan::powerdns::ControlPlane;
use zoneplan::powerdns::types::*;
use zoneplan::{DesiredZone, RRSet, ZoneMetadata};

/// In-memory control plane that records every write it receives.
#[derive(Default)]
pub struct FakeControlPlane {
    pub zones: BTreeMap<String, Vec<PdnsZone>>,
    pub metadata: BTreeMap<(String, String), ZoneMetadata>,
    /// Name of the write operation that should fail, e.g. "patch_rrsets".
    pub fail_on: Option<&'static str>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeControlPlane {
    pub fn with_server(mut self, server_id: &str) -> Self {
        self.zones.entry(server_id.to_string()).or_default();
        self
    }

    pub fn with_zone(mut self, server_id: &str, zone: PdnsZone) -> Self {
        self.zones
            .entry(server_id.to_string())
            .or_default()
            .push(zone);
        self
    }

    /// Metadata is keyed by zone id, which `live_copy` sets to the zone name.
    pub fn with_metadata(mut self, server_id: &str, zone: &str, kind: &str, values: &[&str]) -> Self {
        self.metadata
            .entry((server_id.to_string(), zone.to_string()))
            .or_default()
            .insert(kind.to_string(), values.iter().map(|v| v.to_string()).collect());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn write(&self, op: &'static str, detail: String) -> anyhow::Result<()> {
        self.calls.lock().unwrap().push(format!("{op} {detail}"));
        if self.fail_on == Some(op) {
            anyhow::bail!("PowerDNS {op} failed with 422 Unprocessable Entity");
        }
        Ok(())
    }
}

#[async_trait]
impl ControlPlane for FakeControlPlane {
    async fn list_zones(&self, server_id: &str) -> anyhow::Result<Vec<PdnsZoneSummary>> {
        let Some(zones) = self.zones.get(server_id) else {
            anyhow::bail!("PowerDNS list_zones failed with 404 Not Found");
        };
        Ok(zones
            .iter()
            .map(|z| PdnsZoneSummary {
                id: z.id.clone(),
                name: z.name.clone(),
                kind: z.kind.clone(),
            })
            .collect())
    }

    async fn get_zone(&self, server_id: &str, zone_id: &str) -> anyhow::Result<PdnsZone> {
        self.zones
            .get(server_id)
            .and_then(|zones| zones.iter().find(|z| z.id == zone_id))
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("PowerDNS get_zone failed with 404 Not Found"))
    }

    async fn get_metadata(&self, server_id: &str, zone_id: &str) -> anyhow::Result<ZoneMetadata> {
        Ok(self
            .metadata
            .get(&(server_id.to_string(), zone_id.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    async fn create_zone(&self, server_id: &str, z: &PdnsZoneCreate) -> anyhow::Result<()> {
        self.write("create_zone", format!("{server_id} {}", z.name))
    }

    async fn change_zone(
        &self,
        server_id: &str,
        zone: &str,
        _changes: &PdnsZoneUpdate,
    ) -> anyhow::Result<()> {
        self.write("change_zone", format!("{server_id} {zone}"))
    }

    async fn patch_rrsets(
        &self,
        server_id: &str,
        zone: &str,
        rrsets: &[PdnsRrsetChange],
    ) -> anyhow::Result<()> {
        self.write("patch_rrsets", format!("{server_id} {zone} {}", rrsets.len()))
    }

    async fn put_metadata(
        &self,
        server_id: &str,
        zone: &str,
        kind: &str,
        _values: &[String],
    ) -> anyhow::Result<()> {
        self.write("put_metadata", format!("{server_id} {zone} {kind}"))
    }

    async fn delete_metadata(&self, server_id: &str, zone: &str, kind: &str) -> anyhow::Result<()> {
        self.write("delete_metadata", format!("{server_id} {zone} {kind}"))
    }
}

/// Live zone whose scalar settings and rrsets match `desired`, plus an apex SOA.
pub fn live_copy(desired: &DesiredZone) -> PdnsZone {
    let mut rrsets: Vec<PdnsRrset> = desired.rrsets.iter().map(RRSet::to_pdns).collect();
    rrsets.push(soa(&desired.name));
    PdnsZone {
        id: desired.name.clone(),
        name: desired.name.clone(),
        zone_type: Some("Zone".into()),
        kind: desired.kind.to_string(),
        dnssec: desired.dnssec,
        nsec3param: desired.nsec3param.clone(),
        nsec3narrow: desired.nsec3narrow,
        api_rectify: desired.api_rectify,
        soa_edit: desired.soa_edit.clone(),
        soa_edit_api: desired.soa_edit_api.clone(),
        rrsets,
    }
}

pub fn soa(zone: &str) -> PdnsRrset {
    live_rrset(
        zone,
        "SOA",
        3600,
        &["ns1.example.net. hostmaster.example.net. 2024010101 10800 3600 604800 3600"],
    )
}

pub fn live_rrset(name: &str, rrtype: &str, ttl: u32, records: &[&str]) -> PdnsRrset {
    PdnsRrset {
        name: name.to_string(),
        rrtype: rrtype.to_string(),
        ttl,
        records: records
            .iter()
            .map(|r| PdnsRecord {
                content: r.to_string(),
                disabled: false,
            })
            .collect(),
        comments: Vec::new(),
    }
}
