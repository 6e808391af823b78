//! Comparison of desired state with the live servers.
pub mod change;
pub mod diff;

use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::powerdns::ControlPlane;
use crate::state::DesiredState;

pub use change::{Change, Changeset};

/// Computes the changes that bring every declared zone in line with its
/// declaration. Zones, rrsets and metadata kinds the declaration does not
/// mention are never touched.
pub struct Planner<'a, C: ControlPlane + ?Sized> {
    client: &'a C,
}

impl<'a, C: ControlPlane + ?Sized> Planner<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }

    /// Fetches live state server by server and zone by zone, then diffs it.
    /// Any failed lookup aborts the whole plan.
    pub async fn plan(&self, desired: &DesiredState) -> Result<Changeset> {
        let mut changeset = Changeset::new();

        for (server_id, desired_zones) in &desired.zones {
            let zones = self
                .client
                .list_zones(server_id)
                .await
                .map_err(|e| Error::lookup(server_id, "zone list", e))?;
            debug!(server = %server_id, live = zones.len(), desired = desired_zones.len(), "planning server");

            for desired_zone in desired_zones {
                let Some(summary) = zones.iter().find(|z| z.name == desired_zone.name) else {
                    info!(server = %server_id, zone = %desired_zone.name, "zone is missing and will be created");
                    changeset.push(diff::create_zone(server_id, desired_zone));
                    if !desired_zone.metadata.is_empty() {
                        warn!(
                            server = %server_id,
                            zone = %desired_zone.name,
                            kinds = ?desired_zone.metadata.keys().collect::<Vec<_>>(),
                            "metadata of a newly created zone is not applied; run again after creation"
                        );
                    }
                    continue;
                };

                // ids differ from names for zones like 0/24.2.0.192.in-addr.arpa.
                let zone_id = if summary.id.is_empty() {
                    desired_zone.name.as_str()
                } else {
                    summary.id.as_str()
                };
                let live = self
                    .client
                    .get_zone(server_id, zone_id)
                    .await
                    .map_err(|e| Error::lookup(server_id, format!("zone {}", desired_zone.name), e))?;
                let live_metadata = self
                    .client
                    .get_metadata(server_id, zone_id)
                    .await
                    .map_err(|e| {
                        Error::lookup(server_id, format!("metadata of {}", desired_zone.name), e)
                    })?;

                let changes = diff::diff_zone(server_id, zone_id, desired_zone, &live, &live_metadata);
                debug!(server = %server_id, zone = %desired_zone.name, changes = changes.len(), "zone compared");
                changeset.extend(changes);
            }
        }

        info!(changes = changeset.len(), "plan computed");
        Ok(changeset)
    }
}
