use std::fmt;

use serde::Serialize;
use tracing::info;

use crate::error::{Error, Result};
use crate::powerdns::ControlPlane;
use crate::powerdns::types::{PdnsRrsetChange, PdnsZoneCreate, PdnsZoneUpdate};

/// One planned action against a single zone on a single server.
///
/// `zone` is the zone name shown in the plan; `zone_id` is the identifier the
/// server listed for an existing zone and addresses every API call against it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    CreateZone {
        server: String,
        zone: String,
        attributes: PdnsZoneCreate,
    },
    ChangeZoneAttributes {
        server: String,
        zone: String,
        zone_id: String,
        changes: PdnsZoneUpdate,
    },
    ModifyZoneRRSets {
        server: String,
        zone: String,
        zone_id: String,
        rrsets: Vec<PdnsRrsetChange>,
    },
    ChangeMetadata {
        server: String,
        zone: String,
        zone_id: String,
        kind: String,
        values: Vec<String>,
    },
    DeleteMetadata {
        server: String,
        zone: String,
        zone_id: String,
        kind: String,
    },
}

impl Change {
    pub fn server(&self) -> &str {
        match self {
            Change::CreateZone { server, .. }
            | Change::ChangeZoneAttributes { server, .. }
            | Change::ModifyZoneRRSets { server, .. }
            | Change::ChangeMetadata { server, .. }
            | Change::DeleteMetadata { server, .. } => server,
        }
    }

    pub fn zone(&self) -> &str {
        match self {
            Change::CreateZone { zone, .. }
            | Change::ChangeZoneAttributes { zone, .. }
            | Change::ModifyZoneRRSets { zone, .. }
            | Change::ChangeMetadata { zone, .. }
            | Change::DeleteMetadata { zone, .. } => zone,
        }
    }

    /// Short verb used in the rendered plan.
    pub fn action(&self) -> &'static str {
        match self {
            Change::CreateZone { .. } => "create zone",
            Change::ChangeZoneAttributes { .. } => "change zone",
            Change::ModifyZoneRRSets { .. } => "modify zone",
            Change::ChangeMetadata { .. } => "change zone meta",
            Change::DeleteMetadata { .. } => "delete zone meta",
        }
    }

    /// Send this change to the control plane.
    pub async fn apply<C>(&self, client: &C) -> anyhow::Result<()>
    where
        C: ControlPlane + ?Sized,
    {
        match self {
            Change::CreateZone {
                server, attributes, ..
            } => client.create_zone(server, attributes).await,
            Change::ChangeZoneAttributes {
                server,
                zone_id,
                changes,
                ..
            } => client.change_zone(server, zone_id, changes).await,
            Change::ModifyZoneRRSets {
                server,
                zone_id,
                rrsets,
                ..
            } => client.patch_rrsets(server, zone_id, rrsets).await,
            Change::ChangeMetadata {
                server,
                zone_id,
                kind,
                values,
                ..
            } => client.put_metadata(server, zone_id, kind, values).await,
            Change::DeleteMetadata {
                server,
                zone_id,
                kind,
                ..
            } => client.delete_metadata(server, zone_id, kind).await,
        }
    }
}

fn json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| format!("<unprintable: {e}>"))
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}/{}] {}: ", self.server(), self.zone(), self.action())?;
        match self {
            Change::CreateZone { attributes, .. } => f.write_str(&json(attributes)),
            Change::ChangeZoneAttributes { changes, .. } => f.write_str(&json(changes)),
            Change::ModifyZoneRRSets { rrsets, .. } => f.write_str(&json(rrsets)),
            Change::ChangeMetadata { kind, values, .. } => write!(f, "{kind} = {}", json(values)),
            Change::DeleteMetadata { kind, .. } => f.write_str(kind),
        }
    }
}

/// Ordered list of changes. Empty means live state already matches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Changeset {
    changes: Vec<Change>,
}

impl Changeset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Change> {
        self.changes.iter()
    }

    pub fn push(&mut self, change: Change) {
        self.changes.push(change);
    }

    pub fn as_slice(&self) -> &[Change] {
        &self.changes
    }

    /// Apply every change in order. Stops at the first failure; changes
    /// already applied stay applied.
    pub async fn apply<C>(&self, client: &C) -> Result<()>
    where
        C: ControlPlane + ?Sized,
    {
        for change in &self.changes {
            info!(server = change.server(), zone = change.zone(), action = change.action(), "applying");
            change.apply(client).await.map_err(|source| Error::Apply {
                change: format!("{} on {}/{}", change.action(), change.server(), change.zone()),
                source,
            })?;
        }
        Ok(())
    }
}

impl Extend<Change> for Changeset {
    fn extend<T: IntoIterator<Item = Change>>(&mut self, iter: T) {
        self.changes.extend(iter);
    }
}

impl IntoIterator for Changeset {
    type Item = Change;
    type IntoIter = std::vec::IntoIter<Change>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.into_iter()
    }
}

impl<'a> IntoIterator for &'a Changeset {
    type Item = &'a Change;
    type IntoIter = std::slice::Iter<'a, Change>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.iter()
    }
}
