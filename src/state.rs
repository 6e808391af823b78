//! Desired-state model produced by the zone builder.
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::powerdns::types::{PdnsRecord, PdnsRrset};

/// Server identifier used until a declaration selects another one.
pub const DEFAULT_SERVER_ID: &str = "localhost";

/// Metadata kind -> values. Values keep their declared order.
pub type ZoneMetadata = BTreeMap<String, Vec<String>>;

/// A single member of an RRSet.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Record {
    pub content: String,
    pub disabled: bool,
}

impl Record {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            disabled: false,
        }
    }
}

impl From<&PdnsRecord> for Record {
    fn from(r: &PdnsRecord) -> Self {
        Self {
            content: r.content.clone(),
            disabled: r.disabled,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RRSet {
    pub name: String,
    pub rrtype: String,
    pub ttl: u32,
    pub records: Vec<Record>,
}

impl RRSet {
    /// Records as a set; order and duplicates are insignificant.
    pub fn record_set(&self) -> BTreeSet<&Record> {
        self.records.iter().collect()
    }

    /// Plain attribute form sent to the control plane.
    pub fn to_pdns(&self) -> PdnsRrset {
        PdnsRrset {
            name: self.name.clone(),
            rrtype: self.rrtype.clone(),
            ttl: self.ttl,
            records: self
                .records
                .iter()
                .map(|r| PdnsRecord {
                    content: r.content.clone(),
                    disabled: r.disabled,
                })
                .collect(),
            comments: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZoneKind {
    #[default]
    Native,
    Master,
    Slave,
}

impl ZoneKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ZoneKind::Native => "Native",
            ZoneKind::Master => "Master",
            ZoneKind::Slave => "Slave",
        }
    }
}

impl fmt::Display for ZoneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A zone as declared in the Zonefile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesiredZone {
    pub name: String,
    pub kind: ZoneKind,
    pub rrsets: Vec<RRSet>,
    pub dnssec: bool,
    pub nsec3param: String,
    pub nsec3narrow: bool,
    pub api_rectify: bool,
    pub soa_edit: String,
    pub soa_edit_api: String,
    pub metadata: ZoneMetadata,
}

impl DesiredZone {
    /// Zone with every setting at its default. The name is not validated here,
    /// use [`crate::builder::Builder`] to construct zones from declarations.
    pub fn new(name: impl Into<String>, kind: ZoneKind) -> Self {
        Self {
            name: name.into(),
            kind,
            rrsets: Vec::new(),
            dnssec: false,
            nsec3param: String::new(),
            nsec3narrow: false,
            api_rectify: true,
            soa_edit: String::new(),
            soa_edit_api: "DEFAULT".into(),
            metadata: ZoneMetadata::new(),
        }
    }

    /// True if `name` is the zone apex or lies below it.
    pub fn contains_name(&self, name: &str) -> bool {
        if self.name == "." {
            return name.ends_with('.');
        }
        name == self.name
            || name
                .strip_suffix(self.name.as_str())
                .is_some_and(|prefix| prefix.len() > 1 && prefix.ends_with('.'))
    }
}

/// Full declaration: zones per server identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DesiredState {
    pub zones: BTreeMap<String, Vec<DesiredZone>>,
}

impl DesiredState {
    pub fn is_empty(&self) -> bool {
        self.zones.values().all(Vec::is_empty)
    }

    pub fn zones_on(&self, server_id: &str) -> &[DesiredZone] {
        self.zones.get(server_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn zone_count(&self) -> usize {
        self.zones.values().map(Vec::len).sum()
    }
}
