use serde::{Deserialize, Serialize};

/// Entry of `GET /servers/{server}/zones`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PdnsZoneSummary {
    #[serde(default)]
    pub id: String, // "example.com."
    pub name: String, // "example.com."
    #[serde(default)]
    pub kind: String, // "Native", etc.
}

/// Zone detail as returned by `GET /servers/{server}/zones/{zone}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PdnsZone {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub zone_type: Option<String>, // "Zone"
    pub kind: String,
    #[serde(default)]
    pub dnssec: bool,
    #[serde(default)]
    pub nsec3param: String,
    #[serde(default)]
    pub nsec3narrow: bool,
    #[serde(default)]
    pub api_rectify: bool,
    #[serde(default)]
    pub soa_edit: String,
    #[serde(default)]
    pub soa_edit_api: String,
    #[serde(default)]
    pub rrsets: Vec<PdnsRrset>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PdnsRrset {
    pub name: String, // "www.example.com."
    #[serde(rename = "type")]
    pub rrtype: String, // "A", "NS", ...
    pub ttl: u32,
    pub records: Vec<PdnsRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<PdnsComment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PdnsRecord {
    pub content: String, // "192.0.2.1" or "ns1.example.net."
    #[serde(default)]
    pub disabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PdnsComment {
    pub content: String,
    pub account: String,
    pub modified_at: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeType {
    Delete,
    Replace,
}

/// One directive of a `PATCH /servers/{server}/zones/{zone}` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PdnsRrsetChange {
    pub name: String,
    #[serde(rename = "type")]
    pub rrtype: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub records: Option<Vec<PdnsRecord>>,
    pub changetype: ChangeType,
}

impl PdnsRrsetChange {
    pub fn delete(name: impl Into<String>, rrtype: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rrtype: rrtype.into(),
            ttl: None,
            records: None,
            changetype: ChangeType::Delete,
        }
    }

    pub fn replace(rrset: PdnsRrset) -> Self {
        Self {
            name: rrset.name,
            rrtype: rrset.rrtype,
            ttl: Some(rrset.ttl),
            records: Some(rrset.records),
            changetype: ChangeType::Replace,
        }
    }
}

// Used when creating a zone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PdnsZoneCreate {
    pub name: String,             // "example.com."
    pub kind: String,             // "Native"
    pub nameservers: Vec<String>, // always empty, NS come from rrsets
    pub dnssec: bool,
    pub nsec3param: String,
    pub nsec3narrow: bool,
    pub api_rectify: bool,
    pub soa_edit: String,
    pub soa_edit_api: String,
    pub rrsets: Vec<PdnsRrset>,
}

/// Body of `PUT /servers/{server}/zones/{zone}`; only set fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PdnsZoneUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dnssec: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nsec3param: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nsec3narrow: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_rectify: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub soa_edit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub soa_edit_api: Option<String>,
}

impl PdnsZoneUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Element of `GET /servers/{server}/zones/{zone}/metadata`, also the
/// body of the per-kind `PUT`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PdnsMetadata {
    pub kind: String,
    #[serde(default)]
    pub metadata: Vec<String>,
}
