//! Pure comparison of one declared zone against its live counterpart.
use std::collections::{BTreeMap, BTreeSet};

use crate::plan::change::Change;
use crate::powerdns::types::{PdnsRrset, PdnsRrsetChange, PdnsZone, PdnsZoneCreate, PdnsZoneUpdate};
use crate::state::{DesiredZone, RRSet, Record, ZoneMetadata};

/// Never diffed; the server maintains it.
const SOA: &str = "SOA";

/// Creation payload for a zone that does not exist yet. Metadata is not part
/// of it and no metadata change is planned for the new zone.
pub fn create_zone(server_id: &str, desired: &DesiredZone) -> Change {
    Change::CreateZone {
        server: server_id.to_string(),
        zone: desired.name.clone(),
        attributes: PdnsZoneCreate {
            name: desired.name.clone(),
            kind: desired.kind.to_string(),
            nameservers: Vec::new(),
            dnssec: desired.dnssec,
            nsec3param: desired.nsec3param.clone(),
            nsec3narrow: desired.nsec3narrow,
            api_rectify: desired.api_rectify,
            soa_edit: desired.soa_edit.clone(),
            soa_edit_api: desired.soa_edit_api.clone(),
            rrsets: desired.rrsets.iter().map(RRSet::to_pdns).collect(),
        },
    }
}

/// Changes for an existing zone, in the order attributes, rrsets, metadata.
/// `zone_id` is the server's identifier for the zone.
pub fn diff_zone(
    server_id: &str,
    zone_id: &str,
    desired: &DesiredZone,
    live: &PdnsZone,
    live_metadata: &ZoneMetadata,
) -> Vec<Change> {
    let mut changes = Vec::new();

    let attributes = diff_attributes(desired, live);
    if !attributes.is_empty() {
        changes.push(Change::ChangeZoneAttributes {
            server: server_id.to_string(),
            zone: desired.name.clone(),
            zone_id: zone_id.to_string(),
            changes: attributes,
        });
    }

    let rrsets = diff_rrsets(&desired.rrsets, &live.rrsets);
    if !rrsets.is_empty() {
        changes.push(Change::ModifyZoneRRSets {
            server: server_id.to_string(),
            zone: desired.name.clone(),
            zone_id: zone_id.to_string(),
            rrsets,
        });
    }

    changes.extend(diff_metadata(server_id, zone_id, desired, live_metadata));
    changes
}

/// Scalar settings that differ, carrying the desired value.
pub fn diff_attributes(desired: &DesiredZone, live: &PdnsZone) -> PdnsZoneUpdate {
    fn differs<T: PartialEq + Clone>(desired: &T, live: &T) -> Option<T> {
        (desired != live).then(|| desired.clone())
    }

    PdnsZoneUpdate {
        kind: differs(&desired.kind.to_string(), &live.kind),
        dnssec: differs(&desired.dnssec, &live.dnssec),
        nsec3param: differs(&desired.nsec3param, &live.nsec3param),
        nsec3narrow: differs(&desired.nsec3narrow, &live.nsec3narrow),
        api_rectify: differs(&desired.api_rectify, &live.api_rectify),
        soa_edit: differs(&desired.soa_edit, &live.soa_edit),
        soa_edit_api: differs(&desired.soa_edit_api, &live.soa_edit_api),
    }
}

#[derive(Default)]
struct Slot<'a> {
    live: Option<&'a PdnsRrset>,
    desired: Option<&'a RRSet>,
}

/// DELETE/REPLACE directives over the union of desired and live rrsets,
/// keyed by `(name, type)`. SOA rrsets are skipped. A later desired rrset with
/// the same key as an earlier one wins.
pub fn diff_rrsets(desired: &[RRSet], live: &[PdnsRrset]) -> Vec<PdnsRrsetChange> {
    let mut index: BTreeMap<(&str, &str), Slot<'_>> = BTreeMap::new();
    for rrset in live {
        index
            .entry((rrset.name.as_str(), rrset.rrtype.as_str()))
            .or_default()
            .live = Some(rrset);
    }
    for rrset in desired {
        index
            .entry((rrset.name.as_str(), rrset.rrtype.as_str()))
            .or_default()
            .desired = Some(rrset);
    }

    let mut changes = Vec::new();
    for ((name, rrtype), slot) in index {
        if rrtype == SOA {
            continue;
        }
        match (slot.desired, slot.live) {
            (None, _) => changes.push(PdnsRrsetChange::delete(name, rrtype)),
            (Some(desired), Some(live)) if rrsets_equal(desired, live) => {}
            (Some(desired), _) => changes.push(PdnsRrsetChange::replace(desired.to_pdns())),
        }
    }
    changes
}

/// Same TTL and the same records regardless of order or repetition. Both
/// sides must describe the same `(name, type)`.
pub fn rrsets_equal(desired: &RRSet, live: &PdnsRrset) -> bool {
    debug_assert_eq!(desired.name, live.name, "names must match");
    debug_assert_eq!(desired.rrtype, live.rrtype, "types must match");

    let live_records: Vec<Record> = live.records.iter().map(Record::from).collect();
    let live_set: BTreeSet<&Record> = live_records.iter().collect();
    desired.ttl == live.ttl && desired.record_set() == live_set
}

/// Metadata changes for the kinds the declaration mentions. Kinds only present
/// on the server are left alone.
pub fn diff_metadata(
    server_id: &str,
    zone_id: &str,
    desired: &DesiredZone,
    live: &ZoneMetadata,
) -> Vec<Change> {
    let mut changes = Vec::new();
    for (kind, desired_values) in &desired.metadata {
        let live_values = live.get(kind).map(Vec::as_slice).unwrap_or(&[]);

        if desired_values.is_empty() {
            if !live_values.is_empty() {
                changes.push(Change::DeleteMetadata {
                    server: server_id.to_string(),
                    zone: desired.name.clone(),
                    zone_id: zone_id.to_string(),
                    kind: kind.clone(),
                });
            }
        } else if sorted(live_values) != sorted(desired_values) {
            changes.push(Change::ChangeMetadata {
                server: server_id.to_string(),
                zone: desired.name.clone(),
                zone_id: zone_id.to_string(),
                kind: kind.clone(),
                values: desired_values.clone(),
            });
        }
    }
    changes
}

fn sorted(values: &[String]) -> Vec<&String> {
    let mut v: Vec<&String> = values.iter().collect();
    v.sort();
    v
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::powerdns::types::{ChangeType, PdnsRecord};
    use crate::state::ZoneKind;

    fn rrset(name: &str, rrtype: &str, ttl: u32, records: &[&str]) -> RRSet {
        RRSet {
            name: name.into(),
            rrtype: rrtype.into(),
            ttl,
            records: records.iter().map(|r| Record::new(*r)).collect(),
        }
    }

    fn live_rrset(name: &str, rrtype: &str, ttl: u32, records: &[&str]) -> PdnsRrset {
        rrset(name, rrtype, ttl, records).to_pdns()
    }

    fn live_zone(desired: &DesiredZone) -> PdnsZone {
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
            rrsets: desired.rrsets.iter().map(RRSet::to_pdns).collect(),
        }
    }

    #[test]
    fn only_differing_attributes_are_reported() {
        let mut desired = DesiredZone::new("example.com.", ZoneKind::Master);
        let mut live = live_zone(&desired);
        desired.dnssec = true;
        desired.soa_edit_api = "INCEPTION-INCREMENT".into();
        live.kind = "Native".into();

        let update = diff_attributes(&desired, &live);
        assert_eq!(
            update,
            PdnsZoneUpdate {
                kind: Some("Master".into()),
                dnssec: Some(true),
                soa_edit_api: Some("INCEPTION-INCREMENT".into()),
                ..Default::default()
            }
        );
    }

    #[test]
    fn equal_rrsets_ignore_record_order() {
        let desired = rrset("www.example.com.", "A", 300, &["192.0.2.1", "192.0.2.2"]);
        let live = live_rrset("www.example.com.", "A", 300, &["192.0.2.2", "192.0.2.1"]);
        assert!(rrsets_equal(&desired, &live));
    }

    #[test]
    fn ttl_difference_breaks_equality() {
        let desired = rrset("www.example.com.", "A", 300, &["192.0.2.1"]);
        let live = live_rrset("www.example.com.", "A", 600, &["192.0.2.1"]);
        assert!(!rrsets_equal(&desired, &live));
    }

    #[test]
    fn disabled_flag_is_part_of_record_identity() {
        let desired = rrset("www.example.com.", "A", 300, &["192.0.2.1"]);
        let mut live = live_rrset("www.example.com.", "A", 300, &["192.0.2.1"]);
        live.records = vec![PdnsRecord {
            content: "192.0.2.1".into(),
            disabled: true,
        }];
        assert!(!rrsets_equal(&desired, &live));
    }

    #[test]
    fn rrset_diff_replaces_deletes_and_skips_soa() {
        let desired = vec![
            rrset("www.example.com.", "A", 300, &["1.2.3.4"]),
            rrset("new.example.com.", "AAAA", 300, &["2001:db8::1"]),
            rrset("example.com.", "SOA", 300, &["synthesized. soa. 1 2 3 4 5"]),
        ];
        let live = vec![
            live_rrset("example.com.", "SOA", 3600, &["ns1. host. 2024 1 2 3 4"]),
            live_rrset("www.example.com.", "A", 300, &["1.2.3.5"]),
            live_rrset("old.example.com.", "A", 300, &["1.2.3.6"]),
        ];

        let changes = diff_rrsets(&desired, &live);
        assert_eq!(
            changes,
            vec![
                PdnsRrsetChange::replace(live_rrset(
                    "new.example.com.",
                    "AAAA",
                    300,
                    &["2001:db8::1"]
                )),
                PdnsRrsetChange::delete("old.example.com.", "A"),
                PdnsRrsetChange::replace(live_rrset("www.example.com.", "A", 300, &["1.2.3.4"])),
            ]
        );
        assert!(changes.iter().all(|c| c.rrtype != "SOA"));
        assert_eq!(changes[1].changetype, ChangeType::Delete);
        assert!(changes[1].records.is_none() && changes[1].ttl.is_none());
    }

    #[test]
    fn later_duplicate_rrset_wins() {
        let desired = vec![
            rrset("www.example.com.", "A", 300, &["192.0.2.1"]),
            rrset("www.example.com.", "A", 300, &["192.0.2.9"]),
        ];
        let live = vec![live_rrset("www.example.com.", "A", 300, &["192.0.2.9"])];
        assert!(diff_rrsets(&desired, &live).is_empty());
    }

    #[test]
    fn metadata_diff_sorts_before_comparing() {
        let mut desired = DesiredZone::new("example.com.", ZoneKind::Native);
        desired
            .metadata
            .insert("ALLOW-AXFR-FROM".into(), vec!["b".into(), "a".into()]);
        let live = ZoneMetadata::from([(
            "ALLOW-AXFR-FROM".to_string(),
            vec!["a".to_string(), "b".to_string()],
        )]);
        assert!(diff_metadata("localhost", "example.com.", &desired, &live).is_empty());
    }

    #[test]
    fn metadata_diff_changes_deletes_and_leaves_unknown_kinds() {
        let mut desired = DesiredZone::new("example.com.", ZoneKind::Native);
        desired
            .metadata
            .insert("ALLOW-AXFR-FROM".into(), Vec::new());
        desired
            .metadata
            .insert("ALSO-NOTIFY".into(), vec!["192.0.2.53".into()]);
        desired.metadata.insert("SOA-EDIT".into(), Vec::new());
        let live = ZoneMetadata::from([
            ("ALLOW-AXFR-FROM".to_string(), vec!["10.0.0.1".to_string()]),
            ("TSIG-ALLOW-AXFR".to_string(), vec!["key".to_string()]),
        ]);

        let changes = diff_metadata("localhost", "example.com.", &desired, &live);
        assert_eq!(
            changes,
            vec![
                Change::DeleteMetadata {
                    server: "localhost".into(),
                    zone: "example.com.".into(),
                    zone_id: "example.com.".into(),
                    kind: "ALLOW-AXFR-FROM".into(),
                },
                Change::ChangeMetadata {
                    server: "localhost".into(),
                    zone: "example.com.".into(),
                    zone_id: "example.com.".into(),
                    kind: "ALSO-NOTIFY".into(),
                    values: vec!["192.0.2.53".into()],
                },
            ]
        );
    }

    #[test]
    fn create_zone_seeds_empty_nameservers() {
        let mut desired = DesiredZone::new("example.com.", ZoneKind::Native);
        desired
            .rrsets
            .push(rrset("example.com.", "NS", 3600, &["ns1.example.net."]));
        let Change::CreateZone { attributes, .. } = create_zone("localhost", &desired) else {
            panic!("expected a zone creation");
        };
        assert!(attributes.nameservers.is_empty());
        assert_eq!(attributes.rrsets.len(), 1);
        assert_eq!(attributes.kind, "Native");
        assert_eq!(attributes.soa_edit_api, "DEFAULT");
    }

    #[test]
    fn in_sync_zone_has_no_changes() {
        let mut desired = DesiredZone::new("example.com.", ZoneKind::Native);
        desired
            .rrsets
            .push(rrset("www.example.com.", "A", 300, &["192.0.2.1"]));
        let mut live = live_zone(&desired);
        live.rrsets
            .push(live_rrset("example.com.", "SOA", 3600, &["a. b. 1 2 3 4 5"]));
        assert!(diff_zone("localhost", "example.com.", &desired, &live, &ZoneMetadata::new()).is_empty());
    }
}
