//! Scoped builder that turns zone declarations into a [`DesiredState`].
//!
//! A declaration runs inside [`Builder::define`] and nested declarations are
//! closures. A failing closure aborts the whole declaration: the error
//! propagates through every enclosing call and the zones declared before it
//! are discarded with the builder.
use std::mem;

use crate::error::Result;
use crate::state::{DEFAULT_SERVER_ID, DesiredState, DesiredZone, RRSet, Record, ZoneKind};
use crate::validation::{ValidationError, validate_rrset_name, validate_zone_name};

/// Values of one metadata kind. A single value becomes a one-element list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetaValues(pub Vec<String>);

impl From<&str> for MetaValues {
    fn from(v: &str) -> Self {
        MetaValues(vec![v.to_string()])
    }
}

impl From<String> for MetaValues {
    fn from(v: String) -> Self {
        MetaValues(vec![v])
    }
}

impl<T: ToString> From<Vec<T>> for MetaValues {
    fn from(v: Vec<T>) -> Self {
        MetaValues(v.iter().map(ToString::to_string).collect())
    }
}

impl<T: ToString> From<&[T]> for MetaValues {
    fn from(v: &[T]) -> Self {
        MetaValues(v.iter().map(ToString::to_string).collect())
    }
}

impl<T: Into<MetaValues>> From<Option<T>> for MetaValues {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or_default()
    }
}

pub struct Builder {
    server_id: String,
    state: DesiredState,
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

impl Builder {
    pub fn new() -> Self {
        Self {
            server_id: DEFAULT_SERVER_ID.to_string(),
            state: DesiredState::default(),
        }
    }

    /// Server that zones declared now will be attached to.
    pub fn current_server(&self) -> &str {
        &self.server_id
    }

    /// Switch the server scope for the rest of the declaration.
    pub fn server_id(&mut self, id: impl Into<String>) {
        self.server_id = id.into();
    }

    /// Run `block` with the server scope set to `id`. The previous scope is
    /// restored afterwards, whether or not `block` succeeded.
    pub fn server<F>(&mut self, id: impl Into<String>, block: F) -> Result<()>
    where
        F: FnOnce(&mut Builder) -> Result<()>,
    {
        let previous = mem::replace(&mut self.server_id, id.into());
        let result = block(self);
        self.server_id = previous;
        result
    }

    pub fn zone<F>(&mut self, name: &str, kind: ZoneKind, block: F) -> Result<()>
    where
        F: FnOnce(&mut ZoneBuilder) -> Result<()>,
    {
        validate_zone_name(name)?;

        let mut zone = ZoneBuilder::new(name, kind);
        block(&mut zone)?;

        self.state
            .zones
            .entry(self.server_id.clone())
            .or_default()
            .push(zone.finish());
        Ok(())
    }

    pub fn hosted_zone<F>(&mut self, name: &str, kind: ZoneKind, block: F) -> Result<()>
    where
        F: FnOnce(&mut ZoneBuilder) -> Result<()>,
    {
        self.zone(name, kind, block)
    }

    pub fn master_zone<F>(&mut self, name: &str, block: F) -> Result<()>
    where
        F: FnOnce(&mut ZoneBuilder) -> Result<()>,
    {
        self.zone(name, ZoneKind::Master, block)
    }

    pub fn slave_zone<F>(&mut self, name: &str, block: F) -> Result<()>
    where
        F: FnOnce(&mut ZoneBuilder) -> Result<()>,
    {
        self.zone(name, ZoneKind::Slave, block)
    }

    /// Run a complete declaration and return the state it describes, or the
    /// first error it hit.
    pub fn define<F>(block: F) -> Result<DesiredState>
    where
        F: FnOnce(&mut Builder) -> Result<()>,
    {
        let mut builder = Builder::new();
        block(&mut builder)?;
        Ok(builder.build())
    }

    fn build(self) -> DesiredState {
        self.state
    }
}

/// Settings of one zone. `default_ttl` only reaches rrsets declared after it.
pub struct ZoneBuilder {
    zone: DesiredZone,
    default_ttl: Option<u32>,
}

impl ZoneBuilder {
    fn new(name: &str, kind: ZoneKind) -> Self {
        Self {
            zone: DesiredZone::new(name, kind),
            default_ttl: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.zone.name
    }

    pub fn dnssec(&mut self, value: bool) {
        self.zone.dnssec = value;
    }

    pub fn nsec3param(&mut self, value: impl Into<String>) {
        self.zone.nsec3param = value.into();
    }

    pub fn nsec3narrow(&mut self, value: bool) {
        self.zone.nsec3narrow = value;
    }

    pub fn api_rectify(&mut self, value: bool) {
        self.zone.api_rectify = value;
    }

    pub fn soa_edit(&mut self, value: impl Into<String>) {
        self.zone.soa_edit = value.into();
    }

    pub fn soa_edit_api(&mut self, value: impl Into<String>) {
        self.zone.soa_edit_api = value.into();
    }

    pub fn default_ttl(&mut self, ttl: u32) {
        self.default_ttl = Some(ttl);
    }

    pub fn rrset<F>(&mut self, name: &str, rrtype: &str, block: F) -> Result<()>
    where
        F: FnOnce(&mut RRSetBuilder) -> Result<()>,
    {
        validate_rrset_name(&self.zone, name)?;
        if rrtype.is_empty() {
            return Err(ValidationError::EmptyType(name.to_string()).into());
        }

        let mut rrset = RRSetBuilder {
            name: name.to_string(),
            rrtype: rrtype.to_string(),
            ttl: self.default_ttl,
            records: Vec::new(),
        };
        block(&mut rrset)?;

        let ttl = rrset.ttl.ok_or_else(|| ValidationError::MissingTtl {
            name: rrset.name.clone(),
            rrtype: rrset.rrtype.clone(),
        })?;
        self.zone.rrsets.push(RRSet {
            name: rrset.name,
            rrtype: rrset.rrtype,
            ttl,
            records: rrset.records,
        });
        Ok(())
    }

    pub fn resource_record_set<F>(&mut self, name: &str, rrtype: &str, block: F) -> Result<()>
    where
        F: FnOnce(&mut RRSetBuilder) -> Result<()>,
    {
        self.rrset(name, rrtype, block)
    }

    /// Set metadata kinds; a later value for the same kind replaces the earlier one.
    pub fn meta<K, V, I>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<MetaValues>,
    {
        for (kind, values) in pairs {
            self.zone.metadata.insert(kind.into(), values.into().0);
        }
    }

    fn finish(self) -> DesiredZone {
        self.zone
    }
}

pub struct RRSetBuilder {
    name: String,
    rrtype: String,
    ttl: Option<u32>,
    records: Vec<Record>,
}

impl RRSetBuilder {
    pub fn ttl(&mut self, ttl: u32) {
        self.ttl = Some(ttl);
    }

    /// Append enabled records.
    pub fn records<I, S>(&mut self, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.records.extend(values.into_iter().map(Record::new));
    }

    pub fn resource_records<I, S>(&mut self, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.records(values)
    }
}
