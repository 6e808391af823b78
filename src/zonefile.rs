//! YAML Zonefile loader.
//!
//! A Zonefile is a list of statements, each a single-key map, evaluated in
//! order through [`Builder`]:
//!
//! ```yaml
//! - server_id: ns1
//! - include: common.yml
//! - server:
//!     id: secondary
//!     body:
//!       - slave_zone: { name: example.org. }
//! - zone:
//!     name: example.com.
//!     body:
//!       - default_ttl: 3600
//!       - rrset: { name: www.example.com., type: A, records: [192.0.2.1] }
//!       - meta: { ALLOW-AXFR-FROM: [10.0.0.1] }
//! ```
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_yaml::Value;
use tracing::debug;

use crate::builder::{Builder, MetaValues, ZoneBuilder};
use crate::error::{Error, Result};
use crate::state::{DesiredState, ZoneKind};

/// Default Zonefile name looked up by the CLI.
pub const DEFAULT_ZONEFILE: &str = "Zonefile";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum Statement {
    ServerId(String),
    Server(ServerBlock),
    Zone(ZoneDecl),
    HostedZone(ZoneDecl),
    MasterZone(PresetZoneDecl),
    SlaveZone(PresetZoneDecl),
    Include(PathBuf),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ServerBlock {
    id: String,
    #[serde(default)]
    body: Vec<Statement>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ZoneDecl {
    name: String,
    #[serde(default)]
    kind: Option<ZoneKind>,
    #[serde(default)]
    body: Vec<ZoneStatement>,
}

/// `master_zone` and `slave_zone` fix the kind, so none may be given.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PresetZoneDecl {
    name: String,
    #[serde(default)]
    body: Vec<ZoneStatement>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum ZoneStatement {
    DefaultTtl(u32),
    Dnssec(bool),
    Nsec3param(String),
    Nsec3narrow(bool),
    ApiRectify(bool),
    SoaEdit(String),
    SoaEditApi(String),
    Rrset(RrsetDecl),
    ResourceRecordSet(RrsetDecl),
    Meta(BTreeMap<String, Value>),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RrsetDecl {
    name: String,
    #[serde(rename = "type")]
    rrtype: String,
    #[serde(default)]
    ttl: Option<u32>,
    #[serde(default, alias = "resource_records")]
    records: Value,
}

/// Load and evaluate the Zonefile at `path`.
pub fn load(path: impl AsRef<Path>) -> Result<DesiredState> {
    Builder::define(|builder| Loader::default().eval_file(builder, path.as_ref()))
}

/// Evaluate Zonefile text. `origin` names the source in errors and anchors
/// relative includes.
pub fn parse(source: &str, origin: impl AsRef<Path>) -> Result<DesiredState> {
    let origin = origin.as_ref();
    let statements = parse_statements(source, origin)?;
    Builder::define(|builder| Loader::default().eval_all(builder, &statements, origin))
}

/// Statements are single-key maps (`- zone: {..}`), not YAML `!tags`.
fn parse_statements(source: &str, origin: &Path) -> Result<Vec<Statement>> {
    if source.trim().is_empty() {
        return Ok(Vec::new());
    }
    let deserializer = serde_yaml::Deserializer::from_str(source);
    serde_yaml::with::singleton_map_recursive::deserialize(deserializer)
        .map_err(|e| Error::config(origin, e))
}

#[derive(Default)]
struct Loader {
    // files currently being evaluated, to reject include cycles
    stack: Vec<PathBuf>,
}

impl Loader {
    fn eval_file(&mut self, builder: &mut Builder, path: &Path) -> Result<()> {
        let canonical = path.canonicalize().map_err(|e| Error::config(path, e))?;
        if self.stack.contains(&canonical) {
            return Err(Error::config(path, "include cycle"));
        }

        debug!(path = %path.display(), "evaluating zonefile");
        let source = fs::read_to_string(path).map_err(|e| Error::config(path, e))?;
        let statements = parse_statements(&source, path)?;

        self.stack.push(canonical);
        let result = self.eval_all(builder, &statements, path);
        self.stack.pop();
        result
    }

    fn eval_all(
        &mut self,
        builder: &mut Builder,
        statements: &[Statement],
        origin: &Path,
    ) -> Result<()> {
        for statement in statements {
            match statement {
                Statement::ServerId(id) => builder.server_id(id.as_str()),
                Statement::Server(block) => builder.server(block.id.as_str(), |b| {
                    self.eval_all(b, &block.body, origin)
                })?,
                Statement::Zone(decl) | Statement::HostedZone(decl) => eval_zone(
                    builder,
                    &decl.name,
                    decl.kind.unwrap_or_default(),
                    &decl.body,
                    origin,
                )?,
                Statement::MasterZone(decl) => {
                    eval_zone(builder, &decl.name, ZoneKind::Master, &decl.body, origin)?
                }
                Statement::SlaveZone(decl) => {
                    eval_zone(builder, &decl.name, ZoneKind::Slave, &decl.body, origin)?
                }
                Statement::Include(path) => {
                    let resolved = resolve_include(origin, path)?;
                    self.eval_file(builder, &resolved)?;
                }
            }
        }
        Ok(())
    }
}

fn eval_zone(
    builder: &mut Builder,
    name: &str,
    kind: ZoneKind,
    body: &[ZoneStatement],
    origin: &Path,
) -> Result<()> {
    builder.zone(name, kind, |zone| {
        for statement in body {
            eval_zone_statement(zone, statement, origin)?;
        }
        Ok(())
    })
}

fn eval_zone_statement(zone: &mut ZoneBuilder, statement: &ZoneStatement, origin: &Path) -> Result<()> {
    match statement {
        ZoneStatement::DefaultTtl(ttl) => zone.default_ttl(*ttl),
        ZoneStatement::Dnssec(v) => zone.dnssec(*v),
        ZoneStatement::Nsec3param(v) => zone.nsec3param(v.as_str()),
        ZoneStatement::Nsec3narrow(v) => zone.nsec3narrow(*v),
        ZoneStatement::ApiRectify(v) => zone.api_rectify(*v),
        ZoneStatement::SoaEdit(v) => zone.soa_edit(v.as_str()),
        ZoneStatement::SoaEditApi(v) => zone.soa_edit_api(v.as_str()),
        ZoneStatement::Rrset(decl) | ZoneStatement::ResourceRecordSet(decl) => {
            let records = string_list(&decl.records).map_err(|msg| {
                Error::config(origin, format!("records of {} {}: {msg}", decl.name, decl.rrtype))
            })?;
            zone.rrset(&decl.name, &decl.rrtype, |rrset| {
                if let Some(ttl) = decl.ttl {
                    rrset.ttl(ttl);
                }
                rrset.records(records);
                Ok(())
            })?;
        }
        ZoneStatement::Meta(pairs) => {
            let mut normalized = Vec::with_capacity(pairs.len());
            for (kind, value) in pairs {
                let values = string_list(value).map_err(|msg| {
                    Error::config(origin, format!("meta {kind} of {}: {msg}", zone.name()))
                })?;
                normalized.push((kind.clone(), MetaValues(values)));
            }
            zone.meta(normalized);
        }
    }
    Ok(())
}

/// `~` is an empty list, a scalar a one-element list.
fn string_list(value: &Value) -> std::result::Result<Vec<String>, String> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Sequence(items) => items.iter().map(scalar).collect(),
        other => Ok(vec![scalar(other)?]),
    }
}

fn scalar(value: &Value) -> std::result::Result<String, String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok(String::new()),
        Value::Tagged(tagged) => scalar(&tagged.value),
        Value::Sequence(_) | Value::Mapping(_) => Err("expected a scalar value".into()),
    }
}

/// Relative includes resolve against the including file's directory; a
/// missing `.yml` or `.yaml` extension is tried as well.
fn resolve_include(origin: &Path, include: &Path) -> Result<PathBuf> {
    let base = origin
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let candidate = base.join(include);
    if candidate.is_file() {
        return Ok(candidate);
    }
    for ext in ["yml", "yaml"] {
        let mut with_ext = candidate.clone().into_os_string();
        with_ext.push(".");
        with_ext.push(ext);
        let with_ext = PathBuf::from(with_ext);
        if with_ext.is_file() {
            return Ok(with_ext);
        }
    }
    Err(Error::config(
        origin,
        format!("included file {} not found", include.display()),
    ))
}
