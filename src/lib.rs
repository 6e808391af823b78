//! Declarative PowerDNS zone management: build the desired state from a
//! Zonefile, diff it against the live servers and apply the resulting plan.

pub mod builder;
pub mod config;
pub mod error;
pub mod plan;
pub mod powerdns;
pub mod state;
pub mod validation;
pub mod zonefile;

pub use error::{Error, Result};
pub use plan::{Change, Changeset, Planner};
pub use state::{DesiredState, DesiredZone, RRSet, Record, ZoneKind, ZoneMetadata};
