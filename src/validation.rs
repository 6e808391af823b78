use crate::state::DesiredZone;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("zone name '{0}' must be a FQDN with a trailing dot")]
    ZoneNotFqdn(String),
    #[error("rrset name '{name}' must end with the zone name '{zone}'")]
    RrsetOutsideZone { name: String, zone: String },
    #[error("rrset {name} {rrtype} has no ttl and zone declares no default_ttl")]
    MissingTtl { name: String, rrtype: String },
    #[error("rrset type for '{0}' is empty")]
    EmptyType(String),
}

pub fn validate_zone_name(name: &str) -> Result<(), ValidationError> {
    if !name.ends_with('.') {
        return Err(ValidationError::ZoneNotFqdn(name.to_string()));
    }
    Ok(())
}

pub fn validate_rrset_name(zone: &DesiredZone, name: &str) -> Result<(), ValidationError> {
    if !zone.contains_name(name) {
        return Err(ValidationError::RrsetOutsideZone {
            name: name.to_string(),
            zone: zone.name.clone(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ZoneKind;

    #[test]
    fn zone_name_needs_trailing_dot() {
        assert!(validate_zone_name("example.com.").is_ok());
        assert_eq!(
            validate_zone_name("example.com"),
            Err(ValidationError::ZoneNotFqdn("example.com".into()))
        );
        assert!(validate_zone_name("").is_err());
    }

    #[test]
    fn rrset_outside_zone_is_rejected() {
        let zone = DesiredZone::new("example.com.", ZoneKind::Native);
        assert!(validate_rrset_name(&zone, "example.com.").is_ok());
        assert!(validate_rrset_name(&zone, "www.example.com.").is_ok());
        assert!(matches!(
            validate_rrset_name(&zone, "www.other.com."),
            Err(ValidationError::RrsetOutsideZone { .. })
        ));
    }
}
