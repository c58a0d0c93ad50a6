//! Object identifier model (spec §3 "Object identifier").

use crate::error::{Error, ErrorKind};

const MAX_COMPONENTS: usize = 16;
/// Sentinel marking an unused (trailing) component.
const UNUSED: i32 = -1;

/// A sequence of integer components, bounded to [`MAX_COMPONENTS`]. Trailing
/// components equal to `-1` are "unused"; two OIDs compare equal iff their
/// used prefixes are equal.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Oid {
    components: [i32; MAX_COMPONENTS],
}

impl Oid {
    pub fn from_components(components: &[i32]) -> Result<Self, Error> {
        if components.len() > MAX_COMPONENTS {
            return Err(ErrorKind::InvalidArguments.into());
        }
        let mut arr = [UNUSED; MAX_COMPONENTS];
        arr[..components.len()].copy_from_slice(components);
        Ok(Self { components: arr })
    }

    /// Parse a dotted string such as `"1.2.840.113549.1.1.1"`.
    pub fn format_oid(s: &str) -> Result<Self, Error> {
        let parts: Vec<&str> = s.split('.').filter(|p| !p.is_empty()).collect();
        if parts.len() < 2 {
            return Err(ErrorKind::InvalidArguments.into());
        }
        let mut components = Vec::with_capacity(parts.len());
        for p in parts {
            let v: i32 = p.parse().map_err(|_| Error::from(ErrorKind::InvalidArguments))?;
            if v < 0 {
                return Err(ErrorKind::InvalidArguments.into());
            }
            components.push(v);
        }
        Self::from_components(&components)
    }

    pub fn used(&self) -> &[i32] {
        let len = self.components.iter().position(|c| *c == UNUSED).unwrap_or(MAX_COMPONENTS);
        &self.components[..len]
    }

    pub fn to_dotted_string(&self) -> String {
        self.used().iter().map(|c| c.to_string()).collect::<Vec<_>>().join(".")
    }
}

impl PartialEq for Oid {
    fn eq(&self, other: &Self) -> bool {
        self.used() == other.used()
    }
}
impl Eq for Oid {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn s5_reject_short() {
        assert!(Oid::format_oid("1").is_err());
        assert!(Oid::format_oid("1.2.840.113549.1.1.1").is_ok());
    }

    #[test]
    fn equality_on_used_prefix() {
        let a = Oid::from_components(&[1, 2, 3]).unwrap();
        let b = Oid::from_components(&[1, 2, 3, UNUSED, UNUSED]).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn too_many_components_rejected() {
        let components = vec![1; MAX_COMPONENTS + 1];
        assert!(Oid::from_components(&components).is_err());
    }

    #[test]
    fn round_trip_string() {
        let oid = Oid::format_oid("1.2.840.113549.1.1.1").unwrap();
        assert_eq!(oid.to_dotted_string(), "1.2.840.113549.1.1.1");
    }
}
