//! XSD particles
//!
//! Particles are the structural schema constructs carrying occurrence
//! bounds. They form a closed tagged union so the compiler can dispatch
//! exhaustively instead of testing runtime types.
//!
//! Reference: https://www.w3.org/TR/xmlschema11-1/#p

use crate::error::{InvalidSchema, Result};
use crate::namespaces::QName;

use super::types::ElementDecl;

/// Occurrence bounds for a particle (minOccurs, maxOccurs)
///
/// `None` for `max` means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occurs {
    /// Minimum number of occurrences (default 1)
    pub min: u32,
    /// Maximum number of occurrences (None = unbounded, default 1)
    pub max: Option<u32>,
}

impl Occurs {
    /// Create new occurrence bounds
    pub fn new(min: u32, max: Option<u32>) -> Self {
        Self { min, max }
    }

    /// Default occurrence (1, 1)
    pub fn once() -> Self {
        Self { min: 1, max: Some(1) }
    }

    /// Optional occurrence (0, 1)
    pub fn optional() -> Self {
        Self { min: 0, max: Some(1) }
    }

    /// Zero or more (0, unbounded)
    pub fn zero_or_more() -> Self {
        Self { min: 0, max: None }
    }

    /// One or more (1, unbounded)
    pub fn one_or_more() -> Self {
        Self { min: 1, max: None }
    }

    /// Check if this particle can be absent (minOccurs == 0)
    pub fn is_emptiable(&self) -> bool {
        self.min == 0
    }

    /// Check if maxOccurs == 1
    pub fn is_single(&self) -> bool {
        self.max == Some(1)
    }

    /// Check if more than one occurrence is allowed
    pub fn is_multiple(&self) -> bool {
        match self.max {
            Some(max) => max > 1,
            None => true,
        }
    }

    /// Check if an occurrence count is under the minimum
    pub fn is_missing(&self, count: u32) -> bool {
        count < self.min
    }

    /// Check if an occurrence count exceeds the maximum
    pub fn is_exceeded(&self, count: u32) -> bool {
        match self.max {
            Some(max) => count > max,
            None => false,
        }
    }

    /// Parse minOccurs/maxOccurs attribute values
    pub fn parse(min_occurs: Option<&str>, max_occurs: Option<&str>) -> Result<Self> {
        let mut occurs = Occurs::once();

        if let Some(min_str) = min_occurs {
            occurs.min = min_str.parse::<u32>().map_err(|_| {
                InvalidSchema::new("minOccurs value is not a valid non-negative integer")
            })?;
        }

        match max_occurs {
            Some("unbounded") => occurs.max = None,
            Some(max_str) => {
                let max = max_str.parse::<u32>().map_err(|_| {
                    InvalidSchema::new(
                        "maxOccurs value must be a non-negative integer or 'unbounded'",
                    )
                })?;
                if occurs.min > max {
                    return Err(InvalidSchema::new(
                        "minOccurs must be lesser or equal than maxOccurs",
                    )
                    .into());
                }
                occurs.max = Some(max);
            }
            None => {
                if occurs.min > 1 {
                    return Err(InvalidSchema::new(
                        "minOccurs must be lesser or equal than maxOccurs",
                    )
                    .into());
                }
            }
        }

        Ok(occurs)
    }
}

impl Default for Occurs {
    fn default() -> Self {
        Self::once()
    }
}

/// A particle in a content model
///
/// The closed set of structural constructs that can appear in a complex
/// type's content: compositors, group references, wildcards and element
/// leaves.
#[derive(Debug, Clone)]
pub enum Particle {
    /// Ordered sequence of child particles
    Sequence {
        /// Occurrence bounds of the sequence itself
        occurs: Occurs,
        /// Child particles in schema order
        children: Vec<Particle>,
    },
    /// Exactly one of the child particles
    Choice {
        /// Occurrence bounds of the choice itself
        occurs: Occurs,
        /// Alternative particles
        children: Vec<Particle>,
    },
    /// Unordered set of elements; minOccurs in {0,1}, maxOccurs 1
    All {
        /// Occurrence bounds (restricted, see `validate_all_occurs`)
        occurs: Occurs,
        /// Element children (compositors are not allowed under all)
        children: Vec<Particle>,
    },
    /// Reference to a named model group
    GroupRef {
        /// Occurrence bounds at the reference site
        occurs: Occurs,
        /// Name of the referenced group
        reference: QName,
    },
    /// Element wildcard (xs:any)
    Any {
        /// Occurrence bounds
        occurs: Occurs,
    },
    /// Element leaf
    Element(ElementDecl),
}

impl Particle {
    /// Get the occurrence bounds
    pub fn occurs(&self) -> Occurs {
        match self {
            Particle::Sequence { occurs, .. }
            | Particle::Choice { occurs, .. }
            | Particle::All { occurs, .. }
            | Particle::GroupRef { occurs, .. }
            | Particle::Any { occurs } => *occurs,
            Particle::Element(decl) => decl.occurs,
        }
    }

    /// Compositor tag name for diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Particle::Sequence { .. } => "sequence",
            Particle::Choice { .. } => "choice",
            Particle::All { .. } => "all",
            Particle::GroupRef { .. } => "group",
            Particle::Any { .. } => "any",
            Particle::Element(_) => "element",
        }
    }
}

/// Check the extra occurrence restriction on xs:all
///
/// All groups only ever appear once: minOccurs 0 or 1, maxOccurs 1.
pub fn validate_all_occurs(occurs: Occurs) -> Result<()> {
    if occurs.min > 1 || occurs.max != Some(1) {
        return Err(InvalidSchema::new(
            "all group requires minOccurs of 0 or 1 and maxOccurs of 1",
        )
        .into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_occurs_presets() {
        assert_eq!(Occurs::once(), Occurs::new(1, Some(1)));
        assert_eq!(Occurs::optional(), Occurs::new(0, Some(1)));
        assert_eq!(Occurs::zero_or_more(), Occurs::new(0, None));
        assert_eq!(Occurs::one_or_more(), Occurs::new(1, None));
    }

    #[test]
    fn test_occurs_predicates() {
        let optional = Occurs::optional();
        assert!(optional.is_emptiable());
        assert!(optional.is_single());
        assert!(!optional.is_multiple());

        let unbounded = Occurs::zero_or_more();
        assert!(unbounded.is_emptiable());
        assert!(!unbounded.is_single());
        assert!(unbounded.is_multiple());
    }

    #[test]
    fn test_occurs_counting() {
        let occurs = Occurs::new(2, Some(5));
        assert!(occurs.is_missing(1));
        assert!(!occurs.is_missing(2));
        assert!(!occurs.is_exceeded(5));
        assert!(occurs.is_exceeded(6));

        let unbounded = Occurs::one_or_more();
        assert!(!unbounded.is_exceeded(u32::MAX));
    }

    #[test]
    fn test_parse_occurs_default() {
        let occurs = Occurs::parse(None, None).unwrap();
        assert_eq!(occurs, Occurs::once());
    }

    #[test]
    fn test_parse_occurs_values() {
        let occurs = Occurs::parse(Some("0"), Some("5")).unwrap();
        assert_eq!(occurs, Occurs::new(0, Some(5)));

        let occurs = Occurs::parse(Some("1"), Some("unbounded")).unwrap();
        assert_eq!(occurs, Occurs::new(1, None));
    }

    #[test]
    fn test_parse_occurs_errors() {
        assert!(Occurs::parse(Some("abc"), None).is_err());
        assert!(Occurs::parse(None, Some("abc")).is_err());
        // minOccurs > maxOccurs
        assert!(Occurs::parse(Some("5"), Some("3")).is_err());
        // minOccurs > default maxOccurs (1)
        assert!(Occurs::parse(Some("5"), None).is_err());
    }

    #[test]
    fn test_all_occurs_restriction() {
        assert!(validate_all_occurs(Occurs::once()).is_ok());
        assert!(validate_all_occurs(Occurs::optional()).is_ok());
        assert!(validate_all_occurs(Occurs::new(2, Some(2))).is_err());
        assert!(validate_all_occurs(Occurs::new(1, None)).is_err());
        assert!(validate_all_occurs(Occurs::new(0, Some(2))).is_err());
    }
}
