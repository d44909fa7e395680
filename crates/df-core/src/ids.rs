use core::fmt;
use core::num::NonZeroU64;

/// Identifier of a host model element (duct, fitting, terminal, ...).
///
/// - host ids are always positive, so `NonZero` is free
/// - `Option<ElementId>` stays the size of `ElementId`
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ElementId(NonZeroU64);

impl ElementId {
    /// Wrap a raw host id. Returns `None` for the reserved value 0.
    pub fn new(raw: u64) -> Option<Self> {
        NonZeroU64::new(raw).map(Self)
    }

    /// Raw host id.
    pub fn get(self) -> u64 {
        self.0.get()
    }
}

impl fmt::Debug for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ElementId({})", self.get())
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

/// Host section number (1-based, as reported by the critical path query).
pub type SectionNumber = u32;
