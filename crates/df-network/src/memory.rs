//! In-memory host: the full `DuctHost` surface backed by plain data.

use std::collections::{BTreeMap, HashMap};

use df_core::{ElementId, SectionNumber};

use crate::host::{ConnectorRaw, DuctHost, HostElement, SectionRaw, SystemKind};

/// A validated, immutable duct system held in memory.
///
/// Built with [`crate::MemoryHostBuilder`]. Used by the project loader and
/// by tests as a stand-in for the authoring application.
#[derive(Debug, Clone)]
pub struct MemoryHost {
    pub(crate) name: String,
    pub(crate) kind: SystemKind,
    pub(crate) elements: BTreeMap<ElementId, HostElement>,
    pub(crate) connectors: BTreeMap<ElementId, Vec<ConnectorRaw>>,
    /// Sections in probe order.
    pub(crate) sections: Vec<SectionRaw>,
    pub(crate) pressure_drops: HashMap<(SectionNumber, ElementId), f64>,
    /// Critical path in host order (terminal → source).
    pub(crate) critical_path: Vec<SectionNumber>,
}

impl MemoryHost {
    /// All element ids, ascending.
    pub fn element_ids(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.elements.keys().copied()
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }
}

impl DuctHost for MemoryHost {
    fn system_name(&self) -> &str {
        &self.name
    }

    fn system_kind(&self) -> SystemKind {
        self.kind
    }

    fn element(&self, id: ElementId) -> Option<HostElement> {
        self.elements.get(&id).cloned()
    }

    fn connectors(&self, id: ElementId) -> Vec<ConnectorRaw> {
        self.connectors.get(&id).cloned().unwrap_or_default()
    }

    fn critical_path_section_numbers(&self) -> Vec<SectionNumber> {
        self.critical_path.clone()
    }

    fn section_by_index(&self, index: usize) -> Option<SectionRaw> {
        self.sections.get(index).cloned()
    }

    fn section_by_number(&self, number: SectionNumber) -> Option<SectionRaw> {
        self.sections.iter().find(|s| s.number == number).cloned()
    }

    fn section_pressure_drop(&self, number: SectionNumber, element: ElementId) -> Option<f64> {
        self.pressure_drops.get(&(number, element)).copied()
    }
}
