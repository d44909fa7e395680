//! Incremental builder for [`MemoryHost`].

use std::collections::{BTreeMap, HashMap};

use df_core::units::host;
use df_core::{ElementId, Pressure, SectionNumber, VolumeRate};

use crate::error::NetworkResult;
use crate::host::{ConnectorRaw, HostElement, SectionRaw, SystemKind};
use crate::memory::MemoryHost;
use crate::validate;

/// Builder for constructing an in-memory host incrementally.
///
/// Add elements, connectors and sections, then call `build()` to validate and
/// freeze everything into an immutable `MemoryHost`.
#[derive(Debug)]
pub struct MemoryHostBuilder {
    name: String,
    kind: SystemKind,
    elements: Vec<HostElement>,
    connectors: Vec<ConnectorRaw>,
    sections: Vec<SectionRaw>,
    pressure_drops: HashMap<(SectionNumber, ElementId), f64>,
    critical_path: Vec<SectionNumber>,
}

impl MemoryHostBuilder {
    /// Create a new empty builder for one system.
    pub fn new(name: impl Into<String>, kind: SystemKind) -> Self {
        Self {
            name: name.into(),
            kind,
            elements: Vec::new(),
            connectors: Vec::new(),
            sections: Vec::new(),
            pressure_drops: HashMap::new(),
            critical_path: Vec::new(),
        }
    }

    /// Add an element and return its id.
    pub fn add_element(&mut self, element: HostElement) -> ElementId {
        let id = element.id;
        self.elements.push(element);
        id
    }

    /// Add a connector to its owning element. Returns its position among the
    /// owner's connectors.
    pub fn add_connector(&mut self, connector: ConnectorRaw) -> usize {
        let owner = connector.owner;
        let position = self.connectors.iter().filter(|c| c.owner == owner).count();
        self.connectors.push(connector);
        position
    }

    /// Join connector `a_pos` of `a` with connector `b_pos` of `b`.
    ///
    /// Positions that don't exist are left alone; `build()` doesn't need them.
    pub fn connect(&mut self, a: ElementId, a_pos: usize, b: ElementId, b_pos: usize) {
        if let Some(c) = self.nth_connector_mut(a, a_pos) {
            c.connected = Some(b);
        }
        if let Some(c) = self.nth_connector_mut(b, b_pos) {
            c.connected = Some(a);
        }
    }

    /// Add a section in probe order.
    pub fn add_section(
        &mut self,
        number: SectionNumber,
        flow: VolumeRate,
        elements: impl IntoIterator<Item = ElementId>,
    ) {
        self.sections.push(SectionRaw {
            number,
            flow: host::flow_to_internal(flow),
            element_ids: elements.into_iter().collect(),
        });
    }

    /// Record what the host reports as an element's pressure drop in a section.
    pub fn set_pressure_drop(&mut self, number: SectionNumber, element: ElementId, drop: Pressure) {
        self.pressure_drops
            .insert((number, element), host::pressure_to_internal(drop));
    }

    /// Critical path in host order (terminal → source).
    pub fn set_critical_path(&mut self, numbers: impl IntoIterator<Item = SectionNumber>) {
        self.critical_path = numbers.into_iter().collect();
    }

    /// Build and validate the host.
    pub fn build(self) -> NetworkResult<MemoryHost> {
        validate::validate_elements(&self.elements)?;

        let elements: BTreeMap<ElementId, HostElement> =
            self.elements.into_iter().map(|e| (e.id, e)).collect();

        validate::validate_connectors(&elements, &self.connectors)?;
        validate::validate_sections(&elements, &self.sections, &self.critical_path)?;

        let mut connectors: BTreeMap<ElementId, Vec<ConnectorRaw>> = BTreeMap::new();
        for connector in self.connectors {
            connectors.entry(connector.owner).or_default().push(connector);
        }

        Ok(MemoryHost {
            name: self.name,
            kind: self.kind,
            elements,
            connectors,
            sections: self.sections,
            pressure_drops: self.pressure_drops,
            critical_path: self.critical_path,
        })
    }

    fn nth_connector_mut(&mut self, owner: ElementId, pos: usize) -> Option<&mut ConnectorRaw> {
        self.connectors
            .iter_mut()
            .filter(|c| c.owner == owner)
            .nth(pos)
    }
}
