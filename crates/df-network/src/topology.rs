//! Network topology index: sections, critical path and flow lookup.

use std::collections::HashMap;

use df_core::units::{host, to_m3h};
use df_core::{ElementId, SectionNumber};
use tracing::{debug, warn};

use crate::error::{NetworkError, NetworkResult};
use crate::host::{DuctHost, SectionRaw, SystemKind};

/// A contiguous run of the network sharing one flow value.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkSection {
    /// Probe index the section was found at.
    pub index: usize,
    pub number: SectionNumber,
    /// Member elements in host order.
    pub elements: Vec<ElementId>,
    /// Section flow, m³/h.
    pub flow_m3h: f64,
}

impl NetworkSection {
    fn from_raw(raw: SectionRaw, index: usize) -> Self {
        Self {
            index,
            number: raw.number,
            elements: raw.element_ids,
            flow_m3h: to_m3h(host::flow(raw.flow)).abs(),
        }
    }

    pub fn contains(&self, element: ElementId) -> bool {
        self.elements.contains(&element)
    }
}

/// Section numbers of the dominant path, ordered along the physical flow
/// (source → terminal for supply, terminal → source for return/exhaust).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CriticalPath {
    numbers: Vec<SectionNumber>,
}

impl CriticalPath {
    /// Normalize the host's order (terminal → source) to flow order.
    pub fn from_host_order(mut numbers: Vec<SectionNumber>, kind: SystemKind) -> Self {
        if kind.is_supply() {
            numbers.reverse();
        }
        Self { numbers }
    }

    pub fn numbers(&self) -> &[SectionNumber] {
        &self.numbers
    }

    pub fn len(&self) -> usize {
        self.numbers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.numbers.is_empty()
    }
}

/// Sections of one system, indexed for lookups by element and by number.
///
/// Built fresh for each calculation run and discarded afterwards.
#[derive(Debug, Clone)]
pub struct TopologyIndex {
    system: String,
    kind: SystemKind,
    sections: Vec<NetworkSection>,
    critical: CriticalPath,
    /// Section number -> position in `sections`.
    by_number: HashMap<SectionNumber, usize>,
    /// Element -> positions in `sections` (an element may sit in several at a junction).
    membership: HashMap<ElementId, Vec<usize>>,
}

impl TopologyIndex {
    /// Probe the host for sections and resolve its critical path.
    ///
    /// Probing starts at index 0 and stops at the first index the host has no
    /// section for, or at `probe_limit`.
    pub fn build(host: &dyn DuctHost, probe_limit: usize) -> NetworkResult<Self> {
        let system = host.system_name().to_string();
        let kind = host.system_kind();

        let mut sections = Vec::new();
        for index in 0..probe_limit {
            match host.section_by_index(index) {
                Some(raw) => sections.push(NetworkSection::from_raw(raw, index)),
                None => break,
            }
        }
        if sections.len() == probe_limit {
            warn!(
                system = %system,
                probe_limit,
                "section probe hit its limit; later sections are ignored"
            );
        }
        debug!(system = %system, count = sections.len(), "probed sections");

        let mut by_number = HashMap::with_capacity(sections.len());
        for (pos, section) in sections.iter().enumerate() {
            if by_number.insert(section.number, pos).is_some() {
                return Err(NetworkError::DuplicateSection {
                    number: section.number,
                });
            }
        }

        let critical = CriticalPath::from_host_order(host.critical_path_section_numbers(), kind);

        // Critical sections beyond the probed range are fetched by number.
        for &number in critical.numbers() {
            if by_number.contains_key(&number) {
                continue;
            }
            let raw = host
                .section_by_number(number)
                .ok_or(NetworkError::MissingSection { number })?;
            debug!(number, "critical section fetched by number");
            let pos = sections.len();
            sections.push(NetworkSection::from_raw(raw, pos));
            by_number.insert(number, pos);
        }

        let mut membership: HashMap<ElementId, Vec<usize>> = HashMap::new();
        for (pos, section) in sections.iter().enumerate() {
            for &element in &section.elements {
                let entry = membership.entry(element).or_default();
                if !entry.contains(&pos) {
                    entry.push(pos);
                }
            }
        }

        let index = Self {
            system,
            kind,
            sections,
            critical,
            by_number,
            membership,
        };

        let members: usize = index.critical_sections().map(|s| s.elements.len()).sum();
        if members == 0 {
            return Err(NetworkError::EmptyCriticalPath {
                system: index.system,
            });
        }
        debug!(
            system = %index.system,
            sections = index.critical.len(),
            members,
            "critical path resolved"
        );

        Ok(index)
    }

    pub fn system_name(&self) -> &str {
        &self.system
    }

    pub fn system_kind(&self) -> SystemKind {
        self.kind
    }

    pub fn sections(&self) -> &[NetworkSection] {
        &self.sections
    }

    pub fn critical_path(&self) -> &CriticalPath {
        &self.critical
    }

    pub fn section(&self, number: SectionNumber) -> Option<&NetworkSection> {
        self.by_number.get(&number).map(|&pos| &self.sections[pos])
    }

    /// Critical path sections in flow order.
    pub fn critical_sections(&self) -> impl Iterator<Item = &NetworkSection> + '_ {
        self.critical
            .numbers()
            .iter()
            .filter_map(move |n| self.section(*n))
    }

    /// Every section containing `element`, in probe order.
    pub fn sections_containing(
        &self,
        element: ElementId,
    ) -> impl Iterator<Item = &NetworkSection> + '_ {
        self.membership
            .get(&element)
            .into_iter()
            .flatten()
            .map(move |&pos| &self.sections[pos])
    }

    /// Flow of every section containing `element`, m³/h.
    pub fn flows_for(&self, element: ElementId) -> Vec<f64> {
        self.sections_containing(element).map(|s| s.flow_m3h).collect()
    }

    /// Largest flow among the sections containing `element`.
    pub fn max_flow_for(&self, element: ElementId) -> NetworkResult<f64> {
        self.flows_for(element)
            .into_iter()
            .reduce(f64::max)
            .ok_or(NetworkError::MissingSectionData { element })
    }

    pub fn is_on_critical_path(&self, element: ElementId) -> bool {
        self.critical_sections().any(|s| s.contains(element))
    }
}
