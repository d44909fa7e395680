//! Host data validation logic.

use std::collections::{BTreeMap, HashSet};

use df_core::{ElementId, SectionNumber};

use crate::error::{NetworkError, NetworkResult};
use crate::host::{ConnectorRaw, HostElement, SectionRaw};

/// Element ids must be unique.
pub(crate) fn validate_elements(elements: &[HostElement]) -> NetworkResult<()> {
    let mut seen = HashSet::with_capacity(elements.len());
    for element in elements {
        if !seen.insert(element.id) {
            return Err(NetworkError::DuplicateElement {
                element: element.id,
            });
        }
    }
    Ok(())
}

/// Every connector must belong to, and point at, existing elements.
pub(crate) fn validate_connectors(
    elements: &BTreeMap<ElementId, HostElement>,
    connectors: &[ConnectorRaw],
) -> NetworkResult<()> {
    for connector in connectors {
        if !elements.contains_key(&connector.owner) {
            return Err(NetworkError::UnknownElement {
                element: connector.owner,
            });
        }
        if let Some(target) = connector.connected {
            if !elements.contains_key(&target) {
                return Err(NetworkError::InvalidConnection {
                    element: connector.owner,
                    target,
                });
            }
        }
    }
    Ok(())
}

/// Sections must be unique by number and list existing elements; the critical
/// path must only name known sections.
pub(crate) fn validate_sections(
    elements: &BTreeMap<ElementId, HostElement>,
    sections: &[SectionRaw],
    critical_path: &[SectionNumber],
) -> NetworkResult<()> {
    let mut numbers = HashSet::with_capacity(sections.len());
    for section in sections {
        if !numbers.insert(section.number) {
            return Err(NetworkError::DuplicateSection {
                number: section.number,
            });
        }
        for &element in &section.element_ids {
            if !elements.contains_key(&element) {
                return Err(NetworkError::InvalidSectionMember {
                    number: section.number,
                    element,
                });
            }
        }
    }

    for &number in critical_path {
        if !numbers.contains(&number) {
            return Err(NetworkError::MissingSection { number });
        }
    }

    Ok(())
}
