//! Flow input/output resolution.
//!
//! The host has no "this is where the air comes in" attribute, so it is
//! inferred: first from the critical path, then from raw connector directions.

use df_core::ElementId;
use df_network::{ConnectorDescriptor, FlowDirection, SystemKind, TopologyIndex};
use tracing::debug;

use crate::error::{FittingError, FittingResult};

/// Positions (into the element's connectors) of the flow input and output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowEnds {
    pub input: usize,
    pub output: usize,
}

/// Straight duct: the connector with the larger flow is the input on supply
/// systems, the output on return/exhaust systems.
pub fn duct_flow_ends(
    element: ElementId,
    kind: SystemKind,
    connectors: &[ConnectorDescriptor],
) -> FittingResult<FlowEnds> {
    let max = connectors
        .iter()
        .max_by(|a, b| a.flow_m3h.total_cmp(&b.flow_m3h))
        .map(|c| c.index);
    let min = connectors
        .iter()
        .min_by(|a, b| a.flow_m3h.total_cmp(&b.flow_m3h))
        .map(|c| c.index);

    match (max, min) {
        (Some(max), Some(min)) if max != min => Ok(if kind.is_supply() {
            FlowEnds {
                input: max,
                output: min,
            }
        } else {
            FlowEnds {
                input: min,
                output: max,
            }
        }),
        _ => Err(FittingError::UnresolvedFlowDirection { element }),
    }
}

/// Fitting: walk the critical path in flow order and take the first two
/// connectors whose neighbours appear on it; fall back to raw directions for
/// whatever the walk leaves open.
pub fn fitting_flow_ends(
    element: ElementId,
    topology: &TopologyIndex,
    connectors: &[ConnectorDescriptor],
) -> FittingResult<FlowEnds> {
    let inflow = topology.system_kind().inflow_direction();
    let mut input: Option<usize> = None;
    let mut output: Option<usize> = None;

    for section in topology.critical_sections() {
        let mut candidates: Vec<&ConnectorDescriptor> = connectors
            .iter()
            .filter(|c| Some(c.index) != input && Some(c.index) != output)
            .filter(|c| c.connected.is_some_and(|n| section.contains(n)))
            .collect();
        // Inward connectors first; the sort is stable for the rest.
        candidates.sort_by_key(|c| c.direction != inflow);

        for c in candidates {
            if input.is_none() {
                input = Some(c.index);
            } else if output.is_none() {
                output = Some(c.index);
            }
        }
        if input.is_some() && output.is_some() {
            break;
        }
    }

    if let (Some(input), Some(output)) = (input, output) {
        return Ok(FlowEnds { input, output });
    }

    debug!(%element, "fitting not resolved on the critical path, using connector directions");
    let input = match input {
        Some(i) => i,
        None => pick_by_direction(connectors, inflow, &[output])
            .ok_or(FittingError::UnresolvedFlowDirection { element })?,
    };
    let output = match output {
        Some(o) => o,
        None => pick_by_direction(connectors, inflow.opposite(), &[Some(input)])
            .ok_or(FittingError::UnresolvedFlowDirection { element })?,
    };

    if input == output {
        return Err(FittingError::UnresolvedFlowDirection { element });
    }
    Ok(FlowEnds { input, output })
}

/// Largest-flow connector with the wanted raw direction; bidirectional
/// connectors qualify only when none has it.
fn pick_by_direction(
    connectors: &[ConnectorDescriptor],
    wanted: FlowDirection,
    taken: &[Option<usize>],
) -> Option<usize> {
    let free = |c: &&ConnectorDescriptor| !taken.contains(&Some(c.index));
    let largest = |dir: FlowDirection| {
        connectors
            .iter()
            .filter(free)
            .filter(|c| c.direction == dir)
            .max_by(|a, b| a.flow_m3h.total_cmp(&b.flow_m3h))
            .map(|c| c.index)
    };
    largest(wanted).or_else(|| largest(FlowDirection::Bidirectional))
}
