//! Connector descriptors: raw host connectors converted to SI with a derived
//! cross-section area.

use df_core::units::{host, to_degrees, to_m3h, to_mm};
use df_core::{Area, ElementId, Length, Point};
use tracing::trace;

use crate::error::{NetworkError, NetworkResult};
use crate::host::{point_from_internal, ConnectorRaw, ConnectorShape, DuctHost, FlowDirection};

/// Cross-section profile of a connector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Profile {
    Round { diameter: Length },
    Rectangular { width: Length, height: Length },
}

/// A connector in SI units with its derived area.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectorDescriptor {
    /// Position among the owning element's connectors.
    pub index: usize,
    pub owner: ElementId,
    pub connected: Option<ElementId>,
    pub profile: Profile,
    /// Always positive, consistent with `profile`.
    pub area: Area,
    /// Volume flow magnitude, m³/h.
    pub flow_m3h: f64,
    pub direction: FlowDirection,
    pub angle_deg: f64,
    /// Connector origin, meters.
    pub origin: Point,
}

impl ConnectorDescriptor {
    /// Describe a raw connector. Oval connectors have no area formula and fail.
    pub fn from_raw(raw: &ConnectorRaw, index: usize) -> NetworkResult<Self> {
        let profile = match raw.shape {
            ConnectorShape::Round => Profile::Round {
                diameter: host::length(2.0 * raw.radius),
            },
            ConnectorShape::Rectangular => Profile::Rectangular {
                width: host::length(raw.width),
                height: host::length(raw.height),
            },
            ConnectorShape::Oval => {
                return Err(NetworkError::UnsupportedGeometry {
                    element: raw.owner,
                    reason: "oval connectors are not supported",
                });
            }
        };

        let area: Area = match profile {
            Profile::Round { diameter } => {
                let r = diameter / 2.0;
                r * r * std::f64::consts::PI
            }
            Profile::Rectangular { width, height } => width * height,
        };

        if !(area.value.is_finite() && area.value > 0.0) {
            return Err(NetworkError::UnsupportedGeometry {
                element: raw.owner,
                reason: "connector has a non-positive cross-section",
            });
        }

        Ok(Self {
            index,
            owner: raw.owner,
            connected: raw.connected,
            profile,
            area,
            flow_m3h: to_m3h(host::flow(raw.flow)).abs(),
            direction: raw.direction,
            angle_deg: to_degrees(host::angle(raw.angle)),
            origin: point_from_internal(&raw.origin),
        })
    }

    pub fn area_m2(&self) -> f64 {
        self.area.value
    }

    pub fn is_round(&self) -> bool {
        matches!(self.profile, Profile::Round { .. })
    }

    /// Diameter for round sections, `2·w·h/(w+h)` for rectangular ones, meters.
    pub fn equivalent_diameter_m(&self) -> f64 {
        match self.profile {
            Profile::Round { diameter } => diameter.value,
            Profile::Rectangular { width, height } => {
                2.0 * width.value * height.value / (width.value + height.value)
            }
        }
    }

    /// Short size label in millimeters: `ø200` or `400x200`.
    pub fn size_label(&self) -> String {
        match self.profile {
            Profile::Round { diameter } => format!("ø{:.0}", to_mm(diameter)),
            Profile::Rectangular { width, height } => {
                format!("{:.0}x{:.0}", to_mm(width), to_mm(height))
            }
        }
    }
}

/// Describe every connector of an element, in host order.
pub fn describe_connectors(
    host: &dyn DuctHost,
    element: ElementId,
) -> NetworkResult<Vec<ConnectorDescriptor>> {
    let raw = host.connectors(element);
    trace!(%element, count = raw.len(), "describing connectors");
    raw.iter()
        .enumerate()
        .map(|(i, c)| ConnectorDescriptor::from_raw(c, i))
        .collect()
}
