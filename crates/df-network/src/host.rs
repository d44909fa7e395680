//! The host application's capability surface.
//!
//! Everything here is expressed in the host's internal units (feet, ft³/s,
//! kg/(ft·s²), radians). Conversion happens once, when connectors are
//! described (see [`crate::connector`]).

use df_core::units::host;
use df_core::{Angle, ElementId, Length, Point, SectionNumber, VolumeRate};

/// Kind of duct system. Decides which way the critical path is walked and
/// how raw connector directions map onto flow input/output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SystemKind {
    Supply,
    Return,
    Exhaust,
}

impl SystemKind {
    pub fn is_supply(self) -> bool {
        matches!(self, SystemKind::Supply)
    }

    /// Raw connector direction that marks a flow input on this system.
    ///
    /// The host reports directions in supply sense; return and exhaust
    /// networks carry air the other way.
    pub fn inflow_direction(self) -> FlowDirection {
        if self.is_supply() {
            FlowDirection::In
        } else {
            FlowDirection::Out
        }
    }
}

/// Connector cross-section shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectorShape {
    Round,
    Rectangular,
    Oval,
}

/// Raw flow direction attribute of a connector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlowDirection {
    In,
    Out,
    Bidirectional,
}

impl FlowDirection {
    pub fn opposite(self) -> Self {
        match self {
            FlowDirection::In => FlowDirection::Out,
            FlowDirection::Out => FlowDirection::In,
            FlowDirection::Bidirectional => FlowDirection::Bidirectional,
        }
    }
}

/// Element category as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementCategory {
    Terminal,
    FlexDuct,
    Duct,
    Fitting,
    Accessory,
    Equipment,
    Other,
}

impl ElementCategory {
    /// Order of elements inside one section of the report.
    pub fn report_priority(self) -> u8 {
        match self {
            ElementCategory::Terminal => 0,
            ElementCategory::FlexDuct => 1,
            ElementCategory::Duct => 2,
            ElementCategory::Fitting => 3,
            ElementCategory::Accessory | ElementCategory::Equipment | ElementCategory::Other => 4,
        }
    }

    pub fn is_straight(self) -> bool {
        matches!(self, ElementCategory::Duct | ElementCategory::FlexDuct)
    }
}

/// Host part type tag of a fitting. Only used to drop caps and unions;
/// classification itself works from connector geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PartType {
    #[default]
    Undefined,
    Elbow,
    Transition,
    Tee,
    Cross,
    Tap,
    Union,
    Cap,
    Other,
}

impl PartType {
    /// Fittings that contribute nothing observable to the pressure budget.
    pub fn is_passive(self) -> bool {
        matches!(self, PartType::Union | PartType::Cap)
    }
}

/// A connector as the host reports it.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectorRaw {
    pub owner: ElementId,
    pub shape: ConnectorShape,
    /// Radius for round connectors, internal length.
    pub radius: f64,
    /// Width for rectangular/oval connectors, internal length.
    pub width: f64,
    /// Height for rectangular/oval connectors, internal length.
    pub height: f64,
    /// Fitting angle, radians.
    pub angle: f64,
    /// Volume flow magnitude, internal flow.
    pub flow: f64,
    pub direction: FlowDirection,
    /// Connector origin, internal length.
    pub origin: Point,
    /// Element on the other side of this connector, if resolvable.
    pub connected: Option<ElementId>,
}

impl ConnectorRaw {
    /// Round connector from SI quantities. `origin` is in meters.
    pub fn round(
        owner: ElementId,
        diameter: Length,
        flow: VolumeRate,
        direction: FlowDirection,
        origin: Point,
    ) -> Self {
        Self {
            owner,
            shape: ConnectorShape::Round,
            radius: host::length_to_internal(diameter) / 2.0,
            width: 0.0,
            height: 0.0,
            angle: 0.0,
            flow: host::flow_to_internal(flow),
            direction,
            origin: point_to_internal(origin),
            connected: None,
        }
    }

    /// Rectangular connector from SI quantities. `origin` is in meters.
    pub fn rectangular(
        owner: ElementId,
        width: Length,
        height: Length,
        flow: VolumeRate,
        direction: FlowDirection,
        origin: Point,
    ) -> Self {
        Self {
            owner,
            shape: ConnectorShape::Rectangular,
            radius: 0.0,
            width: host::length_to_internal(width),
            height: host::length_to_internal(height),
            angle: 0.0,
            flow: host::flow_to_internal(flow),
            direction,
            origin: point_to_internal(origin),
            connected: None,
        }
    }

    pub fn with_shape(mut self, shape: ConnectorShape) -> Self {
        self.shape = shape;
        self
    }

    pub fn with_angle(mut self, angle: Angle) -> Self {
        self.angle = host::angle_to_internal(angle);
        self
    }

    pub fn connected_to(mut self, other: ElementId) -> Self {
        self.connected = Some(other);
        self
    }
}

/// A model element as the host reports it.
#[derive(Debug, Clone, PartialEq)]
pub struct HostElement {
    pub id: ElementId,
    pub name: String,
    pub category: ElementCategory,
    pub part_type: PartType,
    /// Insertion point, internal length.
    pub location: Point,
    /// Segment length for straight elements, internal length.
    pub length: Option<f64>,
    /// Explicit bend radius of an elbow, internal length.
    pub bend_radius: Option<f64>,
    /// Host-provided loss coefficient for accessories, equipment and terminals.
    pub local_coefficient: Option<f64>,
    /// Element is held by another user and must not be written to.
    pub unavailable: bool,
}

impl HostElement {
    pub fn new(id: ElementId, name: impl Into<String>, category: ElementCategory) -> Self {
        Self {
            id,
            name: name.into(),
            category,
            part_type: PartType::Undefined,
            location: Point::origin(),
            length: None,
            bend_radius: None,
            local_coefficient: None,
            unavailable: false,
        }
    }

    pub fn with_part_type(mut self, part_type: PartType) -> Self {
        self.part_type = part_type;
        self
    }

    /// Insertion point in meters.
    pub fn at(mut self, location: Point) -> Self {
        self.location = point_to_internal(location);
        self
    }

    pub fn with_length(mut self, length: Length) -> Self {
        self.length = Some(host::length_to_internal(length));
        self
    }

    pub fn with_bend_radius(mut self, radius: Length) -> Self {
        self.bend_radius = Some(host::length_to_internal(radius));
        self
    }

    pub fn with_local_coefficient(mut self, coefficient: f64) -> Self {
        self.local_coefficient = Some(coefficient);
        self
    }

    pub fn unavailable(mut self) -> Self {
        self.unavailable = true;
        self
    }

    /// Insertion point in meters.
    pub fn location_m(&self) -> Point {
        point_from_internal(&self.location)
    }

    pub fn length_m(&self) -> Option<f64> {
        self.length.map(|l| host::length(l).value)
    }

    pub fn bend_radius_m(&self) -> Option<f64> {
        self.bend_radius.map(|r| host::length(r).value)
    }
}

/// A network section as the host reports it.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionRaw {
    pub number: SectionNumber,
    /// Section flow, internal flow.
    pub flow: f64,
    pub element_ids: Vec<ElementId>,
}

/// Host capability surface consumed by the calculation core.
///
/// Queries return `None` where the host signals absence (including the
/// host failing the call), never panic.
pub trait DuctHost {
    /// Display name of the selected system.
    fn system_name(&self) -> &str;

    fn system_kind(&self) -> SystemKind;

    fn element(&self, id: ElementId) -> Option<HostElement>;

    /// All connectors of an element, in host order.
    fn connectors(&self, id: ElementId) -> Vec<ConnectorRaw>;

    /// Critical path section numbers in host order (terminal → source).
    fn critical_path_section_numbers(&self) -> Vec<SectionNumber>;

    /// Section at a 0-based probe index.
    fn section_by_index(&self, index: usize) -> Option<SectionRaw>;

    fn section_by_number(&self, number: SectionNumber) -> Option<SectionRaw>;

    /// Pressure drop of one element within a section, internal pressure.
    fn section_pressure_drop(&self, number: SectionNumber, element: ElementId) -> Option<f64>;
}

pub(crate) fn point_to_internal(p: Point) -> Point {
    p.map(|c| host::length_to_internal(df_core::m(c)))
}

pub(crate) fn point_from_internal(p: &Point) -> Point {
    p.map(|c| host::length(c).value)
}
