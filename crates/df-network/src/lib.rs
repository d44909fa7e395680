//! df-network: host adapter and network topology layer for ductflow.
//!
//! Provides:
//! - The host capability surface (`DuctHost`) and its raw element/connector types
//! - Connector descriptors with derived cross-section area
//! - The topology index: probed sections, critical path, flow lookup
//! - An in-memory host with an incremental, validating builder
//!
//! # Example
//!
//! ```
//! use df_core::{ElementId, Point, m3h, mm, m};
//! use df_network::{
//!     ConnectorRaw, ElementCategory, FlowDirection, HostElement, MemoryHostBuilder,
//!     SystemKind, TopologyIndex,
//! };
//!
//! let duct = ElementId::new(1).unwrap();
//! let mut builder = MemoryHostBuilder::new("П1", SystemKind::Supply);
//! builder.add_element(HostElement::new(duct, "Duct", ElementCategory::Duct).with_length(m(4.0)));
//! let round = |dir, at| ConnectorRaw::round(duct, mm(200.0), m3h(500.0), dir, at);
//! builder.add_connector(round(FlowDirection::In, Point::origin()));
//! builder.add_connector(round(FlowDirection::Out, Point::new(4.0, 0.0, 0.0)));
//! builder.add_section(1, m3h(500.0), [duct]);
//! builder.set_critical_path([1]);
//! let host = builder.build().unwrap();
//!
//! let topology = TopologyIndex::build(&host, 500).unwrap();
//! assert_eq!(topology.sections().len(), 1);
//! assert_eq!(topology.flows_for(duct).len(), 1);
//! ```

pub mod builder;
pub mod connector;
pub mod error;
pub mod host;
pub mod memory;
pub mod topology;
pub(crate) mod validate;

// Re-exports for ergonomics
pub use builder::MemoryHostBuilder;
pub use connector::{describe_connectors, ConnectorDescriptor, Profile};
pub use error::{NetworkError, NetworkResult};
pub use host::{
    ConnectorRaw, ConnectorShape, DuctHost, ElementCategory, FlowDirection, HostElement, PartType,
    SectionRaw, SystemKind,
};
pub use memory::MemoryHost;
pub use topology::{CriticalPath, NetworkSection, TopologyIndex};
