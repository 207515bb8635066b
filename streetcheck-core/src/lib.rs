//! Core types and service wiring for the streetcheck address matcher.

/// Domain models shared by the matcher and its stores.
pub mod model;
/// Street-line extraction and key normalization.
pub mod normalize;
/// Selectable matching policy stages.
pub mod policy;
/// Traits describing the address store interface.
pub mod ports;
/// Matcher service used by transports.
pub mod service;

pub use model::*;
pub use normalize::*;
pub use policy::*;
pub use ports::*;
pub use service::*;
