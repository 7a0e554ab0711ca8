//! Narracap Core Type Definitions
//!
//! Fundamental type aliases shared across the engine.

/// Time in seconds (floating point)
pub type TimeSec = f64;

/// Zero-based index of a section within a request
pub type SectionIndex = usize;

/// Request unique identifier (ULID)
pub type RequestId = String;
