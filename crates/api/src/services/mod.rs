//! Business logic that spans more than one resource.

pub mod evaluation;
