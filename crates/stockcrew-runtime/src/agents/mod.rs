//! Concrete agent implementations

pub mod simple;

pub use simple::{SimpleAgent, SimpleConfig};
