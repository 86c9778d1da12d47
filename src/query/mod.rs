//! Query assembly: WHERE-clause construction and the two fixed projections

mod assembler;
mod preview;

#[cfg(test)]
mod property_tests;

pub use assembler::*;
pub use preview::*;
