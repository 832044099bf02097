#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Named sets of window functions.
pub mod calculations;
/// The calculation engine.
pub mod engine;
/// Window function trait and built-ins.
pub mod function;
/// Calculation options.
pub mod options;
/// Calculation output.
pub mod result;

#[cfg(test)]
mod test_support;

pub use calculations::Calculations;
pub use engine::{compute, compute_by_name};
pub use function::{
    Builtin, WindowAverage, WindowChange, WindowFunction, WindowPercentageChange, WindowVariance,
};
pub use options::WindowOptions;
pub use result::{WindowedElement, WindowedMeta, WindowedResult};
