#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Alpha Vantage client with windowed time series calculations.
//!
//! This crate re-exports the core types, the Alpha Vantage provider and the
//! window engine, and provides a [`Session`] that ties them together.

// Core types and traits
pub use alphav_core::*;

// Provider
pub use alphav_client::{AlphaVantageProvider, ClientConfig, parse};

// Window engine
pub use alphav_window::{
    Builtin, Calculations, WindowAverage, WindowChange, WindowFunction, WindowOptions,
    WindowPercentageChange, WindowVariance, WindowedElement, WindowedMeta, WindowedResult,
    compute, compute_by_name,
};
pub use tokio_util::sync::CancellationToken;

mod session;
pub use session::Session;
