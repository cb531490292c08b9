//! fixgl engine crate.
//!
//! A fixed-function GL state machine reconciled onto an explicit, side-aware GPU
//! command interface. Client state lives in [`context::GlContext`]; every setter
//! re-runs the resolvers that depend on it and pushes the result through
//! [`hw::HwContext`].

pub mod logging;
pub mod coords;
pub mod gl;
pub mod hw;
pub mod resolve;
pub mod transform;
pub mod clear;
pub mod context;
pub mod device;
