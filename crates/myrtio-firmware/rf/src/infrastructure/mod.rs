//! Infrastructure layer
//!
//! Hardware and network adapters around the `myrtio-rf` pipeline.

pub(crate) mod config;
pub(crate) mod drivers;
pub(crate) mod tasks;
