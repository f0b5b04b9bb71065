//! Train a decision-tree regressor on an uploaded table and evaluate it.
//!
//! The library holds everything that does not draw: loading and cleaning
//! ([`data`]), the prediction pipeline ([`pipeline`]), the session state the
//! window renders ([`state`]), report export ([`report`]) and the heatmap
//! colours ([`color`]).

pub mod color;
pub mod config;
pub mod data;
pub mod pipeline;
pub mod report;
pub mod state;
