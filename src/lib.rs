//! Titanic survival predictor.
//!
//! A web form collects passenger attributes, encodes them into the nine
//! columns a pre-trained random forest expects, and shows the forest's
//! survival prediction.

pub mod config;
pub mod features;
pub mod model;
pub mod predict;
pub mod server;
pub mod telemetry;
