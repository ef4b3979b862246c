//! Energy Transition Explorer
//!
//! Loads the global power plant database and a climate-opinion survey,
//! cleans and enriches the plants, and builds the dashboard views.

pub mod charts;
pub mod config;
pub mod data;
pub mod gui;
pub mod logging;
pub mod pipeline;
pub mod views;
