//! Mobile phone listings pipeline: load → clean → analyze → persist → chart.

pub mod analysis;
pub mod app;
pub mod chart;
pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod pipeline;
pub mod state;
pub mod ui;
