//! HTTP API handlers for licscan-ui

pub mod analysis;
pub mod buildinfo;
pub mod health;
pub mod pages;
pub mod sse;
pub mod ui;

pub use analysis::{get_analysis, select_file, start_analysis};
pub use buildinfo::get_build_info;
pub use health::health_routes;
pub use pages::{index_page, login_page, login_submit, logout, register_page, register_submit};
pub use sse::analysis_events;
pub use ui::static_routes;
