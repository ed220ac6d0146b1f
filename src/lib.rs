pub mod api;
pub mod config;
pub mod form;
pub mod http_client;
pub mod model;
pub mod provider;
pub mod state;
pub mod telemetry;
pub mod view;
