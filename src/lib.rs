pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod docs;
pub mod error;
pub mod export;
pub mod ids;
pub mod model;
pub mod notify;
pub mod routes;
pub mod store;
pub mod utils;
pub mod validation;
pub mod workflow;
