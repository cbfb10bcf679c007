pub mod config;
pub mod device;
pub mod errors;
pub mod export;
pub mod history;
pub mod metrics;
pub mod model;
pub mod rest;
pub mod service;
pub mod stats;
