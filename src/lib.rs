pub mod binance;
pub mod cli;
pub mod config;
pub mod error;
pub mod evaluation;
pub mod forecast;
pub mod instrument;
pub mod logging;
pub mod model;
pub mod service;
pub mod source;
