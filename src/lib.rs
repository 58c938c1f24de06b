//! Mos Insights: read-only revenue, growth and churn KPIs over a static
//! sales table, served as JSON over HTTP.

pub mod cli;
pub mod config;
pub mod logging;
pub mod parsers;
pub mod server;
pub mod services;
pub mod types;
