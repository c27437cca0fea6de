// dorank: launcher relevance search with learned usage bias

pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod formatter;
pub mod relevance;
pub mod scoring;
pub mod search;
pub mod store;
