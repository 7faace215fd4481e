pub mod api;
pub mod config;
pub mod iputil;
pub mod models;
pub mod service;
pub mod storage;
