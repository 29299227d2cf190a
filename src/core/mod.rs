//! Core, platform independent boot selection logic.

pub mod config;
pub mod dev;
pub mod repr;
pub mod service;
pub mod table;
