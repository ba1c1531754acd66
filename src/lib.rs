//! Container status monitor and changelog for a home SOC tool bundle.

pub mod cli;
pub mod config;
pub mod domain;
pub mod inbound;
pub mod notifications;
pub mod outbound;
