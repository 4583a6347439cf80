//! Infrastructure layer - backends, security and services

pub mod auth;
pub mod cache;
pub mod logging;
pub mod services;
pub mod storage;
pub mod user;
