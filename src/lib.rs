//! Missing-persons registry API: public listings, admin information records,
//! photo uploads and canonical page redirects.

pub mod config;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
