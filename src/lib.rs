pub mod auth;
pub mod bidding;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod model;
pub mod product;
pub mod query;
pub mod store;
