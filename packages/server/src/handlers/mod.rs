pub mod auth;
pub mod benchmark;
pub mod user;
