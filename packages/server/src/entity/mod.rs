pub mod benchmark;
pub mod session;
pub mod user;
