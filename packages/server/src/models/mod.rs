pub mod benchmark;
pub mod shared;
pub mod user;
