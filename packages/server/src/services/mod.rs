pub mod benchmark;
pub mod session;
pub mod user;

pub use benchmark::BenchmarkService;
pub use session::{SessionService, SessionUser};
pub use user::UserService;
