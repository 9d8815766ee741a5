//! Storage layer behind traits so a persistent backend can replace the
//! in-memory one

pub mod task_repo;
pub mod user_repo;

pub use task_repo::*;
pub use user_repo::*;
