//! Request construction and execution.
mod builder;
mod executor;
mod random;


pub use builder::{INVALID_PATH_SUFFIX, PreparedRequest, build_request};
pub use executor::{ExecutorSettings, RequestExecutor, RequestFailure, ReqwestExecutor};
pub use random::{RandomSource, RngSeed, SeededRandom};
