pub mod dispatcher;

pub use dispatcher::{PoolDispatcher, DEFAULT_MAX_FORWARD_DEPTH};
