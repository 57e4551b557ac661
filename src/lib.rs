pub mod broker;
pub mod codec;
pub mod constants;
pub mod error;
pub mod rpc;
pub mod utils;

pub use error::{ConeyError, ConeyErrorKind};
