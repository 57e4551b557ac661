mod client_interface;
pub use client_interface::*;

mod rpc_method;
pub use rpc_method::*;

mod call_rpc_method;
pub use call_rpc_method::*;

mod handler_registrar;
pub use handler_registrar::*;
