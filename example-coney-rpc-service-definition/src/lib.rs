//! Method definitions shared by the example server and client.

mod add;
pub use add::*;

mod divide;
pub use divide::*;

mod echo;
pub use echo::*;
