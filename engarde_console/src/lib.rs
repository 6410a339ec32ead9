mod command;
mod recording;
mod session;
pub use command::*;
pub use recording::*;
pub use session::*;
