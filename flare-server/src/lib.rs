mod registry;
mod relay;
mod room;

pub use registry::*;
pub use relay::*;
pub use room::*;
