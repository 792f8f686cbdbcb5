mod engine;
mod media;
mod negotiation;

pub use engine::*;
pub use media::*;
pub use negotiation::*;
