pub mod play;
pub mod ticker;

pub use play::{PlayMode, PlayOptions};
pub use ticker::TickSource;
