pub mod handler;
pub mod router;

pub use handler::{InputHandler, KeyAction};
pub use router::{InputRouter, Intent, RawInput, Swipe};
