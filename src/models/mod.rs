pub mod api;
pub mod channel;

pub use api::*;
pub use channel::*;
