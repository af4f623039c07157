pub mod config;
pub mod post;
pub mod thread;

pub use config::*;
pub use post::*;
pub use thread::*;
