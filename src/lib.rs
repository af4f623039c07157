//! Split prose into an ordered thread of length-bounded posts.
//!
//! The core is [`ops::splitter::split`]; threads built from its output are
//! edited through [`ops::thread_ops`] or held by an [`ops::session::ThreadSession`].

pub mod cli;
pub mod io;
pub mod logging;
pub mod model;
pub mod ops;
pub mod util;
