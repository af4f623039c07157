pub mod collaborators;
pub mod session;
pub mod splitter;
pub mod thread_ops;
