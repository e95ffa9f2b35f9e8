pub mod codec;
pub mod description;
pub mod error;
pub mod format;
pub mod resolver;
pub mod session;
pub mod target;
