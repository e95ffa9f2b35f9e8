#[path = "target.rs"]
mod target_trait;
pub mod detached;
pub mod endianness;
pub mod endianword;
pub mod error;
pub mod ram;

pub use detached::DetachedTarget;
pub use endianness::Endianness;
pub use endianword::{word_from_bytes, word_to_bytes};
pub use error::{TargetError, TargetResult};
pub use ram::RamTarget;
pub use target_trait::Target;
