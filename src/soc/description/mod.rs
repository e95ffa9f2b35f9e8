//! Typed hardware description: the Device/Peripheral/Register/Field tree and the
//! builders that validate it.

pub mod builder;
pub mod error;
pub mod tree;

pub use builder::{DEFAULT_REGISTER_WIDTH, DeviceBuilder, PeripheralBuilder, RegisterBuilder};
pub use error::DescriptionError;
pub use tree::{Device, Field, Peripheral, Register};
