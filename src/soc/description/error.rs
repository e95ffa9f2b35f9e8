use thiserror::Error;

/// Structural problems found while assembling a description tree.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DescriptionError {
    #[error("duplicate peripheral '{name}'")]
    DuplicatePeripheral { name: String },
    #[error("duplicate register '{name}' in peripheral '{peripheral}'")]
    DuplicateRegister { peripheral: String, name: String },
    #[error("duplicate field '{name}' in register '{register}'")]
    DuplicateField { register: String, name: String },
    #[error("register '{register}' has unsupported width of {width} bits")]
    InvalidRegisterWidth { register: String, width: u32 },
    #[error("field '{field}' in register '{register}' has zero width")]
    ZeroWidthField { register: String, field: String },
    #[error(
        "field '{field}' (offset {bit_offset}, width {bit_width}) exceeds {register_width}-bit register '{register}'"
    )]
    FieldOutOfRange {
        register: String,
        field: String,
        bit_offset: u32,
        bit_width: u32,
        register_width: u32,
    },
    #[error(
        "register '{register}' at offset 0x{offset:x} of peripheral '{peripheral}' (base 0x{base_address:x}) runs past the end of the address space"
    )]
    AddressOverflow {
        peripheral: String,
        register: String,
        base_address: u64,
        offset: u64,
    },
}
