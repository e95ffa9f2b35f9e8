//! Immutable Device → Peripheral → Register → Field records built once per loaded
//! description. Lookup helpers live next to the data so callers never touch the
//! indices directly.

use ahash::AHashMap;
use smallvec::SmallVec;

use crate::soc::codec::bits::mask_bits;

/// Root of a loaded hardware description.
#[derive(Clone, Debug)]
pub struct Device {
    pub(super) name: String,
    pub(super) peripherals: Vec<Peripheral>,
    /// Upper-cased peripheral name -> position in `peripherals`.
    pub(super) index: AHashMap<String, usize>,
}

impl Device {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn peripherals(&self) -> &[Peripheral] {
        &self.peripherals
    }

    /// Case-insensitive peripheral lookup.
    pub fn peripheral(&self, name: &str) -> Option<&Peripheral> {
        self.index
            .get(&name.to_ascii_uppercase())
            .map(|&idx| &self.peripherals[idx])
    }
}

#[derive(Clone, Debug)]
pub struct Peripheral {
    pub(super) name: String,
    pub(super) base_address: u64,
    pub(super) registers: Vec<Register>,
}

impl Peripheral {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base_address(&self) -> u64 {
        self.base_address
    }

    pub fn registers(&self) -> &[Register] {
        &self.registers
    }

    /// Exact, case-sensitive register lookup.
    pub fn register(&self, name: &str) -> Option<&Register> {
        self.registers.iter().find(|reg| reg.name == name)
    }

    /// Absolute address of `register` inside this peripheral. The builder guarantees
    /// every register of the peripheral fits below `u64::MAX`.
    pub fn address_of(&self, register: &Register) -> u64 {
        self.base_address + register.offset
    }

    /// Width of the longest register name, used to align listings.
    pub fn name_width(&self) -> usize {
        self.registers
            .iter()
            .map(|reg| reg.name.len())
            .max()
            .unwrap_or(0)
    }
}

#[derive(Clone, Debug)]
pub struct Register {
    pub(super) name: String,
    pub(super) offset: u64,
    pub(super) bit_width: u8,
    pub(super) fields: SmallVec<[Field; 8]>,
}

impl Register {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Byte offset from the owning peripheral's base address.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn bit_width(&self) -> u8 {
        self.bit_width
    }

    pub fn byte_len(&self) -> usize {
        usize::from(self.bit_width / 8)
    }

    /// Mask covering every bit the register can hold.
    pub fn width_mask(&self) -> u64 {
        mask_bits(u32::from(self.bit_width))
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Exact, case-sensitive field lookup.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name == name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Field {
    pub(super) name: String,
    pub(super) bit_offset: u8,
    pub(super) bit_width: u8,
}

impl Field {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// LSB position inside the register.
    pub fn bit_offset(&self) -> u8 {
        self.bit_offset
    }

    pub fn bit_width(&self) -> u8 {
        self.bit_width
    }

    /// Mask of the field's value before it is shifted into place.
    pub fn value_mask(&self) -> u64 {
        mask_bits(u32::from(self.bit_width))
    }

    /// Mask of the bits the field occupies inside the register.
    pub fn mask(&self) -> u64 {
        self.value_mask() << self.bit_offset
    }
}
