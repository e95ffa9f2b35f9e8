//! Fluent builders that validate a description before it becomes an immutable
//! [`Device`]. Nothing is visible to the session until `finish` succeeds.

use ahash::{AHashMap, AHashSet};
use smallvec::SmallVec;

use super::error::DescriptionError;
use super::tree::{Device, Field, Peripheral, Register};

pub const DEFAULT_REGISTER_WIDTH: u32 = 32;

pub struct DeviceBuilder {
    name: String,
    peripherals: Vec<PeripheralBuilder>,
}

impl DeviceBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            peripherals: Vec::new(),
        }
    }

    pub fn peripheral(mut self, peripheral: PeripheralBuilder) -> Self {
        self.peripherals.push(peripheral);
        self
    }

    pub fn push_peripheral(&mut self, peripheral: PeripheralBuilder) -> &mut Self {
        self.peripherals.push(peripheral);
        self
    }

    pub fn finish(self) -> Result<Device, DescriptionError> {
        let mut peripherals = Vec::with_capacity(self.peripherals.len());
        let mut index = AHashMap::with_capacity(self.peripherals.len());
        for builder in self.peripherals {
            let peripheral = builder.finish()?;
            let key = peripheral.name.to_ascii_uppercase();
            if index.contains_key(&key) {
                return Err(DescriptionError::DuplicatePeripheral {
                    name: peripheral.name,
                });
            }
            index.insert(key, peripherals.len());
            peripherals.push(peripheral);
        }
        Ok(Device {
            name: self.name,
            peripherals,
            index,
        })
    }
}

#[derive(Clone)]
pub struct PeripheralBuilder {
    name: String,
    base_address: u64,
    registers: Vec<RegisterBuilder>,
}

impl PeripheralBuilder {
    pub fn new(name: impl Into<String>, base_address: u64) -> Self {
        Self {
            name: name.into(),
            base_address,
            registers: Vec::new(),
        }
    }

    pub fn register(mut self, register: RegisterBuilder) -> Self {
        self.registers.push(register);
        self
    }

    pub fn push_register(&mut self, register: RegisterBuilder) -> &mut Self {
        self.registers.push(register);
        self
    }

    fn finish(self) -> Result<Peripheral, DescriptionError> {
        let mut seen = AHashSet::with_capacity(self.registers.len());
        let mut registers = Vec::with_capacity(self.registers.len());
        for builder in self.registers {
            let register = builder.finish()?;
            let last_byte = self
                .base_address
                .checked_add(register.offset)
                .and_then(|start| start.checked_add(register.byte_len() as u64 - 1));
            if last_byte.is_none() {
                return Err(DescriptionError::AddressOverflow {
                    peripheral: self.name,
                    register: register.name,
                    base_address: self.base_address,
                    offset: register.offset,
                });
            }
            if !seen.insert(register.name.clone()) {
                return Err(DescriptionError::DuplicateRegister {
                    peripheral: self.name,
                    name: register.name,
                });
            }
            registers.push(register);
        }
        Ok(Peripheral {
            name: self.name,
            base_address: self.base_address,
            registers,
        })
    }
}

#[derive(Clone)]
pub struct RegisterBuilder {
    name: String,
    offset: u64,
    bit_width: u32,
    fields: SmallVec<[(String, u32, u32); 8]>,
}

impl RegisterBuilder {
    /// Creates a register with the default 32-bit width.
    pub fn new(name: impl Into<String>, offset: u64) -> Self {
        Self {
            name: name.into(),
            offset,
            bit_width: DEFAULT_REGISTER_WIDTH,
            fields: SmallVec::new(),
        }
    }

    pub fn width(mut self, bit_width: u32) -> Self {
        self.bit_width = bit_width;
        self
    }

    /// Adds a field covering `bit_width` bits starting at LSB `bit_offset`.
    pub fn field(mut self, name: impl Into<String>, bit_offset: u32, bit_width: u32) -> Self {
        self.fields.push((name.into(), bit_offset, bit_width));
        self
    }

    pub fn push_field(
        &mut self,
        name: impl Into<String>,
        bit_offset: u32,
        bit_width: u32,
    ) -> &mut Self {
        self.fields.push((name.into(), bit_offset, bit_width));
        self
    }

    fn finish(self) -> Result<Register, DescriptionError> {
        let width = self.bit_width;
        if width == 0 || width > 64 || width % 8 != 0 {
            return Err(DescriptionError::InvalidRegisterWidth {
                register: self.name,
                width,
            });
        }
        let mut fields: SmallVec<[Field; 8]> = SmallVec::with_capacity(self.fields.len());
        for (name, bit_offset, bit_width) in self.fields {
            if bit_width == 0 {
                return Err(DescriptionError::ZeroWidthField {
                    register: self.name,
                    field: name,
                });
            }
            let end = u64::from(bit_offset) + u64::from(bit_width);
            if end > u64::from(width) {
                return Err(DescriptionError::FieldOutOfRange {
                    register: self.name,
                    field: name,
                    bit_offset,
                    bit_width,
                    register_width: width,
                });
            }
            if fields.iter().any(|field| field.name == name) {
                return Err(DescriptionError::DuplicateField {
                    register: self.name,
                    name,
                });
            }
            // Both values are bounded by `width <= 64` at this point.
            fields.push(Field {
                name,
                bit_offset: bit_offset as u8,
                bit_width: bit_width as u8,
            });
        }
        Ok(Register {
            name: self.name,
            offset: self.offset,
            bit_width: width as u8,
            fields,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usart() -> PeripheralBuilder {
        PeripheralBuilder::new("USART1", 0x4001_3800).register(
            RegisterBuilder::new("BRR", 0x08)
                .field("DIV_Fraction", 0, 4)
                .field("DIV_Mantissa", 4, 12),
        )
    }

    #[test]
    fn builds_ordered_tree() {
        let device = DeviceBuilder::new("STM32F103xx")
            .peripheral(usart())
            .peripheral(PeripheralBuilder::new("GPIOA", 0x4001_0800))
            .finish()
            .expect("valid description");
        assert_eq!(device.name(), "STM32F103xx");
        let names: Vec<_> = device.peripherals().iter().map(|p| p.name()).collect();
        assert_eq!(names, ["USART1", "GPIOA"], "declaration order must be kept");
        let brr = device.peripheral("usart1").and_then(|p| p.register("BRR"));
        let brr = brr.expect("case-insensitive peripheral lookup");
        assert_eq!(brr.bit_width(), 32, "default register width");
        assert_eq!(brr.byte_len(), 4);
        assert_eq!(brr.fields()[1].mask(), 0xFFF0);
    }

    #[test]
    fn rejects_case_insensitive_duplicate_peripherals() {
        let err = DeviceBuilder::new("dev")
            .peripheral(PeripheralBuilder::new("Timer", 0))
            .peripheral(PeripheralBuilder::new("TIMER", 0x400))
            .finish()
            .unwrap_err();
        assert!(matches!(err, DescriptionError::DuplicatePeripheral { .. }));
    }

    #[test]
    fn rejects_field_past_register_width() {
        let err = DeviceBuilder::new("dev")
            .peripheral(PeripheralBuilder::new("P", 0).register(
                RegisterBuilder::new("R", 0).width(16).field("WIDE", 12, 8),
            ))
            .finish()
            .unwrap_err();
        assert!(
            matches!(err, DescriptionError::FieldOutOfRange { register_width: 16, .. }),
            "field must fit inside the register, got {err:?}"
        );
    }

    #[test]
    fn rejects_widths_that_are_not_whole_bytes() {
        for width in [0, 12, 72] {
            let err = DeviceBuilder::new("dev")
                .peripheral(PeripheralBuilder::new("P", 0).register(RegisterBuilder::new("R", 0).width(width)))
                .finish()
                .unwrap_err();
            assert!(matches!(err, DescriptionError::InvalidRegisterWidth { .. }), "width {width}");
        }
    }

    #[test]
    fn rejects_zero_width_and_duplicate_fields() {
        let zero = DeviceBuilder::new("dev")
            .peripheral(PeripheralBuilder::new("P", 0).register(RegisterBuilder::new("R", 0).field("Z", 0, 0)))
            .finish()
            .unwrap_err();
        assert!(matches!(zero, DescriptionError::ZeroWidthField { .. }));

        let dup = DeviceBuilder::new("dev")
            .peripheral(PeripheralBuilder::new("P", 0).register(
                RegisterBuilder::new("R", 0).field("EN", 0, 1).field("EN", 1, 1),
            ))
            .finish()
            .unwrap_err();
        assert!(matches!(dup, DescriptionError::DuplicateField { .. }));
    }

    #[test]
    fn rejects_registers_past_the_address_space() {
        let err = DeviceBuilder::new("dev")
            .peripheral(
                PeripheralBuilder::new("TOP", 0xFFFF_FFFF_FFFF_FFFC)
                    .register(RegisterBuilder::new("LAST", 0x0))
                    .register(RegisterBuilder::new("WRAPS", 0x8)),
            )
            .finish()
            .unwrap_err();
        assert_eq!(
            err,
            DescriptionError::AddressOverflow {
                peripheral: "TOP".into(),
                register: "WRAPS".into(),
                base_address: 0xFFFF_FFFF_FFFF_FFFC,
                offset: 0x8,
            }
        );

        let straddles = DeviceBuilder::new("dev")
            .peripheral(
                PeripheralBuilder::new("TOP", 0xFFFF_FFFF_FFFF_FFFE)
                    .register(RegisterBuilder::new("R", 0)),
            )
            .finish();
        assert!(
            matches!(straddles, Err(DescriptionError::AddressOverflow { .. })),
            "a 4-byte register cannot start two bytes below the top"
        );
    }

    #[test]
    fn registers_may_end_on_the_last_address() {
        let device = DeviceBuilder::new("dev")
            .peripheral(
                PeripheralBuilder::new("TOP", 0xFFFF_FFFF_FFFF_FFF8)
                    .register(RegisterBuilder::new("R", 0x4)),
            )
            .finish()
            .expect("register ends exactly at u64::MAX");
        let top = &device.peripherals()[0];
        assert_eq!(top.address_of(&top.registers()[0]), 0xFFFF_FFFF_FFFF_FFFC);
    }

    #[test]
    fn full_width_field_is_allowed() {
        let device = DeviceBuilder::new("dev")
            .peripheral(PeripheralBuilder::new("P", 0).register(
                RegisterBuilder::new("R", 0).width(64).field("ALL", 0, 64),
            ))
            .finish()
            .expect("64-bit field fits a 64-bit register");
        let field = &device.peripherals()[0].registers()[0].fields()[0];
        assert_eq!(field.mask(), u64::MAX);
    }
}
