//! Reads structured description files (TOML or JSON) into a validated [`Device`].
//!
//! ```toml
//! name = "STM32F103xx"
//! register_size = 32
//!
//! [[peripherals]]
//! name = "USART1"
//! base_address = 0x40013800
//!
//!   [[peripherals.registers]]
//!   name = "BRR"
//!   offset = 0x08
//!
//!     [[peripherals.registers.fields]]
//!     name = "DIV_Mantissa"
//!     bit_offset = 4
//!     bit_width = 12
//!
//! [[peripherals]]
//! name = "USART2"
//! base_address = "0x40004400"
//! derived_from = "USART1"
//! ```

use std::{fs, path::Path};

use ahash::AHashMap;
use serde::Deserialize;

use super::error::LoadError;
use super::literals::parse_numeric_literal;
use crate::soc::description::{
    DEFAULT_REGISTER_WIDTH, Device, DeviceBuilder, PeripheralBuilder, RegisterBuilder,
};

/// Turns a description file into a device tree.
pub trait DescriptionParser {
    fn parse(&self, path: &Path) -> Result<Device, LoadError>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DescriptionFormat {
    Toml,
    Json,
}

impl DescriptionFormat {
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        match extension.as_str() {
            "toml" => Ok(Self::Toml),
            "json" => Ok(Self::Json),
            _ => Err(LoadError::UnsupportedFormat { extension }),
        }
    }
}

/// Built-in parser for the serde-backed description schema.
#[derive(Clone, Copy, Debug, Default)]
pub struct SerdeDescriptionParser;

impl SerdeDescriptionParser {
    pub fn parse_str(&self, text: &str, format: DescriptionFormat) -> Result<Device, LoadError> {
        let file: DeviceFile = match format {
            DescriptionFormat::Toml => toml::from_str(text)?,
            DescriptionFormat::Json => serde_json::from_str(text)?,
        };
        file.into_device()
    }
}

impl DescriptionParser for SerdeDescriptionParser {
    fn parse(&self, path: &Path) -> Result<Device, LoadError> {
        let format = DescriptionFormat::from_path(path)?;
        let text = fs::read_to_string(path)?;
        self.parse_str(&text, format)
    }
}

/// Integers may be written natively or as literal strings such as `"0x40013800"`.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
enum Number {
    Int(u64),
    Text(String),
}

impl Number {
    fn value(&self) -> Result<u64, LoadError> {
        match self {
            Number::Int(value) => Ok(*value),
            Number::Text(text) => {
                parse_numeric_literal(text).map_err(|reason| LoadError::Number {
                    text: text.clone(),
                    reason,
                })
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct DeviceFile {
    name: String,
    #[serde(default = "default_register_size")]
    register_size: u32,
    #[serde(default)]
    peripherals: Vec<PeripheralFile>,
}

#[derive(Debug, Deserialize)]
struct PeripheralFile {
    name: String,
    base_address: Number,
    #[serde(default)]
    derived_from: Option<String>,
    #[serde(default)]
    registers: Vec<RegisterFile>,
}

#[derive(Clone, Debug, Deserialize)]
struct RegisterFile {
    name: String,
    offset: Number,
    #[serde(default)]
    size: Option<u32>,
    #[serde(default)]
    fields: Vec<FieldFile>,
}

#[derive(Clone, Debug, Deserialize)]
struct FieldFile {
    name: String,
    bit_offset: u32,
    bit_width: u32,
}

fn default_register_size() -> u32 {
    DEFAULT_REGISTER_WIDTH
}

impl DeviceFile {
    fn into_device(self) -> Result<Device, LoadError> {
        let by_name: AHashMap<String, &PeripheralFile> = self
            .peripherals
            .iter()
            .map(|p| (p.name.to_ascii_uppercase(), p))
            .collect();

        let mut device = DeviceBuilder::new(self.name.clone());
        for peripheral in &self.peripherals {
            let mut builder =
                PeripheralBuilder::new(peripheral.name.clone(), peripheral.base_address.value()?);
            for register in self.registers_of(peripheral, &by_name)? {
                builder.push_register(register.to_builder(self.register_size)?);
            }
            device.push_peripheral(builder);
        }
        Ok(device.finish()?)
    }

    /// Own registers, preceded by any inherited ones they do not override.
    fn registers_of<'a>(
        &self,
        peripheral: &'a PeripheralFile,
        by_name: &AHashMap<String, &'a PeripheralFile>,
    ) -> Result<Vec<&'a RegisterFile>, LoadError> {
        let Some(base_name) = &peripheral.derived_from else {
            return Ok(peripheral.registers.iter().collect());
        };
        let base: &'a PeripheralFile = by_name
            .get(&base_name.to_ascii_uppercase())
            .copied()
            .ok_or_else(|| LoadError::UnknownBase {
                peripheral: peripheral.name.clone(),
                base: base_name.clone(),
            })?;
        if base.derived_from.is_some() {
            return Err(LoadError::NestedDerivation {
                peripheral: peripheral.name.clone(),
                base: base_name.clone(),
            });
        }
        let mut registers: Vec<&RegisterFile> = base
            .registers
            .iter()
            .filter(|inherited| {
                !peripheral
                    .registers
                    .iter()
                    .any(|own| own.name == inherited.name)
            })
            .collect();
        registers.extend(peripheral.registers.iter());
        Ok(registers)
    }
}

impl RegisterFile {
    fn to_builder(&self, default_size: u32) -> Result<RegisterBuilder, LoadError> {
        let mut builder = RegisterBuilder::new(self.name.clone(), self.offset.value()?)
            .width(self.size.unwrap_or(default_size));
        for field in &self.fields {
            builder.push_field(field.name.clone(), field.bit_offset, field.bit_width);
        }
        Ok(builder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::soc::description::DescriptionError;

    const STM32: &str = r#"
name = "STM32F103xx"

[[peripherals]]
name = "USART1"
base_address = 0x40013800

  [[peripherals.registers]]
  name = "SR"
  offset = 0x00

    [[peripherals.registers.fields]]
    name = "TXE"
    bit_offset = 7
    bit_width = 1

  [[peripherals.registers]]
  name = "BRR"
  offset = "0x08"

    [[peripherals.registers.fields]]
    name = "DIV_Mantissa"
    bit_offset = 4
    bit_width = 12

    [[peripherals.registers.fields]]
    name = "DIV_Fraction"
    bit_offset = 0
    bit_width = 4

[[peripherals]]
name = "USART2"
base_address = "0x4000_4400"
derived_from = "usart1"

  [[peripherals.registers]]
  name = "BRR"
  offset = 0x08
  size = 16
"#;

    fn parse_toml(text: &str) -> Result<Device, LoadError> {
        SerdeDescriptionParser.parse_str(text, DescriptionFormat::Toml)
    }

    #[test]
    fn parses_toml_tree_with_literal_strings() {
        let device = parse_toml(STM32).expect("valid description");
        assert_eq!(device.name(), "STM32F103xx");
        let usart1 = device.peripheral("USART1").unwrap();
        assert_eq!(usart1.base_address(), 0x4001_3800);
        let brr = usart1.register("BRR").unwrap();
        assert_eq!(brr.offset(), 8);
        assert_eq!(brr.bit_width(), 32, "device default register size applies");
        assert_eq!(brr.fields().len(), 2);
    }

    #[test]
    fn derived_peripherals_inherit_and_override_registers() {
        let device = parse_toml(STM32).unwrap();
        let usart2 = device.peripheral("USART2").unwrap();
        assert_eq!(usart2.base_address(), 0x4000_4400);
        let names: Vec<_> = usart2.registers().iter().map(|r| r.name()).collect();
        assert_eq!(names, ["SR", "BRR"], "inherited first, own overrides last");
        assert_eq!(usart2.register("BRR").unwrap().bit_width(), 16);
        assert!(usart2.register("BRR").unwrap().fields().is_empty());
    }

    #[test]
    fn json_descriptions_share_the_schema() {
        let text = r#"{
            "name": "tiny",
            "register_size": 16,
            "peripherals": [
                { "name": "GPIOA", "base_address": "0x40010800",
                  "registers": [
                    { "name": "ODR", "offset": 12,
                      "fields": [ { "name": "ODR0", "bit_offset": 0, "bit_width": 1 } ] }
                  ] }
            ]
        }"#;
        let device = SerdeDescriptionParser
            .parse_str(text, DescriptionFormat::Json)
            .expect("json description");
        let odr = device.peripheral("gpioa").unwrap().register("ODR").unwrap();
        assert_eq!(odr.bit_width(), 16);
        assert_eq!(odr.offset(), 12);
    }

    #[test]
    fn structural_errors_surface_as_invalid() {
        let text = r#"
name = "bad"
[[peripherals]]
name = "P"
base_address = 0
  [[peripherals.registers]]
  name = "R"
  offset = 0
    [[peripherals.registers.fields]]
    name = "F"
    bit_offset = 30
    bit_width = 4
"#;
        let err = parse_toml(text).unwrap_err();
        assert!(matches!(
            err,
            LoadError::Invalid(DescriptionError::FieldOutOfRange { .. })
        ));
    }

    #[test]
    fn derivation_errors_are_reported() {
        let unknown = r#"
name = "bad"
[[peripherals]]
name = "B"
base_address = 0
derived_from = "A"
"#;
        assert!(matches!(parse_toml(unknown), Err(LoadError::UnknownBase { .. })));

        let nested = r#"
name = "bad"
[[peripherals]]
name = "A"
base_address = 0
[[peripherals]]
name = "B"
base_address = 0x100
derived_from = "A"
[[peripherals]]
name = "C"
base_address = 0x200
derived_from = "B"
"#;
        assert!(matches!(parse_toml(nested), Err(LoadError::NestedDerivation { .. })));
    }

    #[test]
    fn bad_numbers_and_syntax_fail() {
        let text = "name = \"x\"\n[[peripherals]]\nname = \"P\"\nbase_address = \"0xZZ\"\n";
        assert!(matches!(parse_toml(text), Err(LoadError::Number { .. })));
        assert!(matches!(parse_toml("name = "), Err(LoadError::Toml(_))));
    }

    #[test]
    fn format_follows_extension() {
        assert_eq!(
            DescriptionFormat::from_path(Path::new("a/b.TOML")).unwrap(),
            DescriptionFormat::Toml
        );
        assert!(matches!(
            DescriptionFormat::from_path(Path::new("chip.svd")),
            Err(LoadError::UnsupportedFormat { .. })
        ));
    }
}
