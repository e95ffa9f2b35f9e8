//! Register codec: splits a raw word into its named fields and folds a single field
//! assignment back into a raw word without disturbing the surrounding bits.

pub mod bits;
pub mod radix;

use serde::Deserialize;
use smallvec::SmallVec;
use tracing::warn;

use crate::soc::description::{Field, Register};
use crate::soc::error::{RegError, RegResult};

pub use bits::{mask_bits, read_bits, write_bits};
pub use radix::Radix;

/// How `encode` treats a value wider than the target field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverflowPolicy {
    /// Mask the value into the field and log a warning.
    #[default]
    Truncate,
    /// Fail with `RegError::FieldOverflow`.
    Reject,
}

/// One field extracted from a raw word.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedField<'reg> {
    pub field: &'reg Field,
    pub value: u64,
    pub text: String,
    /// Set when highlighting is requested and the value is nonzero.
    pub highlight: bool,
}

impl DecodedField<'_> {
    pub fn name(&self) -> &str {
        self.field.name()
    }
}

/// All fields of a register decoded from one raw word, in declaration order.
#[derive(Clone, Debug)]
pub struct DecodedRegister<'reg> {
    pub register: &'reg Register,
    pub raw: u64,
    pub fields: SmallVec<[DecodedField<'reg>; 8]>,
}

impl<'reg> DecodedRegister<'reg> {
    pub fn get(&self, name: &str) -> Option<&DecodedField<'reg>> {
        self.fields.iter().find(|decoded| decoded.name() == name)
    }

    /// Bits claimed by any field; gaps stay zero.
    pub fn covered_bits(&self) -> u64 {
        self.fields
            .iter()
            .fold(0, |acc, decoded| acc | (decoded.value << decoded.field.bit_offset()))
    }
}

pub fn decode(
    raw: u64,
    register: &Register,
    radix: Radix,
    highlight: bool,
) -> RegResult<DecodedRegister<'_>> {
    ensure_fits(raw, register)?;
    let fields = register
        .fields()
        .iter()
        .map(|field| decode_one(raw, field, radix, highlight))
        .collect();
    Ok(DecodedRegister {
        register,
        raw,
        fields,
    })
}

/// Decodes only the field called `name`; unknown names fail instead of yielding nothing.
pub fn decode_field<'reg>(
    raw: u64,
    register: &'reg Register,
    name: &str,
    radix: Radix,
    highlight: bool,
) -> RegResult<DecodedField<'reg>> {
    ensure_fits(raw, register)?;
    let field = register.field(name).ok_or_else(|| RegError::UnknownField {
        register: register.name().to_string(),
        name: name.to_string(),
    })?;
    Ok(decode_one(raw, field, radix, highlight))
}

/// Folds `new_value` into `field` of `raw`.
pub fn encode(
    raw: u64,
    register: &Register,
    field: &Field,
    new_value: u64,
    policy: OverflowPolicy,
) -> RegResult<u64> {
    ensure_fits(raw, register)?;
    if new_value & !field.value_mask() != 0 {
        match policy {
            OverflowPolicy::Reject => {
                return Err(RegError::FieldOverflow {
                    field: field.name().to_string(),
                    width: field.bit_width(),
                    value: new_value,
                });
            }
            OverflowPolicy::Truncate => warn!(
                field = field.name(),
                width = field.bit_width(),
                value = new_value,
                "value truncated to field width"
            ),
        }
    }
    Ok(write_bits(
        raw,
        u32::from(field.bit_offset()),
        u32::from(field.bit_width()),
        new_value,
    ))
}

fn decode_one(raw: u64, field: &Field, radix: Radix, highlight: bool) -> DecodedField<'_> {
    let value = read_bits(
        raw,
        u32::from(field.bit_offset()),
        u32::from(field.bit_width()),
    );
    DecodedField {
        field,
        value,
        text: radix.render(value, field.bit_width()),
        highlight: highlight && value != 0,
    }
}

fn ensure_fits(raw: u64, register: &Register) -> RegResult<()> {
    if raw & !register.width_mask() != 0 {
        return Err(RegError::WidthMismatch {
            register: register.name().to_string(),
            width: register.bit_width(),
            value: raw,
        });
    }
    Ok(())
}

#[cfg(test)]
mod proptests;
