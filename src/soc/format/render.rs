use std::fmt::Write as _;

use crate::soc::codec::{DecodedField, DecodedRegister};
use crate::soc::description::Peripheral;

use super::options::{DisplayOptions, WholeValue};

const EMPHASIS_ON: &str = "\x1b[32m";
const EMPHASIS_OFF: &str = "\x1b[0m";

/// Renders decoded registers as line-oriented text.
#[derive(Clone, Copy, Debug, Default)]
pub struct Formatter {
    options: DisplayOptions,
}

impl Formatter {
    pub fn new(options: DisplayOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &DisplayOptions {
        &self.options
    }

    /// `NAME @ 0x40013800`
    pub fn peripheral_header(&self, peripheral: &Peripheral) -> String {
        format!("{} @ 0x{:08x}", peripheral.name(), peripheral.base_address())
    }

    /// One register: padded name, optional offset and whole value, then `name=value` pairs.
    pub fn register_line(&self, decoded: &DecodedRegister<'_>, name_width: usize) -> String {
        let register = decoded.register;
        let mut line = format!("{:<name_width$}", register.name());
        if self.options.offsets {
            let _ = write!(line, " 0x{:04x}", register.offset());
        }
        let bits = usize::from(register.bit_width());
        match self.options.whole {
            WholeValue::Hidden => {}
            WholeValue::Hex => {
                let _ = write!(line, " 0x{:0digits$x}", decoded.raw, digits = bits / 4);
            }
            WholeValue::Binary => {
                let _ = write!(line, " {:0bits$b}", decoded.raw);
            }
        }
        for field in &decoded.fields {
            line.push(' ');
            self.push_field(&mut line, field);
        }
        line
    }

    /// A lone `name=value` line.
    pub fn field_line(&self, field: &DecodedField<'_>) -> String {
        let mut line = String::new();
        self.push_field(&mut line, field);
        line
    }

    /// Header followed by every register, names aligned to the longest one.
    pub fn peripheral_listing(
        &self,
        peripheral: &Peripheral,
        registers: &[DecodedRegister<'_>],
    ) -> String {
        let width = peripheral.name_width();
        let mut out = self.peripheral_header(peripheral);
        for decoded in registers {
            out.push('\n');
            out.push_str(&self.register_line(decoded, width));
        }
        out
    }

    fn push_field(&self, line: &mut String, field: &DecodedField<'_>) {
        if field.highlight {
            let _ = write!(line, "{EMPHASIS_ON}{}={}{EMPHASIS_OFF}", field.name(), field.text);
        } else {
            let _ = write!(line, "{}={}", field.name(), field.text);
        }
    }
}
