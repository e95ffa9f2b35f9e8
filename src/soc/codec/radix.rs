/// Numeral base used to render a field value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Radix {
    #[default]
    Decimal,
    /// Zero-padded to one digit per started nibble, no prefix.
    Hex,
    /// Zero-padded to the bit width.
    Binary,
}

impl Radix {
    pub fn render(self, value: u64, bit_width: u8) -> String {
        let width = usize::from(bit_width);
        match self {
            Radix::Decimal => value.to_string(),
            Radix::Hex => format!("{value:0digits$x}", digits = width.div_ceil(4)),
            Radix::Binary => format!("{value:0width$b}"),
        }
    }
}
