use crate::soc::codec::Radix;
use crate::soc::error::{RegError, RegResult};

/// Marker that introduces a display-flag token, e.g. `/ox`.
pub const FLAG_MARKER: char = '/';

/// Whole-register rendering printed before the decoded fields.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WholeValue {
    #[default]
    Hidden,
    Hex,
    Binary,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DisplayOptions {
    pub offsets: bool,
    pub whole: WholeValue,
    pub radix: Radix,
    pub highlight: bool,
}

impl DisplayOptions {
    /// Parses the flag characters of a `/flags` token (marker optional).
    ///
    /// `o` offsets, `X` whole hex, `B` whole binary, `x`/`b`/`d` field radix.
    pub fn parse_flags(token: &str) -> RegResult<Self> {
        let mut options = Self::default();
        options.apply_flags(token)?;
        Ok(options)
    }

    pub fn apply_flags(&mut self, token: &str) -> RegResult<()> {
        for flag in token.trim_start_matches(FLAG_MARKER).chars() {
            match flag {
                'o' => self.offsets = true,
                'X' => self.whole = WholeValue::Hex,
                'B' => self.whole = WholeValue::Binary,
                'x' => self.radix = Radix::Hex,
                'b' => self.radix = Radix::Binary,
                'd' => self.radix = Radix::Decimal,
                other => return Err(RegError::UnknownFlag { flag: other }),
            }
        }
        Ok(())
    }

    pub fn with_highlight(mut self, highlight: bool) -> Self {
        self.highlight = highlight;
        self
    }
}

/// Splits a leading flag token off `args`.
pub fn split_flags<'a, S: AsRef<str>>(args: &'a [S]) -> (Option<&'a str>, &'a [S]) {
    match args.first() {
        Some(first) if first.as_ref().starts_with(FLAG_MARKER) => {
            (Some(first.as_ref()), &args[1..])
        }
        _ => (None, args),
    }
}
