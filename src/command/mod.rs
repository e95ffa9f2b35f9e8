//! Operator commands: the surface a host debugger wires its `load`, `show`, `set` and
//! completion hooks to. Every command validates names top-down before touching the
//! target, and builds its whole output before returning it.

pub mod confirm;

use std::fmt;
use std::io::{BufRead, Write};
use std::sync::Arc;

use tracing::debug;

use crate::config::Settings;
use crate::loader::{
    Catalog, DescriptionParser, DescriptionSource, SerdeDescriptionParser, parse_numeric_literal,
};
use crate::soc::codec::{self, DecodedRegister, OverflowPolicy};
use crate::soc::description::{Device, Peripheral, Register};
use crate::soc::error::{RegError, RegResult};
use crate::soc::format::{DisplayOptions, Formatter, split_flags};
use crate::soc::resolver;
use crate::soc::session::Session;
use crate::soc::target::{Target, word_from_bytes, word_to_bytes};

pub use confirm::confirm;

const SHOW_USAGE: &str = "show [/flags] peripheral [register [field]]";
const SET_USAGE: &str = "set [/flags] peripheral register field value";

/// Outcome of a field update.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldWrite {
    pub address: u64,
    pub before: u64,
    pub after: u64,
    /// The updated register rendered with the command's display options.
    pub rendered: String,
}

/// A field update whose names, value and flags have been checked against the loaded
/// description. Nothing has touched the target yet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingWrite {
    pub peripheral: String,
    pub register: String,
    pub field: String,
    pub value: u64,
    /// The value as the operator typed it.
    pub literal: String,
    pub options: DisplayOptions,
}

impl fmt::Display for PendingWrite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{} = {}",
            self.peripheral, self.register, self.field, self.literal
        )
    }
}

pub struct Inspector<T: Target, P: DescriptionParser = SerdeDescriptionParser> {
    session: Session,
    target: T,
    settings: Settings,
    parser: P,
}

impl<T: Target> Inspector<T> {
    pub fn new(target: T, settings: Settings) -> Self {
        Self::with_parser(target, settings, SerdeDescriptionParser)
    }
}

impl<T: Target, P: DescriptionParser> Inspector<T, P> {
    pub fn with_parser(target: T, settings: Settings, parser: P) -> Self {
        Self {
            session: Session::new(),
            target,
            settings,
            parser,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn target_mut(&mut self) -> &mut T {
        &mut self.target
    }

    pub fn into_target(self) -> T {
        self.target
    }

    /// Parses a description and makes it current; on failure the previous one stays.
    pub fn load_description(&mut self, source: &DescriptionSource) -> RegResult<Arc<Device>> {
        let catalog = Catalog::new(&self.settings.catalog_root);
        let parser = &self.parser;
        self.session
            .load_with(|| {
                let path = source.locate(&catalog)?;
                parser.parse(&path)
            })
            .map_err(|source_err| RegError::DescriptionLoadFailure {
                origin: source.origin(),
                source: source_err,
            })
    }

    /// Display options for a flag token, falling back to the configured default.
    pub fn options(&self, flags: Option<&str>) -> RegResult<DisplayOptions> {
        let flags = flags.or(self.settings.default_flags.as_deref());
        let options = match flags {
            Some(token) => DisplayOptions::parse_flags(token)?,
            None => DisplayOptions::default(),
        };
        Ok(options.with_highlight(self.settings.highlight))
    }

    /// Renders a peripheral, one register, or one field from live target memory.
    pub fn show(
        &mut self,
        peripheral: &str,
        register: Option<&str>,
        field: Option<&str>,
        options: DisplayOptions,
    ) -> RegResult<String> {
        let device = self.session.current()?;
        let selection = resolver::resolve(&device, peripheral, register, field)?;
        let formatter = Formatter::new(options);
        let peripheral = selection.peripheral;

        let Some(register) = selection.register else {
            let mut raws = Vec::with_capacity(peripheral.registers().len());
            for register in peripheral.registers() {
                raws.push(self.read_register(peripheral, register)?);
            }
            let decoded = peripheral
                .registers()
                .iter()
                .zip(raws)
                .map(|(register, raw)| {
                    codec::decode(raw, register, options.radix, options.highlight)
                })
                .collect::<RegResult<Vec<DecodedRegister<'_>>>>()?;
            return Ok(formatter.peripheral_listing(peripheral, &decoded));
        };

        let raw = self.read_register(peripheral, register)?;
        match selection.field {
            Some(field) => {
                let decoded = codec::decode_field(
                    raw,
                    register,
                    field.name(),
                    options.radix,
                    options.highlight,
                )?;
                Ok(formatter.field_line(&decoded))
            }
            None => {
                let decoded = codec::decode(raw, register, options.radix, options.highlight)?;
                Ok(formatter.register_line(&decoded, 0))
            }
        }
    }

    /// Validates a field update without touching the target: names top-down, then
    /// the value literal, then (under `Reject`) that the value fits the field.
    pub fn plan_set(
        &self,
        peripheral: &str,
        register: &str,
        field: &str,
        value: &str,
        options: DisplayOptions,
    ) -> RegResult<PendingWrite> {
        let device = self.session.current()?;
        let selection = resolver::resolve(&device, peripheral, Some(register), Some(field))?;
        let (Some(register), Some(field)) = (selection.register, selection.field) else {
            return Err(RegError::Usage(SET_USAGE));
        };
        let new_value =
            parse_numeric_literal(value).map_err(|reason| RegError::MalformedValueLiteral {
                literal: value.to_string(),
                reason,
            })?;
        if self.settings.field_overflow == OverflowPolicy::Reject
            && new_value & !field.value_mask() != 0
        {
            return Err(RegError::FieldOverflow {
                field: field.name().to_string(),
                width: field.bit_width(),
                value: new_value,
            });
        }
        Ok(PendingWrite {
            peripheral: selection.peripheral.name().to_string(),
            register: register.name().to_string(),
            field: field.name().to_string(),
            value: new_value,
            literal: value.to_string(),
            options,
        })
    }

    /// Read-modify-write of a planned update. Bits outside the field are written back
    /// unchanged.
    pub fn commit(&mut self, pending: &PendingWrite) -> RegResult<FieldWrite> {
        let device = self.session.current()?;
        let selection = resolver::resolve(
            &device,
            &pending.peripheral,
            Some(&pending.register),
            Some(&pending.field),
        )?;
        let (Some(register), Some(field)) = (selection.register, selection.field) else {
            return Err(RegError::Usage(SET_USAGE));
        };
        let peripheral = selection.peripheral;
        let options = pending.options;

        let before = self.read_register(peripheral, register)?;
        let after = codec::encode(
            before,
            register,
            field,
            pending.value,
            self.settings.field_overflow,
        )?;
        self.write_register(peripheral, register, after)?;

        let decoded = codec::decode(after, register, options.radix, options.highlight)?;
        Ok(FieldWrite {
            address: peripheral.address_of(register),
            before,
            after,
            rendered: Formatter::new(options).register_line(&decoded, 0),
        })
    }

    /// [`plan_set`](Self::plan_set) followed by [`commit`](Self::commit).
    pub fn set_field(
        &mut self,
        peripheral: &str,
        register: &str,
        field: &str,
        value: &str,
        options: DisplayOptions,
    ) -> RegResult<FieldWrite> {
        let pending = self.plan_set(peripheral, register, field, value, options)?;
        self.commit(&pending)
    }

    /// Completion candidates for the host line editor; `None` when nothing applies.
    pub fn complete(&self, text: &str, word: &str) -> Option<Vec<String>> {
        let device = self.session.current().ok()?;
        resolver::complete(&device, text, word)
    }

    /// `show` from raw tokens: `[/flags] peripheral [register [field]]`.
    pub fn show_args<S: AsRef<str>>(&mut self, args: &[S]) -> RegResult<String> {
        let (flags, rest) = split_flags(args);
        let options = self.options(flags)?;
        let names: Vec<&str> = rest.iter().map(AsRef::as_ref).collect();
        match names[..] {
            [peripheral] => self.show(peripheral, None, None, options),
            [peripheral, register] => self.show(peripheral, Some(register), None, options),
            [peripheral, register, field] => {
                self.show(peripheral, Some(register), Some(field), options)
            }
            _ => Err(RegError::Usage(SHOW_USAGE)),
        }
    }

    /// Plans `set` from raw tokens: `[/flags] peripheral register field value`.
    pub fn plan_set_args<S: AsRef<str>>(&self, args: &[S]) -> RegResult<PendingWrite> {
        let (flags, rest) = split_flags(args);
        let options = self.options(flags)?;
        let names: Vec<&str> = rest.iter().map(AsRef::as_ref).collect();
        match names[..] {
            [peripheral, register, field, value] => {
                self.plan_set(peripheral, register, field, value, options)
            }
            _ => Err(RegError::Usage(SET_USAGE)),
        }
    }

    /// `set` from raw tokens: `[/flags] peripheral register field value`.
    pub fn set_args<S: AsRef<str>>(&mut self, args: &[S]) -> RegResult<FieldWrite> {
        let pending = self.plan_set_args(args)?;
        self.commit(&pending)
    }

    /// Interactive `set`: validates first, asks for confirmation, then writes.
    /// Returns `None` when the operator declines.
    pub fn set_args_confirmed<S, R, W>(
        &mut self,
        args: &[S],
        input: &mut R,
        output: &mut W,
    ) -> RegResult<Option<FieldWrite>>
    where
        S: AsRef<str>,
        R: BufRead,
        W: Write,
    {
        let pending = self.plan_set_args(args)?;
        if !confirm(&format!("Write {pending}?"), input, output)? {
            return Ok(None);
        }
        self.commit(&pending).map(Some)
    }

    fn read_register(&mut self, peripheral: &Peripheral, register: &Register) -> RegResult<u64> {
        let address = peripheral.address_of(register);
        let mut bytes = vec![0u8; register.byte_len()];
        self.target.read(address, &mut bytes)?;
        let raw = word_from_bytes(&bytes, self.target.endianness())?;
        debug!(
            peripheral = peripheral.name(),
            register = register.name(),
            address,
            len = bytes.len(),
            raw,
            "register read"
        );
        Ok(raw)
    }

    fn write_register(
        &mut self,
        peripheral: &Peripheral,
        register: &Register,
        raw: u64,
    ) -> RegResult<()> {
        let address = peripheral.address_of(register);
        let bytes = word_to_bytes(raw, register.byte_len(), self.target.endianness())?;
        self.target.write(address, &bytes)?;
        debug!(
            peripheral = peripheral.name(),
            register = register.name(),
            address,
            len = bytes.len(),
            raw,
            "register write"
        );
        Ok(())
    }
}
