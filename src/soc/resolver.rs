//! Name resolution over the description tree: strict top-down lookup for commands
//! and forgiving prefix completion for the host's line editor.

use crate::soc::description::{Device, Field, Peripheral, Register};
use crate::soc::error::{RegError, RegResult};
use crate::soc::format::FLAG_MARKER;

/// The tree nodes named by a validated command path.
#[derive(Clone, Copy, Debug)]
pub struct Selection<'dev> {
    pub peripheral: &'dev Peripheral,
    pub register: Option<&'dev Register>,
    pub field: Option<&'dev Field>,
}

/// Resolves peripheral, then register, then field, failing on the first unknown name.
pub fn resolve<'dev>(
    device: &'dev Device,
    peripheral: &str,
    register: Option<&str>,
    field: Option<&str>,
) -> RegResult<Selection<'dev>> {
    let peripheral = device
        .peripheral(peripheral)
        .ok_or_else(|| RegError::UnknownPeripheral {
            name: peripheral.to_string(),
        })?;
    let Some(register_name) = register else {
        if field.is_some() {
            return Err(RegError::Usage("a field name requires a register name"));
        }
        return Ok(Selection {
            peripheral,
            register: None,
            field: None,
        });
    };
    let register = peripheral
        .register(register_name)
        .ok_or_else(|| RegError::UnknownRegister {
            peripheral: peripheral.name().to_string(),
            name: register_name.to_string(),
        })?;
    let field = field
        .map(|name| {
            register.field(name).ok_or_else(|| RegError::UnknownField {
                register: register.name().to_string(),
                name: name.to_string(),
            })
        })
        .transpose()?;
    Ok(Selection {
        peripheral,
        register: Some(register),
        field,
    })
}

/// Candidate next tokens for `text` (everything typed so far) ending in the partial `word`.
///
/// Returns `None` when no completion applies; never fails.
pub fn complete(device: &Device, text: &str, word: &str) -> Option<Vec<String>> {
    let mut args: Vec<&str> = text.split_whitespace().collect();
    let mut count = args.len();
    if text.ends_with(char::is_whitespace) {
        count += 1;
    }
    if text.is_empty() {
        count = 1;
    }
    if args.first().is_some_and(|first| first.starts_with(FLAG_MARKER)) {
        args.remove(0);
        count = count.saturating_sub(1);
    }

    let prefix = word.to_ascii_uppercase();
    match count {
        1 => Some(
            device
                .peripherals()
                .iter()
                .map(|p| p.name().to_ascii_uppercase())
                .filter(|name| name.starts_with(&prefix))
                .collect(),
        ),
        2 => {
            let peripheral = device.peripheral(args.first()?)?;
            Some(filter_names(
                peripheral.registers().iter().map(Register::name),
                &prefix,
            ))
        }
        3 => {
            let peripheral = device.peripheral(args.first()?)?;
            let register = find_register(peripheral, args.get(1)?)?;
            Some(filter_names(
                register.fields().iter().map(Field::name),
                &prefix,
            ))
        }
        _ => None,
    }
}

fn filter_names<'a>(names: impl Iterator<Item = &'a str>, prefix: &str) -> Vec<String> {
    names
        .filter(|name| name.to_ascii_uppercase().starts_with(prefix))
        .map(str::to_string)
        .collect()
}

fn find_register<'p>(peripheral: &'p Peripheral, name: &str) -> Option<&'p Register> {
    peripheral.register(name).or_else(|| {
        peripheral
            .registers()
            .iter()
            .find(|reg| reg.name().eq_ignore_ascii_case(name))
    })
}
