#![allow(dead_code)]

use std::path::PathBuf;

use regscope::Inspector;
use regscope::config::Settings;
use regscope::loader::{DescriptionParser, SerdeDescriptionParser};
use regscope::soc::description::Device;
use regscope::soc::target::{Endianness, RamTarget, Target, TargetResult};

pub const USART1: u64 = 0x4001_3800;
pub const USB: u64 = 0x4000_5C00;

/// Root of the description catalog shipped with the crate.
pub fn catalog_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("descriptions")
}

pub fn stm32_path() -> PathBuf {
    catalog_root().join("STMicro/STM32F103xx.toml")
}

pub fn stm32() -> Device {
    SerdeDescriptionParser
        .parse(&stm32_path())
        .expect("bundled STM32 description parses")
}

/// Little-endian image covering USART1 with BRR preset to 0x138.
pub fn usart_image() -> RamTarget {
    let mut ram = RamTarget::new("image", USART1, 0x10, Endianness::Little);
    ram.write(USART1 + 0x08, &0x138u32.to_le_bytes())
        .expect("BRR lies inside the image");
    ram
}

pub fn settings() -> Settings {
    Settings {
        catalog_root: catalog_root(),
        ..Settings::default()
    }
}

/// Inspector over `target` with the bundled STM32 description loaded.
pub fn loaded<T: Target>(target: T) -> Inspector<T> {
    let mut inspector = Inspector::new(target, settings());
    inspector.session_mut().load(stm32());
    inspector
}

/// Target that records how often it is touched and otherwise reads zeros.
#[derive(Debug, Default)]
pub struct CountingTarget {
    pub reads: usize,
    pub writes: usize,
}

impl Target for CountingTarget {
    fn name(&self) -> &str {
        "counting"
    }

    fn read(&mut self, _address: u64, out: &mut [u8]) -> TargetResult<()> {
        self.reads += 1;
        out.fill(0);
        Ok(())
    }

    fn write(&mut self, _address: u64, _data: &[u8]) -> TargetResult<()> {
        self.writes += 1;
        Ok(())
    }
}
