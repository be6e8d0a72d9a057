//! Generators for the MK20DX256 pin register definitions and SPI CTAR
//! timing selectors.
//!
//! Both generators take no input: the register map and the CTAR field
//! domains are compiled in. Output is C (the `reg32` defines and `spi_cta`
//! functions the firmware build includes) or an equivalent Rust module.

mod c_source;
mod error;
mod formater;
mod helper;
mod rust_source;

pub mod bitband;
pub mod cli;
pub mod ctar;
pub mod peripheral;
pub mod register;

use std::fmt;
use std::str::FromStr;

use anyhow::Result;
use tracing::info;

pub use error::ConfigError;

use ctar::all_tables;
use register::PinRegisters;

/// Language of the generated source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Target {
    #[default]
    C,
    Rust,
}

impl FromStr for Target {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "c" => Ok(Target::C),
            "rust" | "rs" => Ok(Target::Rust),
            _ => Err(ConfigError::UnknownTarget(s.to_owned())),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Target::C => "c",
            Target::Rust => "rust",
        })
    }
}

/// PORT PCR/ISFR and GPIO register definitions with their bit-band
/// aliases, plus the per-pin lookup arrays.
pub fn gen_pin_regs(target: Target) -> Result<String> {
    info!(%target, "generating pin registers");
    let registers = PinRegisters::new();
    match target {
        Target::C => {
            let mut out = String::new();
            c_source::gen_pin_regs(&registers, &mut out)?;
            Ok(out)
        }
        Target::Rust => helper::unparse("pin_regs", rust_source::gen_pin_regs(&registers)),
    }
}

/// SPI CTAR baud rate and delay selectors for every supported bus
/// frequency.
pub fn gen_spi_ctar(target: Target) -> Result<String> {
    info!(%target, "generating SPI CTAR selectors");
    let buses = all_tables();
    match target {
        Target::C => {
            let mut out = String::new();
            c_source::gen_spi_ctar(&buses, &mut out)?;
            Ok(out)
        }
        Target::Rust => helper::unparse("spi_ctar", rust_source::gen_spi_ctar(&buses)),
    }
}
