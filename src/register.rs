use tracing::debug;

use crate::bitband::alias_address;
use crate::formater::snake_case;
use crate::peripheral::{GpioRegister, Port, PINS_PER_PORT};

/// A named absolute address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterDescriptor {
    pub name: String,
    pub addr: u32,
}

impl RegisterDescriptor {
    fn new(name: String, addr: u32) -> Self {
        Self { name, addr }
    }
}

/// Kind of per-pin register group, one row of a `[5][32]` array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
    Pcr,
    Isfr,
    Gpio(GpioRegister),
}

impl GroupKind {
    pub const ALL: [GroupKind; 8] = [
        GroupKind::Pcr,
        GroupKind::Isfr,
        GroupKind::Gpio(GpioRegister::Pdor),
        GroupKind::Gpio(GpioRegister::Psor),
        GroupKind::Gpio(GpioRegister::Pcor),
        GroupKind::Gpio(GpioRegister::Ptor),
        GroupKind::Gpio(GpioRegister::Pdir),
        GroupKind::Gpio(GpioRegister::Pddr),
    ];

    /// Owning C++ class of the generated array.
    pub fn class(self) -> &'static str {
        match self {
            GroupKind::Pcr | GroupKind::Isfr => "PORT",
            GroupKind::Gpio(_) => "GPIO",
        }
    }

    pub fn register(self) -> &'static str {
        match self {
            GroupKind::Pcr => "PCR",
            GroupKind::Isfr => "ISFR",
            GroupKind::Gpio(reg) => reg.name(),
        }
    }

    /// `port_pcr`, `gpio_pdor`, ...
    pub fn array_name(self) -> String {
        snake_case(&format!("{}_{}", self.class(), self.register()))
    }

    /// Name prefix of the per-pin definitions, e.g. `PORTA_PCR` or
    /// `GPIOB_PDOR`.
    pub fn prefix(self, port: Port) -> String {
        format!("{}{}_{}", self.class(), port.letter(), self.register())
    }

    /// Absolute address of `pin` for `port`. PCRs form a register array,
    /// everything else is a bit-band alias of the port register.
    pub fn address(self, port: Port, pin: u32) -> u32 {
        match self {
            GroupKind::Pcr => port.pcr(pin),
            GroupKind::Isfr => alias_address(port.isfr(), pin),
            GroupKind::Gpio(reg) => alias_address(port.gpio(reg), pin),
        }
    }
}

/// The 32 per-pin definitions of one register of one port, in ascending
/// pin order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterGroup {
    pub kind: GroupKind,
    pub port: Port,
    pub pins: Vec<RegisterDescriptor>,
}

impl RegisterGroup {
    pub fn new(kind: GroupKind, port: Port) -> Self {
        let prefix = kind.prefix(port);
        let pins = (0..PINS_PER_PORT)
            .map(|pin| {
                RegisterDescriptor::new(
                    format!("{prefix}{pin}"),
                    kind.address(port, pin),
                )
            })
            .collect();
        Self { kind, port, pins }
    }
}

/// Raw registers of a GPIO module and their bit-band aliases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GpioPort {
    pub port: Port,
    pub registers: Vec<RegisterDescriptor>,
    pub aliases: Vec<RegisterGroup>,
}

impl GpioPort {
    fn new(port: Port) -> Self {
        let registers = GpioRegister::ALL
            .iter()
            .map(|&reg| {
                RegisterDescriptor::new(
                    format!("GPIO{}_{}", port.letter(), reg.name()),
                    port.gpio(reg),
                )
            })
            .collect();
        let aliases = GpioRegister::ALL
            .iter()
            .map(|&reg| RegisterGroup::new(GroupKind::Gpio(reg), port))
            .collect();
        Self {
            port,
            registers,
            aliases,
        }
    }

    pub fn name(&self) -> String {
        format!("GPIO{}", self.port.letter())
    }
}

/// One `reg32 <class>::_s_<array>[5][32]` initializer.
#[derive(Debug, Clone, Copy)]
pub struct RegisterArray<'a> {
    pub kind: GroupKind,
    pub rows: [&'a RegisterGroup; 5],
}

/// Every PORT/GPIO pin register definition of the device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinRegisters {
    pub pcr: Vec<RegisterGroup>,
    pub isfr: Vec<RegisterDescriptor>,
    pub isfr_aliases: Vec<RegisterGroup>,
    pub gpio: Vec<GpioPort>,
}

impl Default for PinRegisters {
    fn default() -> Self {
        Self::new()
    }
}

impl PinRegisters {
    pub fn new() -> Self {
        let pcr = Port::ALL
            .iter()
            .map(|&port| RegisterGroup::new(GroupKind::Pcr, port))
            .collect();
        let isfr = Port::ALL
            .iter()
            .map(|&port| {
                RegisterDescriptor::new(
                    format!("PORT{}_ISFR", port.letter()),
                    port.isfr(),
                )
            })
            .collect();
        let isfr_aliases = Port::ALL
            .iter()
            .map(|&port| RegisterGroup::new(GroupKind::Isfr, port))
            .collect();
        let gpio = Port::ALL.iter().map(|&port| GpioPort::new(port)).collect();
        let registers = Self {
            pcr,
            isfr,
            isfr_aliases,
            gpio,
        };
        debug!(
            definitions = registers.definitions().count(),
            "expanded pin registers"
        );
        registers
    }

    /// All groups of `kind`, one per port in alphabetical order.
    pub fn groups(&self, kind: GroupKind) -> [&RegisterGroup; 5] {
        std::array::from_fn(|port| match kind {
            GroupKind::Pcr => &self.pcr[port],
            GroupKind::Isfr => &self.isfr_aliases[port],
            GroupKind::Gpio(reg) => &self.gpio[port].aliases[reg as usize],
        })
    }

    /// The `[5][32]` arrays in emission order: PCR, ISFR, then the six GPIO
    /// registers.
    pub fn arrays(&self) -> impl Iterator<Item = RegisterArray<'_>> {
        GroupKind::ALL.into_iter().map(|kind| RegisterArray {
            kind,
            rows: self.groups(kind),
        })
    }

    /// Every `#define`, in emission order.
    pub fn definitions(&self) -> impl Iterator<Item = &RegisterDescriptor> {
        pins(&self.pcr)
            .chain(self.isfr.iter())
            .chain(pins(&self.isfr_aliases))
            .chain(self.gpio.iter().flat_map(|gpio| {
                gpio.registers.iter().chain(pins(&gpio.aliases))
            }))
    }
}

fn pins(groups: &[RegisterGroup]) -> impl Iterator<Item = &RegisterDescriptor> {
    groups.iter().flat_map(|group| group.pins.iter())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitband::{PERIPHERAL_ALIAS_BASE, PERIPHERAL_BIT_BAND_BASE};

    #[test]
    fn alias_formula_holds_for_every_pin() {
        let registers = PinRegisters::new();
        for kind in GroupKind::ALL.into_iter().skip(1) {
            for (port, group) in Port::ALL.iter().zip(registers.groups(kind)) {
                let base = match kind {
                    GroupKind::Isfr => port.isfr(),
                    GroupKind::Gpio(reg) => port.gpio(reg),
                    GroupKind::Pcr => unreachable!(),
                };
                for (bit, pin) in group.pins.iter().enumerate() {
                    let bit = bit as u32;
                    let expected = ((base - PERIPHERAL_BIT_BAND_BASE) * 32)
                        + (bit * 4)
                        + PERIPHERAL_ALIAS_BASE;
                    assert_eq!(pin.addr, expected, "{}", pin.name);
                }
            }
        }
    }

    #[test]
    fn pcr_is_a_register_array() {
        let registers = PinRegisters::new();
        let group = &registers.pcr[2];
        assert_eq!(group.pins[0].name, "PORTC_PCR0");
        assert_eq!(group.pins[0].addr, 0x4004_B000);
        assert_eq!(group.pins[17].name, "PORTC_PCR17");
        assert_eq!(group.pins[17].addr, 0x4004_B044);
    }

    #[test]
    fn arrays_have_32_ascending_entries() {
        let registers = PinRegisters::new();
        let arrays: Vec<_> = registers.arrays().collect();
        assert_eq!(arrays.len(), 8);
        for array in arrays {
            for (port, row) in Port::ALL.iter().zip(array.rows) {
                assert_eq!(row.port, *port);
                assert_eq!(row.kind, array.kind);
                assert_eq!(row.pins.len(), 32);
                let prefix = array.kind.prefix(*port);
                for (pin, def) in row.pins.iter().enumerate() {
                    assert_eq!(def.name, format!("{prefix}{pin}"));
                }
            }
        }
    }

    #[test]
    fn array_names() {
        assert_eq!(GroupKind::Pcr.array_name(), "port_pcr");
        assert_eq!(GroupKind::Isfr.array_name(), "port_isfr");
        assert_eq!(
            GroupKind::Gpio(GpioRegister::Ptor).array_name(),
            "gpio_ptor"
        );
    }

    #[test]
    fn definition_count() {
        // 5 ports * (32 PCR + 1 ISFR + 32 ISFR bits + 6 GPIO + 6 * 32 bits)
        assert_eq!(PinRegisters::new().definitions().count(), 5 * 263);
    }

    #[test]
    fn gpio_aliases() {
        let registers = PinRegisters::new();
        let gpio_e = &registers.gpio[4];
        assert_eq!(gpio_e.name(), "GPIOE");
        assert_eq!(gpio_e.registers[5].name, "GPIOE_PDDR");
        assert_eq!(gpio_e.registers[5].addr, 0x400F_F114);
        let pddr = &gpio_e.aliases[5];
        assert_eq!(pddr.pins[3].name, "GPIOE_PDDR3");
        assert_eq!(pddr.pins[3].addr, 0x43FE_228C);
    }
}
