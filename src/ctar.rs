//! SPI Clock and Transfer Attributes Register (CTAR) divider search.
//!
//! Every achievable SCK frequency and PCS/SCK delay is found by brute force
//! over the discrete scaler and prescaler fields. When two field
//! combinations give the same value, the first one enumerated (ascending
//! scaler, then ascending prescaler, then doubling off before on) is kept.

use std::collections::BTreeMap;
use std::fmt;

use tracing::{debug, trace};

use crate::ConfigError;

const NANOS_PER_SEC: u64 = 1_000_000_000;

/// Bit field of the CTAR register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CtarField {
    pub name: &'static str,
    pub shift: u32,
    pub width: u32,
}

impl CtarField {
    const fn new(name: &'static str, shift: u32, width: u32) -> Self {
        Self { name, shift, width }
    }

    pub fn mask(self) -> u32 {
        (u32::MAX >> (u32::BITS - self.width)) << self.shift
    }

    pub fn encode(self, value: u32) -> u32 {
        (value << self.shift) & self.mask()
    }
}

/// Double Baud Rate
pub const DBR: CtarField = CtarField::new("DBR", 31, 1);
/// Frame Size (+1)
pub const FMSZ: CtarField = CtarField::new("FMSZ", 27, 4);
/// Clock Polarity
pub const CPOL: CtarField = CtarField::new("CPOL", 26, 1);
/// Clock Phase
pub const CPHA: CtarField = CtarField::new("CPHA", 25, 1);
/// LSB First
pub const LSBFE: CtarField = CtarField::new("LSBFE", 24, 1);
/// PCS to SCK Delay Prescaler
pub const PCSSCK: CtarField = CtarField::new("PCSSCK", 22, 2);
/// After SCK Delay Prescaler
pub const PASC: CtarField = CtarField::new("PASC", 20, 2);
/// Delay after Transfer Prescaler
pub const PDT: CtarField = CtarField::new("PDT", 18, 2);
/// Baud Rate Prescaler
pub const PBR: CtarField = CtarField::new("PBR", 16, 2);
/// PCS to SCK Delay Scaler
pub const CSSCK: CtarField = CtarField::new("CSSCK", 12, 4);
/// After SCK Delay Scaler
pub const ASC: CtarField = CtarField::new("ASC", 8, 4);
/// Delay After Transfer Scaler
pub const DT: CtarField = CtarField::new("DT", 4, 4);
/// Baud Rate Scaler
pub const BR: CtarField = CtarField::new("BR", 0, 4);

/// Every CTAR field, most significant first.
pub const FIELDS: [CtarField; 13] = [
    DBR, FMSZ, CPOL, CPHA, LSBFE, PCSSCK, PASC, PDT, PBR, CSSCK, ASC, DT, BR,
];

/// `(divider, field value)` pairs.
type Domain = &'static [(u32, u32)];

const BAUD_RATE_SCALER: Domain = &[
    (2, 0),
    (4, 1),
    (6, 2),
    (8, 3),
    (16, 4),
    (32, 5),
    (64, 6),
    (128, 7),
    (256, 8),
    (512, 9),
    (1024, 10),
    (2048, 11),
    (4096, 12),
    (8192, 13),
    (16384, 14),
    (32768, 15),
];

const BAUD_RATE_PRESCALER: Domain = &[(2, 0), (3, 1), (5, 2), (7, 3)];

const DELAY_SCALER: Domain = &[
    (2, 0),
    (4, 1),
    (8, 2),
    (16, 3),
    (32, 4),
    (64, 5),
    (128, 6),
    (256, 7),
    (512, 8),
    (1024, 9),
    (2048, 10),
    (4096, 11),
    (8192, 12),
    (16384, 13),
    (32768, 14),
    (65536, 15),
];

const DELAY_PRESCALER: Domain = &[(1, 0), (3, 1), (5, 2), (7, 3)];

/// DBR is only allowed with a baud rate prescaler of 2.
const DOUBLING_PRESCALER: u32 = 2;

fn ascending(domain: Domain) -> Vec<(u32, u32)> {
    let mut sorted = domain.to_vec();
    sorted.sort_unstable_by_key(|&(divider, _)| divider);
    sorted
}

/// Supported bus clocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BusFrequency {
    Mhz36,
    Mhz48,
}

impl BusFrequency {
    pub const ALL: [BusFrequency; 2] = [BusFrequency::Mhz36, BusFrequency::Mhz48];

    pub fn hz(self) -> u32 {
        match self {
            BusFrequency::Mhz36 => 36_000_000,
            BusFrequency::Mhz48 => 48_000_000,
        }
    }
}

impl TryFrom<u32> for BusFrequency {
    type Error = ConfigError;

    fn try_from(hz: u32) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|bus| bus.hz() == hz)
            .ok_or(ConfigError::UnsupportedBusFrequency(hz))
    }
}

impl fmt::Display for BusFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.hz())
    }
}

/// The four CTAR attributes with a selectable value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Timing {
    /// SCK baud rate in Hz.
    Sck,
    /// Delay between assertion of PCS and the first edge of SCK, in ns.
    PcsToSck,
    /// Delay between the last edge of SCK and negation of PCS, in ns.
    AfterSck,
    /// Delay between negation of PCS and the next assertion, in ns.
    AfterTransfer,
}

impl Timing {
    pub const ALL: [Timing; 4] = [
        Timing::Sck,
        Timing::PcsToSck,
        Timing::AfterSck,
        Timing::AfterTransfer,
    ];

    pub fn scaler(self) -> CtarField {
        match self {
            Timing::Sck => BR,
            Timing::PcsToSck => CSSCK,
            Timing::AfterSck => ASC,
            Timing::AfterTransfer => DT,
        }
    }

    pub fn prescaler(self) -> CtarField {
        match self {
            Timing::Sck => PBR,
            Timing::PcsToSck => PCSSCK,
            Timing::AfterSck => PASC,
            Timing::AfterTransfer => PDT,
        }
    }

    fn scalers(self) -> Domain {
        match self {
            Timing::Sck => BAUD_RATE_SCALER,
            _ => DELAY_SCALER,
        }
    }

    fn prescalers(self) -> Domain {
        match self {
            Timing::Sck => BAUD_RATE_PRESCALER,
            _ => DELAY_PRESCALER,
        }
    }

    fn doubling(self) -> &'static [bool] {
        match self {
            Timing::Sck => &[false, true],
            _ => &[false],
        }
    }

    /// Frequencies select the fastest clock not above the request, delays
    /// the shortest delay not below it.
    pub fn is_frequency(self) -> bool {
        self == Timing::Sck
    }

    /// Whether a ladder rung with value `achieved` takes `requested`.
    pub fn accepts(self, requested: u32, achieved: u32) -> bool {
        if self.is_frequency() {
            requested >= achieved
        } else {
            requested <= achieved
        }
    }

    /// Name of the generated selector function.
    pub fn function(self) -> &'static str {
        match self {
            Timing::Sck => "spi_sck",
            Timing::PcsToSck => "spi_pcs_to_sck_delay",
            Timing::AfterSck => "spi_delay_after_sck",
            Timing::AfterTransfer => "spi_delay_after_transfer",
        }
    }

    pub fn argument(self) -> &'static str {
        if self.is_frequency() {
            "frequency"
        } else {
            "nanoseconds"
        }
    }

    /// Name of the matching `spi_cta` parameter.
    pub fn variable(self) -> &'static str {
        match self {
            Timing::Sck => "sck",
            Timing::PcsToSck => "t_csc",
            Timing::AfterSck => "t_asc",
            Timing::AfterTransfer => "t_dt",
        }
    }

    pub fn title(self) -> &'static [&'static str] {
        match self {
            Timing::Sck => &["SCK baud rate to be used for SPI transfers."],
            Timing::PcsToSck => &[
                "This is the delay between the assertion of PCS and the first edge of SCK.",
            ],
            Timing::AfterSck => &[
                "This is the delay between the last edge of SCK and the negation of PCS.",
            ],
            Timing::AfterTransfer => &[
                "This is the time between the negation of the PCS signal at the end of",
                "a frame and the assertion of PCS at the beginning of the next frame.",
            ],
        }
    }

    pub fn description(self) -> &'static [&'static str] {
        match self {
            Timing::Sck => &[
                "Given the frequency in Hz argument passed in, this function",
                "returns the relevant bits for use in the CTAR field.",
            ],
            Timing::PcsToSck => &[
                "Given the nanosecond PCS to SCK delay argument passed in, this function",
                "returns the relevant bits for use in the CTAR field.",
            ],
            Timing::AfterSck => &[
                "Given the nanosecond Delay After SCK argument passed in, this",
                "function returns the relevant bits for use in the CTAR field.",
            ],
            Timing::AfterTransfer => &[
                "Given the nanosecond Delay After Transfer argument passed in, this",
                "function returns the relevant bits for use in the CTAR field.",
            ],
        }
    }

    /// Value produced by the dividers, truncated toward zero.
    pub fn achieved(self, bus: BusFrequency, scaler: u32, prescaler: u32, double: bool) -> u32 {
        let fbus = u64::from(bus.hz());
        let divider = u64::from(scaler) * u64::from(prescaler);
        let value = if self.is_frequency() {
            fbus * (1 + u64::from(double)) / divider
        } else {
            divider * NANOS_PER_SEC / fbus
        };
        // largest value is 65536 * 7 delay cycles at 36 MHz, ~12.7 ms
        value as u32
    }
}

/// Scaler and prescaler field values selecting one CTAR timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CtarEncoding {
    pub timing: Timing,
    pub scaler: u32,
    pub prescaler: u32,
    pub double: bool,
}

impl CtarEncoding {
    /// Raw CTAR register bits.
    pub fn bits(&self) -> u32 {
        let dbr = if self.double { DBR.encode(1) } else { 0 };
        self.timing.scaler().encode(self.scaler)
            | self.timing.prescaler().encode(self.prescaler)
            | dbr
    }
}

/// The `SPI_CTAR_*` macro expression of the encoding.
impl fmt::Display for CtarEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SPI_CTAR_{}({}) | SPI_CTAR_{}({})",
            self.timing.scaler().name,
            self.scaler,
            self.timing.prescaler().name,
            self.prescaler
        )?;
        if self.double {
            write!(f, " | SPI_CTAR_{}", DBR.name)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry {
    pub achieved: u32,
    pub encoding: CtarEncoding,
}

/// Deduplicated achievable values of one timing at one bus frequency, in
/// ladder order: descending for frequencies, ascending for delays. The last
/// entry is the catch-all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimingTable {
    pub timing: Timing,
    pub bus: BusFrequency,
    entries: Vec<Entry>,
}

impl TimingTable {
    pub fn new(timing: Timing, bus: BusFrequency) -> Self {
        let mut found: BTreeMap<u32, CtarEncoding> = BTreeMap::new();
        for (scaler, scaler_field) in ascending(timing.scalers()) {
            for (prescaler, prescaler_field) in ascending(timing.prescalers()) {
                for &double in timing.doubling() {
                    if double && prescaler != DOUBLING_PRESCALER {
                        continue;
                    }
                    let achieved = timing.achieved(bus, scaler, prescaler, double);
                    let encoding = CtarEncoding {
                        timing,
                        scaler: scaler_field,
                        prescaler: prescaler_field,
                        double,
                    };
                    let kept = found.entry(achieved).or_insert(encoding);
                    if *kept != encoding {
                        trace!(?timing, achieved, %encoding, kept = %kept, "duplicate discarded");
                    }
                }
            }
        }

        let mut entries: Vec<Entry> = found
            .into_iter()
            .map(|(achieved, encoding)| Entry { achieved, encoding })
            .collect();
        if timing.is_frequency() {
            entries.reverse();
        }
        debug!(?timing, %bus, entries = entries.len(), "built CTAR table");
        Self {
            timing,
            bus,
            entries,
        }
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Same choice as the generated `if/else if/else` ladder.
    pub fn select(&self, requested: u32) -> &Entry {
        let last = self.entries.len() - 1;
        let index = self.entries[..last]
            .iter()
            .position(|entry| self.timing.accepts(requested, entry.achieved))
            .unwrap_or(last);
        &self.entries[index]
    }
}

/// All four timing tables of one bus frequency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CtarTables {
    pub bus: BusFrequency,
    tables: [TimingTable; 4],
}

impl CtarTables {
    pub fn new(bus: BusFrequency) -> Self {
        Self {
            bus,
            tables: Timing::ALL.map(|timing| TimingTable::new(timing, bus)),
        }
    }

    pub fn table(&self, timing: Timing) -> &TimingTable {
        &self.tables[timing as usize]
    }

    pub fn tables(&self) -> &[TimingTable] {
        &self.tables
    }

    /// CTAR bits for the requested SCK frequency (Hz) and the three delays
    /// (ns), as the generated `spi_cta` computes them.
    pub fn cta(&self, sck: u32, t_csc: u32, t_asc: u32, t_dt: u32) -> u32 {
        [sck, t_csc, t_asc, t_dt]
            .into_iter()
            .zip(Timing::ALL)
            .map(|(requested, timing)| self.table(timing).select(requested).encoding.bits())
            .fold(0, |ctar, bits| ctar | bits)
    }
}

/// Tables for every supported bus frequency, fastest bus first.
pub fn all_tables() -> Vec<CtarTables> {
    BusFrequency::ALL
        .into_iter()
        .rev()
        .map(CtarTables::new)
        .collect()
}
