//! C text rendering. Layout follows the headers the firmware build has
//! always consumed: `////` banners, `(reg32)` defines aligned per group,
//! four array entries per line.

use std::fmt::{self, Write};

use crate::ctar::{CtarTables, Timing, TimingTable};
use crate::formater::{array_row, banner, comment, define, define_width};
use crate::peripheral::PINS_PER_PORT;
use crate::register::{PinRegisters, RegisterArray, RegisterDescriptor, RegisterGroup};

pub fn gen_pin_regs(registers: &PinRegisters, out: &mut String) -> fmt::Result {
    banner(out, &["PORT PCR"])?;
    writeln!(out)?;
    gen_groups(&registers.pcr, out)?;

    banner(out, &["PORT ISFR"])?;
    writeln!(out)?;
    gen_registers(&registers.isfr, out)?;
    writeln!(out)?;
    comment(out, &["Aliased to PORT ISFR bit-band region"])?;
    writeln!(out)?;
    gen_groups(&registers.isfr_aliases, out)?;

    for gpio in &registers.gpio {
        let name = gpio.name();
        banner(out, &[name.as_str()])?;
        writeln!(out)?;
        gen_registers(&gpio.registers, out)?;
        writeln!(out)?;
        comment(out, &[format!("Aliased to {name} bit-band region").as_str()])?;
        writeln!(out)?;
        gen_groups(&gpio.aliases, out)?;
    }

    for array in registers.arrays() {
        gen_array(array, out)?;
    }
    Ok(())
}

fn gen_registers(registers: &[RegisterDescriptor], out: &mut String) -> fmt::Result {
    for reg in registers {
        define(out, &reg.name, reg.name.len() + 2, reg.addr)?;
    }
    Ok(())
}

fn gen_groups(groups: &[RegisterGroup], out: &mut String) -> fmt::Result {
    for group in groups {
        let width = define_width(group.pins.iter().map(|pin| pin.name.as_str()));
        for pin in &group.pins {
            define(out, &pin.name, width, pin.addr)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn gen_array(array: RegisterArray, out: &mut String) -> fmt::Result {
    writeln!(
        out,
        "reg32 {}::_s_{}[{}][{}] =",
        array.kind.class(),
        array.kind.array_name(),
        array.rows.len(),
        PINS_PER_PORT,
    )?;
    writeln!(out, "{{")?;
    for row in array.rows {
        let names: Vec<&str> = row.pins.iter().map(|pin| pin.name.as_str()).collect();
        array_row(out, &names)?;
    }
    writeln!(out, "}};")?;
    writeln!(out)
}

const CTA_TITLE: &[&str] = &["Clock and Transfer Attributes"];
const CTA_DESCRIPTION: &[&str] = &[
    "uint32_t sck   - frequency in Hz",
    "uint32_t t_csc - the delay between assertion of PCS and the first edge of SCK",
    "uint32_t t_asc - the delay between the last edge of SCK and negation of PCS",
    "uint32_t t_dt  - the time between negation of PCS and next assertion of PCS",
    "This function returns the relevant bits for use in the CTAR field.",
];

fn cta_signature() -> String {
    let params: Vec<_> = Timing::ALL
        .iter()
        .map(|timing| format!("uint32_t {}", timing.variable()))
        .collect();
    format!("uint32_t spi_cta({})", params.join(", "))
}

fn signature(timing: Timing) -> String {
    format!("uint32_t {}(uint32_t {})", timing.function(), timing.argument())
}

/// `spi_cta.c`: prototypes, `spi_cta` and one `F_BUS` guarded selector per
/// timing. `buses` is emitted in the given order.
pub fn gen_spi_ctar(buses: &[CtarTables], out: &mut String) -> fmt::Result {
    for header in ["types.h", "spi.h", "spi_cta.h"] {
        writeln!(out, "#include \"{header}\"")?;
    }
    writeln!(out)?;
    writeln!(out, "#ifndef F_BUS")?;
    writeln!(out, "# error \"F_BUS not defined\"")?;
    writeln!(out, "#endif")?;
    writeln!(out)?;

    banner(out, CTA_TITLE)?;
    comment(out, CTA_DESCRIPTION)?;
    writeln!(out, "{};", cta_signature())?;
    writeln!(out)?;
    for timing in Timing::ALL {
        banner(out, timing.title())?;
        comment(out, timing.description())?;
        writeln!(out, "{};", signature(timing))?;
        writeln!(out)?;
    }

    banner(out, CTA_TITLE)?;
    comment(out, CTA_DESCRIPTION)?;
    writeln!(out, "{}", cta_signature())?;
    writeln!(out, "{{")?;
    for (i, timing) in Timing::ALL.iter().enumerate() {
        let call = format!("{}({})", timing.function(), timing.variable());
        let end = if i + 1 == Timing::ALL.len() { ");" } else { "" };
        if i == 0 {
            writeln!(out, "    return ({call}{end}")?;
        } else {
            writeln!(out, "            | {call}{end}")?;
        }
    }
    writeln!(out, "}}")?;
    writeln!(out)?;

    for timing in Timing::ALL {
        gen_selector(timing, buses, out)?;
    }
    Ok(())
}

fn gen_selector(timing: Timing, buses: &[CtarTables], out: &mut String) -> fmt::Result {
    banner(out, timing.title())?;
    comment(out, timing.description())?;
    writeln!(out, "{}", signature(timing))?;
    writeln!(out, "{{")?;
    writeln!(out, "    uint32_t {};", timing.variable())?;
    writeln!(out)?;
    for (i, tables) in buses.iter().enumerate() {
        let directive = if i == 0 { "#if" } else { "#elif" };
        writeln!(out, "{directive} F_BUS == {}", tables.bus)?;
        gen_ladder(tables.table(timing), out)?;
    }
    writeln!(out, "#else")?;
    writeln!(out, "# error \"F_BUS not valid\"")?;
    writeln!(out, "#endif")?;
    writeln!(out)?;
    writeln!(out, "    return {};", timing.variable())?;
    writeln!(out, "}}")?;
    writeln!(out)
}

fn gen_ladder(table: &TimingTable, out: &mut String) -> fmt::Result {
    let timing = table.timing;
    let (arg, var) = (timing.argument(), timing.variable());
    let op = if timing.is_frequency() { ">=" } else { "<=" };
    let entries = table.entries();
    if let [only] = entries {
        return writeln!(out, "    {var} = {};", only.encoding);
    }
    let last = entries.len() - 1;
    for (i, entry) in entries.iter().enumerate() {
        match i {
            0 => writeln!(out, "    if ({arg} {op} {})", entry.achieved)?,
            i if i == last => writeln!(out, "    else")?,
            _ => writeln!(out, "    else if ({arg} {op} {})", entry.achieved)?,
        }
        writeln!(out, "        {var} = {};", entry.encoding)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ctar::BusFrequency;

    #[test]
    fn ladder_shape() {
        let table = TimingTable::new(Timing::Sck, BusFrequency::Mhz48);
        let mut out = String::new();
        gen_ladder(&table, &mut out).unwrap();
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines.len(), table.entries().len() * 2);
        assert_eq!(lines[0], "    if (frequency >= 24000000)");
        assert_eq!(
            lines[1],
            "        sck = SPI_CTAR_BR(0) | SPI_CTAR_PBR(0) | SPI_CTAR_DBR;"
        );
        assert_eq!(lines[2], "    else if (frequency >= 12000000)");
        assert_eq!(lines[lines.len() - 2], "    else");
        assert_eq!(
            lines[lines.len() - 1],
            "        sck = SPI_CTAR_BR(15) | SPI_CTAR_PBR(3);"
        );
    }

    #[test]
    fn delay_ladder_compares_upwards() {
        let table = TimingTable::new(Timing::AfterTransfer, BusFrequency::Mhz36);
        let mut out = String::new();
        gen_ladder(&table, &mut out).unwrap();
        // 2 bus cycles at 36 MHz
        assert!(out.starts_with(
            "    if (nanoseconds <= 55)\n        t_dt = SPI_CTAR_DT(0) | SPI_CTAR_PDT(0);\n"
        ));
    }

    #[test]
    fn signatures() {
        assert_eq!(
            cta_signature(),
            "uint32_t spi_cta(uint32_t sck, uint32_t t_csc, uint32_t t_asc, uint32_t t_dt)"
        );
        assert_eq!(
            signature(Timing::PcsToSck),
            "uint32_t spi_pcs_to_sck_delay(uint32_t nanoseconds)"
        );
    }
}
