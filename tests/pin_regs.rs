use k20_regs_gen::{gen_pin_regs, Target};
use pretty_assertions::assert_eq;

fn c_output() -> String {
    gen_pin_regs(Target::C).unwrap()
}

/// Lines from the one equal to `start` up to, not including, the first
/// blank line after it.
fn block<'a>(output: &'a str, start: &str) -> Vec<&'a str> {
    output
        .lines()
        .skip_while(|line| *line != start)
        .take_while(|line| !line.is_empty())
        .collect()
}

#[test]
fn starts_with_pcr_banner() {
    let output = c_output();
    let rule = "/".repeat(80);
    let expected = format!(
        "{rule}\n// PORT PCR\n{rule}\n\n\
         #define PORTA_PCR0   (reg32)0x40049000\n\
         #define PORTA_PCR1   (reg32)0x40049004\n"
    );
    assert_eq!(&output[..expected.len()], expected);
}

#[test]
fn two_digit_pins_stay_aligned() {
    let output = c_output();
    assert!(output.contains("#define PORTE_PCR31  (reg32)0x4004D07C\n"));
    assert!(output.contains("#define PORTB_ISFR9   (reg32)0x42941424\n"));
    assert!(output.contains("#define GPIOC_PTOR10  (reg32)0x43FE11A8\n"));
}

#[test]
fn raw_registers() {
    let output = c_output();
    assert_eq!(
        block(&output, "#define PORTA_ISFR  (reg32)0x400490A0"),
        [
            "#define PORTA_ISFR  (reg32)0x400490A0",
            "#define PORTB_ISFR  (reg32)0x4004A0A0",
            "#define PORTC_ISFR  (reg32)0x4004B0A0",
            "#define PORTD_ISFR  (reg32)0x4004C0A0",
            "#define PORTE_ISFR  (reg32)0x4004D0A0",
        ]
    );
    assert_eq!(
        block(&output, "#define GPIOD_PDOR  (reg32)0x400FF0C0"),
        [
            "#define GPIOD_PDOR  (reg32)0x400FF0C0",
            "#define GPIOD_PSOR  (reg32)0x400FF0C4",
            "#define GPIOD_PCOR  (reg32)0x400FF0C8",
            "#define GPIOD_PTOR  (reg32)0x400FF0CC",
            "#define GPIOD_PDIR  (reg32)0x400FF0D0",
            "#define GPIOD_PDDR  (reg32)0x400FF0D4",
        ]
    );
    assert!(output.contains("// Aliased to GPIOD bit-band region\n"));
    assert!(output.contains("// Aliased to PORT ISFR bit-band region\n"));
}

#[test]
fn alias_defines_follow_formula() {
    let output = c_output();
    for (port, letter) in ('A'..='E').enumerate() {
        let pdor = 0x400F_F000 + 0x40 * port as u32;
        for bit in 0..32u32 {
            let alias = ((pdor - 0x4000_0000) * 32) + bit * 4 + 0x4200_0000;
            let name = format!("GPIO{letter}_PDOR{bit}");
            let line = format!("#define {name:<14}(reg32)0x{alias:X}\n");
            assert!(output.contains(&line), "missing {line}");
        }
    }
}

#[test]
fn arrays_have_five_rows_of_32() {
    let output = c_output();
    let arrays = [
        "reg32 PORT::_s_port_pcr[5][32] =",
        "reg32 PORT::_s_port_isfr[5][32] =",
        "reg32 GPIO::_s_gpio_pdor[5][32] =",
        "reg32 GPIO::_s_gpio_psor[5][32] =",
        "reg32 GPIO::_s_gpio_pcor[5][32] =",
        "reg32 GPIO::_s_gpio_ptor[5][32] =",
        "reg32 GPIO::_s_gpio_pdir[5][32] =",
        "reg32 GPIO::_s_gpio_pddr[5][32] =",
    ];
    for header in arrays {
        let body = block(&output, header);
        assert_eq!(body.first(), Some(&header));
        assert_eq!(body.last(), Some(&"};"));
        // header, braces, 5 * (open, 8 lines of 4, close)
        assert_eq!(body.len(), 3 + 5 * 10, "{header}");
        let entries: Vec<&str> = body
            .iter()
            .filter(|line| line.starts_with("        "))
            .flat_map(|line| line.split(','))
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .collect();
        assert_eq!(entries.len(), 160);
        // `_s_gpio_pdor` holds `GPIOx_PDORn`
        let array = header
            .split("_s_")
            .nth(1)
            .and_then(|rest| rest.split('[').next())
            .unwrap()
            .to_uppercase();
        let (class, register) = array.split_once('_').unwrap();
        for (i, entry) in entries.iter().enumerate() {
            let (port, pin) = (i / 32, i % 32);
            let letter = (b'A' + port as u8) as char;
            assert_eq!(*entry, format!("{class}{letter}_{register}{pin}"));
        }
    }
}

#[test]
fn array_row_layout() {
    let output = c_output();
    let body = block(&output, "reg32 PORT::_s_port_pcr[5][32] =");
    assert_eq!(
        body[..6],
        [
            "reg32 PORT::_s_port_pcr[5][32] =",
            "{",
            "    {",
            "        PORTA_PCR0,   PORTA_PCR1,   PORTA_PCR2,   PORTA_PCR3,",
            "        PORTA_PCR4,   PORTA_PCR5,   PORTA_PCR6,   PORTA_PCR7,",
            "        PORTA_PCR8,   PORTA_PCR9,   PORTA_PCR10,  PORTA_PCR11,",
        ]
    );
}

#[test]
fn rust_output() {
    let output = gen_pin_regs(Target::Rust).unwrap();
    assert!(output.starts_with("// @generated by pin_regs, do not edit\n"));
    assert!(output.contains("pub const PORTB_ISFR: u32 = 0x4004_A0A0;"));
    assert!(output.contains("pub const GPIOE_PDDR3: u32 = 0x43FE_228C;"));
    assert!(output.contains("pub static PORT_PCR: [[u32; 32]; 5] = ["));
}
