//! Rust rendering of the same tables, for firmware written in Rust.

use proc_macro2::{Ident, Literal, TokenStream};
use quote::{format_ident, quote};

use crate::ctar::{BusFrequency, CtarTables, Timing, TimingTable, FIELDS};
use crate::helper::{doc_lines, hex_literal};
use crate::peripheral::PINS_PER_PORT;
use crate::register::{PinRegisters, RegisterArray};

pub fn gen_pin_regs(registers: &PinRegisters) -> TokenStream {
    let defines = registers.definitions().map(|reg| {
        let name = format_ident!("{}", reg.name);
        let addr = hex_literal(reg.addr);
        quote! { pub const #name: u32 = #addr; }
    });
    let arrays = registers.arrays().map(gen_array);
    quote! {
        #(#defines)*
        #(#arrays)*
    }
}

fn gen_array(array: RegisterArray) -> TokenStream {
    let name = format_ident!("{}", array.kind.array_name().to_uppercase());
    let doc = format!(
        " `{}` address of every pin, indexed by port then pin.",
        array.kind.register()
    );
    let ports = Literal::usize_unsuffixed(array.rows.len());
    let pins = Literal::u32_unsuffixed(PINS_PER_PORT);
    let rows = array.rows.iter().map(|row| {
        let pins = row.pins.iter().map(|pin| format_ident!("{}", pin.name));
        quote! { [#(#pins),*] }
    });
    quote! {
        #[doc = #doc]
        pub static #name: [[u32; #pins]; #ports] = [#(#rows),*];
    }
}

fn bus_variant(bus: BusFrequency) -> Ident {
    format_ident!("Mhz{}", bus.hz() / 1_000_000)
}

pub fn gen_spi_ctar(buses: &[CtarTables]) -> TokenStream {
    let fields = FIELDS.iter().map(|field| {
        let shift = format_ident!("SPI_CTAR_{}_SHIFT", field.name);
        let mask = format_ident!("SPI_CTAR_{}_MASK", field.name);
        let shift_value = Literal::u32_unsuffixed(field.shift);
        let mask_value = hex_literal(field.mask());
        quote! {
            pub const #shift: u32 = #shift_value;
            pub const #mask: u32 = #mask_value;
        }
    });
    let bus_frequency = gen_bus_frequency(buses);
    let cta = gen_cta();
    let selectors = Timing::ALL
        .iter()
        .map(|&timing| gen_selector(timing, buses));
    quote! {
        #(#fields)*
        #bus_frequency
        #cta
        #(#selectors)*
    }
}

fn gen_bus_frequency(buses: &[CtarTables]) -> TokenStream {
    let variants: Vec<_> = buses.iter().map(|tables| bus_variant(tables.bus)).collect();
    let hz: Vec<_> = buses
        .iter()
        .map(|tables| Literal::u32_unsuffixed(tables.bus.hz()))
        .collect();
    quote! {
        /// Bus clock the CTAR tables were generated for.
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum BusFrequency {
            #(#variants,)*
        }

        impl BusFrequency {
            pub const fn hz(self) -> u32 {
                match self {
                    #(Self::#variants => #hz,)*
                }
            }
        }

        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct UnsupportedBusFrequency(pub u32);

        impl core::fmt::Display for UnsupportedBusFrequency {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "unsupported bus frequency {} Hz", self.0)
            }
        }

        impl TryFrom<u32> for BusFrequency {
            type Error = UnsupportedBusFrequency;

            fn try_from(hz: u32) -> Result<Self, Self::Error> {
                match hz {
                    #(#hz => Ok(Self::#variants),)*
                    _ => Err(UnsupportedBusFrequency(hz)),
                }
            }
        }
    }
}

fn gen_cta() -> TokenStream {
    let doc = doc_lines([
        "Clock and Transfer Attributes",
        "",
        "`sck` is the SCK frequency in Hz, `t_csc`, `t_asc` and `t_dt` the",
        "PCS to SCK, after SCK and after transfer delays in nanoseconds.",
    ]);
    let vars: Vec<_> = Timing::ALL
        .iter()
        .map(|timing| format_ident!("{}", timing.variable()))
        .collect();
    let funs = Timing::ALL
        .iter()
        .map(|timing| format_ident!("{}", timing.function()));
    quote! {
        #doc
        pub const fn spi_cta(bus: BusFrequency, #(#vars: u32),*) -> u32 {
            #(#funs(bus, #vars))|*
        }
    }
}

fn gen_selector(timing: Timing, buses: &[CtarTables]) -> TokenStream {
    let fun = format_ident!("{}", timing.function());
    let arg = format_ident!("{}", timing.argument());
    let doc = doc_lines(
        timing
            .title()
            .iter()
            .chain([""].iter())
            .chain(timing.description())
            .copied(),
    );
    let arms = buses.iter().map(|tables| {
        let variant = bus_variant(tables.bus);
        let ladder = gen_ladder(tables.table(timing), &arg);
        quote! { BusFrequency::#variant => #ladder, }
    });
    quote! {
        #doc
        pub const fn #fun(bus: BusFrequency, #arg: u32) -> u32 {
            match bus {
                #(#arms)*
            }
        }
    }
}

fn gen_ladder(table: &TimingTable, arg: &Ident) -> TokenStream {
    let op = if table.timing.is_frequency() {
        quote! { >= }
    } else {
        quote! { <= }
    };
    let entries = table.entries();
    let (ladder, last) = entries.split_at(entries.len() - 1);
    let conditions = ladder.iter().map(|entry| {
        let achieved = Literal::u32_unsuffixed(entry.achieved);
        quote! { #arg #op #achieved }
    });
    let bits = ladder
        .iter()
        .map(|entry| hex_literal(entry.encoding.bits()));
    let last = hex_literal(last[0].encoding.bits());
    quote! {
        #(if #conditions { #bits } else)* { #last }
    }
}
