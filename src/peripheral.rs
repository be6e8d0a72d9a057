//! Static PORT and GPIO register map of the MK20DX256.

/// Pins per port, and bits per 32-bit register.
pub const PINS_PER_PORT: u32 = 32;

const PORT_BASE: u32 = 0x4004_9000;
const PORT_STRIDE: u32 = 0x1000;
const PORT_ISFR_OFFSET: u32 = 0xA0;

const GPIO_BASE: u32 = 0x400F_F000;
const GPIO_STRIDE: u32 = 0x40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Port {
    A,
    B,
    C,
    D,
    E,
}

impl Port {
    /// All ports, alphabetical.
    pub const ALL: [Port; 5] = [Port::A, Port::B, Port::C, Port::D, Port::E];

    pub fn index(self) -> u32 {
        self as u32
    }

    pub fn letter(self) -> char {
        (b'A' + self as u8) as char
    }

    /// Base of the PORTx module, which is also the address of `PORTx_PCR0`.
    pub fn pcr_base(self) -> u32 {
        PORT_BASE + PORT_STRIDE * self.index()
    }

    pub fn pcr(self, pin: u32) -> u32 {
        debug_assert!(pin < PINS_PER_PORT);
        self.pcr_base() + pin * 4
    }

    pub fn isfr(self) -> u32 {
        self.pcr_base() + PORT_ISFR_OFFSET
    }

    pub fn gpio_base(self) -> u32 {
        GPIO_BASE + GPIO_STRIDE * self.index()
    }

    pub fn gpio(self, reg: GpioRegister) -> u32 {
        self.gpio_base() + reg.offset()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GpioRegister {
    /// Port Data Output Register
    Pdor,
    /// Port Set Output Register
    Psor,
    /// Port Clear Output Register
    Pcor,
    /// Port Toggle Output Register
    Ptor,
    /// Port Data Input Register
    Pdir,
    /// Port Data Direction Register
    Pddr,
}

impl GpioRegister {
    /// Ascending address order inside a GPIO module.
    pub const ALL: [GpioRegister; 6] = [
        GpioRegister::Pdor,
        GpioRegister::Psor,
        GpioRegister::Pcor,
        GpioRegister::Ptor,
        GpioRegister::Pdir,
        GpioRegister::Pddr,
    ];

    pub fn offset(self) -> u32 {
        self as u32 * 4
    }

    pub fn name(self) -> &'static str {
        match self {
            GpioRegister::Pdor => "PDOR",
            GpioRegister::Psor => "PSOR",
            GpioRegister::Pcor => "PCOR",
            GpioRegister::Ptor => "PTOR",
            GpioRegister::Pdir => "PDIR",
            GpioRegister::Pddr => "PDDR",
        }
    }
}
