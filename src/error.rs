use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("unsupported bus frequency {0} Hz, expected 36000000 or 48000000")]
    UnsupportedBusFrequency(u32),
    #[error("unknown output target `{0}`, expected `c` or `rust`")]
    UnknownTarget(String),
}
