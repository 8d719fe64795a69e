use thiserror::Error;

/// error regarding uart packet transport
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum Error {
    /// transmit holding register was still busy when a byte send started, should not happen on a working peripheral
    #[error("uart transmitter not ready")]
    NotReady,
    /// caller asked to send more than the channel allows
    #[error("packet of {len} bytes exceeds maximum of {max}")]
    PacketTooLong {len: usize, max: usize},
    /// no valid divisor can be derived for this baud rate
    #[error("baud rate {0} cannot be derived from the peripheral clock")]
    InvalidBaudRate(u32),
}
impl Error {
    /// true when the error comes from a misuse by the caller rather than from the peripheral
    pub fn is_contract_violation(&self) -> bool {
        match self {
            Self::NotReady => false,
            Self::PacketTooLong {..} | Self::InvalidBaudRate(_) => true,
        }
    }
}
