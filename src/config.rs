/*!
    boot time settings of the uart channel

    packet size bounds are const generics of [crate::framing] and [crate::Uart] since they size buffers, the constants here are only their defaults.
*/

use crate::Error;


/// default bound for received packets payload
pub const MAX_PACKET_LEN: usize = 64;
/// default bound for transmitted packets payload
pub const MAX_SEND_LEN: usize = 64;


/// uart peripheral instance, only these two are supported by the memory-mapped backend
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Channel {
    #[default]
    Usart1,
    Usart2,
}

/// uart channel settings, fixed once the transport is initialized
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// cpu core clock, the peripheral clock is half of it on this platform
    pub core_clock_khz: u32,
    /// target baud rate in bits per second
    pub baud_rate: u32,
    /// peripheral instance to use
    pub channel: Channel,
}
impl Default for Config {
    fn default() -> Self {
        Self {
            core_clock_khz: 72_000,
            baud_rate: 57_600,
            channel: Channel::Usart1,
        }
    }
}
impl Config {
    pub fn with_core_clock_khz(mut self, core_clock_khz: u32) -> Self {
        self.core_clock_khz = core_clock_khz;
        self
    }
    pub fn with_baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }
    pub fn with_channel(mut self, channel: Channel) -> Self {
        self.channel = channel;
        self
    }

    /// clock feeding the uart peripheral
    pub fn peripheral_clock_khz(&self) -> u32 {
        self.core_clock_khz / 2
    }
    /// baud rate divisor register value, rounded to nearest
    pub fn divisor(&self) -> Result<u16, Error> {
        if self.baud_rate == 0
            {return Err(Error::InvalidBaudRate(self.baud_rate))}
        let clock = u64::from(self.peripheral_clock_khz()) * 1000;
        let baud = u64::from(self.baud_rate);
        let divisor = (clock + baud/2) / baud;
        match u16::try_from(divisor) {
            Ok(0) | Err(_) => Err(Error::InvalidBaudRate(self.baud_rate)),
            Ok(divisor) => Ok(divisor),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn divisor_of_default_clock() {
        let config = Config::default();
        assert_eq!(config.peripheral_clock_khz(), 36_000);
        assert_eq!(config.divisor(), Ok(625));
    }

    #[test]
    fn divisor_rounds_to_nearest() {
        // 36 MHz / 115200 = 312.5
        let config = Config::default().with_baud_rate(115_200);
        assert_eq!(config.divisor(), Ok(313));
        // 8 MHz / 9600 = 833.33
        let config = Config::default().with_core_clock_khz(16_000).with_baud_rate(9_600);
        assert_eq!(config.divisor(), Ok(833));
    }

    #[test]
    fn divisor_out_of_register() {
        assert_eq!(
            Config::default().with_baud_rate(0).divisor(),
            Err(Error::InvalidBaudRate(0)));
        assert_eq!(
            Config::default().with_baud_rate(300).divisor(),
            Err(Error::InvalidBaudRate(300)));
        assert_eq!(
            Config::default().with_core_clock_khz(2).with_baud_rate(4_000_000).divisor(),
            Err(Error::InvalidBaudRate(4_000_000)));
    }
}
