use log::*;

use crate::{
    Error,
    config::Config,
    peripheral::{SerialPeripheral, KeepAlive},
    };


/**
    byte level access to an initialized uart peripheral

    receiving never waits. Sending waits for the holding register to be free again, servicing the keep-alive meanwhile. That wait has no timeout: a peripheral that never becomes ready again hangs the caller until the watchdog resets the device.
*/
pub struct ByteTransport<P, K> {
    peripheral: P,
    keep_alive: K,
}

impl<P: SerialPeripheral, K: KeepAlive> ByteTransport<P, K> {
    /**
        configure the peripheral and take ownership of it

        all configuration registers are reset first, which leaves the frame format at 8 data bits, 1 stop bit and no parity, then the divisor is written and both directions are enabled.
        Only a config with no valid divisor can fail, and then the peripheral is left untouched.
    */
    pub fn new(mut peripheral: P, keep_alive: K, config: &Config) -> Result<Self, Error> {
        let divisor = config.divisor()?;
        peripheral.reset_control_registers();
        peripheral.configure_divisor(divisor);
        peripheral.enable(true, true);
        debug!("uart {:?} initialized at {} bauds, divisor {}", config.channel, config.baud_rate, divisor);
        Ok(Self {peripheral, keep_alive})
    }

    /// return the received byte if there is one, checking the peripheral only once
    pub fn try_receive_byte(&mut self) -> Option<u8> {
        if ! self.peripheral.receive_ready()
            {return None}
        let data = self.peripheral.read_data();
        trace!("received {:#04x}", data);
        Some(data)
    }

    /// send one byte and wait until the peripheral can accept the next one
    pub fn send_byte(&mut self, data: u8) -> Result<(), Error> {
        if ! self.peripheral.transmit_ready() {
            error!("transmit holding register busy before sending {:#04x}", data);
            return Err(Error::NotReady);
        }
        self.peripheral.write_data(data);
        trace!("sent {:#04x}", data);
        while ! self.peripheral.transmit_ready() {
            self.keep_alive.service();
        }
        Ok(())
    }

    /// service the keep-alive once, for callers looping around the transport
    pub fn service_keep_alive(&mut self) {
        self.keep_alive.service();
    }

    pub fn peripheral(&self) -> &P {&self.peripheral}
    pub fn peripheral_mut(&mut self) -> &mut P {&mut self.peripheral}
    pub fn keep_alive(&self) -> &K {&self.keep_alive}

    /// give back the peripheral and keep-alive, the peripheral stays configured
    pub fn release(self) -> (P, K) {
        (self.peripheral, self.keep_alive)
    }
}
