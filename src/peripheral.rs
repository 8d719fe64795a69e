/*!
    capabilities this crate consumes from the platform
    
    a [SerialPeripheral] is the raw byte-oriented uart, a [KeepAlive] is whatever keeps the watchdog from resetting the device.
*/

/**
    raw byte-oriented serial peripheral with a single-byte holding register in each direction
    
    methods take `&mut self` because reading status or data registers may have side effects on hardware
*/
pub trait SerialPeripheral {
    /// write the baud rate divisor register
    fn configure_divisor(&mut self, divisor: u16);
    /// put every configuration register back to its neutral value, which means 8 data bits, 1 stop bit, no parity
    fn reset_control_registers(&mut self);
    /// enable the peripheral with the requested directions
    fn enable(&mut self, transmit: bool, receive: bool);
    /// a received byte is waiting in the data register
    fn receive_ready(&mut self) -> bool;
    /// the transmit holding register can accept a new byte
    fn transmit_ready(&mut self) -> bool;
    /// consume the received byte, clearing the receive-ready flag
    fn read_data(&mut self) -> u8;
    /// put a byte in the transmit holding register
    fn write_data(&mut self, data: u8);
}

impl<P: SerialPeripheral + ?Sized> SerialPeripheral for &mut P {
    fn configure_divisor(&mut self, divisor: u16)  {(**self).configure_divisor(divisor)}
    fn reset_control_registers(&mut self)  {(**self).reset_control_registers()}
    fn enable(&mut self, transmit: bool, receive: bool)  {(**self).enable(transmit, receive)}
    fn receive_ready(&mut self) -> bool  {(**self).receive_ready()}
    fn transmit_ready(&mut self) -> bool  {(**self).transmit_ready()}
    fn read_data(&mut self) -> u8  {(**self).read_data()}
    fn write_data(&mut self, data: u8)  {(**self).write_data(data)}
}

/// periodic signal preventing an external watchdog from resetting the device, it must be serviced in every busy-wait iteration
pub trait KeepAlive {
    fn service(&mut self);
}

impl<F: FnMut()> KeepAlive for F {
    fn service(&mut self) {
        self()
    }
}
