use crate::{
    Error,
    config::{Config, MAX_PACKET_LEN, MAX_SEND_LEN},
    peripheral::{SerialPeripheral, KeepAlive},
    transport::ByteTransport,
    framing::{PacketReceiver, PacketTransmitter},
    };


/**
    one uart packet channel, as used by the command layer of a firmware updater

    `RX` bounds received payloads and `TX` bounds sent payloads. The owning loop is expected to call [receive_packet](Self::receive_packet) often enough that no byte is overwritten in the peripheral before being read, this channel cannot detect it.

    ```ignore
    let mut uart: Uart<_, _> = Uart::new(peripheral, || watchdog.feed(), &Config::default())?;
    let mut request = [0; MAX_PACKET_LEN];
    loop {
        if let Some(size) = uart.receive_packet(&mut request) {
            let response = process(&request[.. size]);
            uart.transmit_packet(response)?;
        }
        other_duties();
    }
    ```
*/
pub struct Uart<P, K, const RX: usize = MAX_PACKET_LEN, const TX: usize = MAX_SEND_LEN> {
    transport: ByteTransport<P, K>,
    receiver: PacketReceiver<RX>,
    transmitter: PacketTransmitter<TX>,
}

impl<P: SerialPeripheral, K: KeepAlive, const RX: usize, const TX: usize> Uart<P, K, RX, TX> {
    /// initialize the peripheral, this must be done once before any exchange
    pub fn new(peripheral: P, keep_alive: K, config: &Config) -> Result<Self, Error> {
        Ok(Self {
            transport: ByteTransport::new(peripheral, keep_alive, config)?,
            receiver: PacketReceiver::new(),
            transmitter: PacketTransmitter::new(),
        })
    }
    /// send a whole packet, returning once its last byte is handed to the peripheral
    pub fn transmit_packet(&mut self, data: &[u8]) -> Result<(), Error> {
        self.transmitter.send(&mut self.transport, data)
    }
    /// make progress on reception, returning the payload size once a packet is complete
    pub fn receive_packet(&mut self, data: &mut [u8; RX]) -> Option<usize> {
        self.receiver.poll(&mut self.transport, data)
    }

    pub fn transport(&self) -> &ByteTransport<P, K> {&self.transport}
    pub fn transport_mut(&mut self) -> &mut ByteTransport<P, K> {&mut self.transport}
    pub fn receiver(&self) -> &PacketReceiver<RX> {&self.receiver}

    /// give back the peripheral and keep-alive, dropping any packet in progress
    pub fn release(self) -> (P, K) {
        self.transport.release()
    }
}

#[cfg(feature = "stm32")]
impl<K: KeepAlive, const RX: usize, const TX: usize> Uart<crate::registers::Usart, K, RX, TX> {
    /**
        initialize the memory-mapped USART selected by `config.channel`

        # Safety

        same as [Usart::steal](crate::registers::Usart::steal)
    */
    pub unsafe fn stm32(keep_alive: K, config: &Config) -> Result<Self, Error> {
        // SAFETY: forwarded to the caller
        let usart = unsafe {crate::registers::Usart::steal(config)};
        Self::new(usart, keep_alive, config)
    }
}
