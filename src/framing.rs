/*!
    length-prefixed packets over a [ByteTransport]

    on the wire a packet is one [Header] byte giving the payload length, followed by exactly that many payload bytes. There is no delimiter, escaping or checksum: packets follow each other back to back and the length is the only framing.
*/

use packbytes::{FromBytes, ToBytes};
use log::*;

use crate::{
    Error,
    config::{MAX_PACKET_LEN, MAX_SEND_LEN},
    peripheral::{SerialPeripheral, KeepAlive},
    transport::ByteTransport,
    };


/// packet header preceding the payload on the wire
#[derive(Copy, Clone, FromBytes, ToBytes, Debug, Default, PartialEq, Eq)]
pub struct Header {
    /// number of payload bytes following
    pub length: u8,
}


/// where the receiver is in the current packet
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    /// next byte is a header
    AwaitingLength,
    /// payload bytes are stored until `declared` are collected
    CollectingPayload {declared: u8},
    /// the header announced more than the receiver can hold, the payload is skipped to stay aligned with the sender
    Discarding {remaining: u8},
}

/**
    incremental packet assembly, fed by one non-blocking poll at a time

    the receiver holds its state between polls so the owning loop can interleave it with other duties. It never waits: each [poll](Self::poll) consumes at most one byte.

    a header announcing more than `MAX` bytes is rejected, its payload is skipped and counted in [dropped](Self::dropped)
*/
pub struct PacketReceiver<const MAX: usize = MAX_PACKET_LEN> {
    phase: Phase,
    buffer: heapless::Vec<u8, MAX>,
    dropped: u32,
}

impl<const MAX: usize> PacketReceiver<MAX> {
    pub const fn new() -> Self {
        const { assert!(MAX <= u8::MAX as usize, "packet length must fit the one byte header") };
        Self {
            phase: Phase::AwaitingLength,
            buffer: heapless::Vec::new(),
            dropped: 0,
        }
    }

    /**
        make progress on the current packet

        return the payload length once a packet is complete, its payload is then in the first bytes of `out`. Otherwise nothing is written in `out` and `None` is returned, which is also what happens when no data is pending.

        an empty packet completes on the poll following its header, without consuming any byte.
    */
    pub fn poll<P: SerialPeripheral, K: KeepAlive>(
        &mut self,
        transport: &mut ByteTransport<P, K>,
        out: &mut [u8; MAX],
    ) -> Option<usize> {
        match self.phase {
            Phase::AwaitingLength => {
                let header = Header::from_be_bytes([transport.try_receive_byte()?]);
                if usize::from(header.length) > MAX {
                    warn!("dropping packet of {} bytes, above maximum of {}", header.length, MAX);
                    self.dropped = self.dropped.wrapping_add(1);
                    self.phase = Phase::Discarding {remaining: header.length};
                }
                else {
                    self.phase = Phase::CollectingPayload {declared: header.length};
                }
                None
            },
            Phase::CollectingPayload {declared} => {
                let declared = usize::from(declared);
                if self.buffer.len() < declared {
                    let byte = transport.try_receive_byte()?;
                    if self.buffer.push(byte).is_err() {
                        // declared was checked against capacity, reaching here means corrupted state
                        error!("receive buffer full before declared length {}, dropping packet", declared);
                        debug_assert!(false, "payload exceeds receive capacity");
                        self.dropped = self.dropped.wrapping_add(1);
                        self.reset();
                        return None;
                    }
                }
                if self.buffer.len() < declared
                    {return None}

                let size = self.buffer.len();
                out[.. size].copy_from_slice(&self.buffer);
                self.reset();
                debug!("received packet of {} bytes", size);
                Some(size)
            },
            Phase::Discarding {remaining} => {
                transport.try_receive_byte()?;
                self.phase = match remaining.saturating_sub(1) {
                    0 => Phase::AwaitingLength,
                    remaining => Phase::Discarding {remaining},
                };
                None
            },
        }
    }

    /// forget any packet in progress, next byte received is a header
    pub fn reset(&mut self) {
        self.phase = Phase::AwaitingLength;
        self.buffer.clear();
    }

    pub fn phase(&self) -> Phase {self.phase}
    /// payload bytes collected so far in the current packet
    pub fn received(&self) -> usize {self.buffer.len()}
    /// number of packets dropped because they did not fit the receive buffer
    pub fn dropped(&self) -> u32 {self.dropped}
}

impl<const MAX: usize> Default for PacketReceiver<MAX> {
    fn default() -> Self {
        Self::new()
    }
}


/**
    sends packets of at most `MAX` bytes payload

    a send is all or nothing from the caller's point of view: it either returns after the last byte, or fails without retrying and leaves the packet partially sent.
*/
#[derive(Copy, Clone, Debug)]
pub struct PacketTransmitter<const MAX: usize = MAX_SEND_LEN>;

impl<const MAX: usize> PacketTransmitter<MAX> {
    pub const fn new() -> Self {
        const { assert!(MAX <= u8::MAX as usize, "packet length must fit the one byte header") };
        Self
    }

    /**
        send the header then every payload byte, servicing the keep-alive before each payload byte

        a payload longer than `MAX` is a caller bug and is refused before anything is written.
    */
    pub fn send<P: SerialPeripheral, K: KeepAlive>(
        &self,
        transport: &mut ByteTransport<P, K>,
        data: &[u8],
    ) -> Result<(), Error> {
        let too_long = Error::PacketTooLong {len: data.len(), max: MAX};
        if data.len() > MAX {
            error!("refusing to send: {}", too_long);
            return Err(too_long);
        }
        let header = Header {length: u8::try_from(data.len()).map_err(|_| too_long)?};

        for byte in header.to_be_bytes() {
            transport.send_byte(byte)?;
        }
        for &byte in data {
            transport.service_keep_alive();
            transport.send_byte(byte)?;
        }
        debug!("sent packet of {} bytes", data.len());
        Ok(())
    }
}

impl<const MAX: usize> Default for PacketTransmitter<MAX> {
    fn default() -> Self {
        Self::new()
    }
}
