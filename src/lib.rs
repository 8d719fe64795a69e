/*!
    length-prefixed packet transport over a polled uart, as used by resident firmware updaters.
    
    The byte level lives in [transport::ByteTransport], packets are assembled by [framing::PacketReceiver] and sent by [framing::PacketTransmitter::send]. [channel::Uart] bundles both for the command layer above.
    
    Nothing here owns a thread or an interrupt: receiving is done by polling, sending busy-waits on the peripheral while servicing a [peripheral::KeepAlive].
*/
#![no_std]
#[cfg(feature = "std")]
extern crate std;

mod error;

pub mod peripheral;
pub mod config;
pub mod registers;
pub mod transport;
pub mod framing;
pub mod channel;
#[cfg(feature = "io")]
pub mod io;
#[cfg(feature = "mock")]
pub mod mock;

pub use error::Error;
pub use config::{Config, Channel};
pub use channel::Uart;
