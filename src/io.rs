/*!
    blocking [embedded_io] traits over a [ByteTransport], for code written against the generic io traits rather than packets
*/

use embedded_io::{ErrorType, ErrorKind, Read, Write, ReadReady, WriteReady};

use crate::{
    Error,
    peripheral::{SerialPeripheral, KeepAlive},
    transport::ByteTransport,
    };


impl embedded_io::Error for Error {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::NotReady => ErrorKind::Other,
            Self::PacketTooLong {..} | Self::InvalidBaudRate(_) => ErrorKind::InvalidInput,
        }
    }
}

impl<P: SerialPeripheral, K: KeepAlive> ErrorType for ByteTransport<P, K> {
    type Error = Error;
}

impl<P: SerialPeripheral, K: KeepAlive> Read for ByteTransport<P, K> {
    /// wait for at least one byte, servicing the keep-alive, then take what is immediately available
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        if buf.is_empty()
            {return Ok(0)}
        buf[0] = loop {
            if let Some(data) = self.try_receive_byte()
                {break data}
            self.service_keep_alive();
        };
        let mut size = 1;
        while size < buf.len() {
            match self.try_receive_byte() {
                Some(data) => buf[size] = data,
                None => break,
            }
            size += 1;
        }
        Ok(size)
    }
}

impl<P: SerialPeripheral, K: KeepAlive> Write for ByteTransport<P, K> {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Error> {
        for &data in buf {
            self.send_byte(data)?;
        }
        Ok(buf.len())
    }
    /// every byte is already in the peripheral when `write` returns
    fn flush(&mut self) -> Result<(), Error> {
        Ok(())
    }
}

impl<P: SerialPeripheral, K: KeepAlive> ReadReady for ByteTransport<P, K> {
    fn read_ready(&mut self) -> Result<bool, Error> {
        Ok(self.peripheral_mut().receive_ready())
    }
}

impl<P: SerialPeripheral, K: KeepAlive> WriteReady for ByteTransport<P, K> {
    fn write_ready(&mut self) -> Result<bool, Error> {
        Ok(self.peripheral_mut().transmit_ready())
    }
}
