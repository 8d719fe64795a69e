use embedded_io::{Read, Write, ReadReady, WriteReady};
use uartboot::{
    Config, Channel, Error, Uart,
    config::MAX_PACKET_LEN,
    transport::ByteTransport,
    mock::{MockPeripheral, MockKeepAlive, Event},
    };


fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn uart() -> Uart<MockPeripheral, MockKeepAlive> {
    init_logger();
    let config = Config::default().with_channel(Channel::Usart2);
    Uart::new(MockPeripheral::new().with_busy_polls(1), MockKeepAlive::default(), &config)
        .expect("failed to initialize uart")
}


#[test]
fn request_response_over_loopback() {
    let mut host = uart();
    let mut device = uart();
    let mut buffer = [0; MAX_PACKET_LEN];

    // host sends a request, bytes travel to the device one by one
    host.transmit_packet(b"\xff\x00connect").unwrap();
    let wire = host.transport().peripheral().written();
    assert_eq!(wire[0], 9);

    let mut received = None;
    for byte in wire {
        assert!(received.is_none());
        device.transport_mut().peripheral_mut().feed(&[byte]);
        received = device.receive_packet(&mut buffer);
    }
    let size = received.expect("device did not receive the request");
    assert_eq!(&buffer[.. size], b"\xff\x00connect");

    // device answers
    device.transmit_packet(&[0xff, 0x10]).unwrap();
    let wire = device.transport().peripheral().written();
    host.transport_mut().peripheral_mut().feed(&wire);
    let mut answer = None;
    while answer.is_none() {
        answer = host.receive_packet(&mut buffer);
    }
    assert_eq!(answer, Some(2));
    assert_eq!(&buffer[.. 2], &[0xff, 0x10]);
    assert_eq!(device.receiver().dropped(), 0);
}

#[test]
fn separate_receive_and_transmit_bounds() {
    init_logger();
    let mut uart = Uart::<_, _, 8, 2>::new(MockPeripheral::new(), MockKeepAlive::default(), &Config::default()).unwrap();
    assert_eq!(
        uart.transmit_packet(&[1, 2, 3]),
        Err(Error::PacketTooLong {len: 3, max: 2}));
    uart.transmit_packet(&[1, 2]).unwrap();

    let mut buffer = [0; 8];
    uart.transport_mut().peripheral_mut().feed(&[8, 0, 1, 2, 3, 4, 5, 6, 7]);
    let mut received = None;
    for _ in 0 .. 9 {
        received = uart.receive_packet(&mut buffer);
    }
    assert_eq!(received, Some(8));
    assert_eq!(buffer, [0, 1, 2, 3, 4, 5, 6, 7]);
}

#[test]
fn release_returns_configured_peripheral() {
    let uart = uart();
    let (peripheral, keep_alive) = uart.release();
    assert_eq!(peripheral.divisor(), Some(625));
    assert_eq!(peripheral.events()[2], Event::Enable {transmit: true, receive: true});
    assert_eq!(keep_alive.count, 0);
}

#[test]
fn io_traits() {
    init_logger();
    let mut transport = ByteTransport::new(MockPeripheral::new(), MockKeepAlive::default(), &Config::default()).unwrap();

    assert!(transport.write_ready().unwrap());
    assert_eq!(transport.write(b"abc").unwrap(), 3);
    transport.flush().unwrap();
    assert_eq!(transport.peripheral().written(), b"abc");

    assert!(! transport.read_ready().unwrap());
    transport.peripheral_mut().feed(b"xyz");
    assert!(transport.read_ready().unwrap());
    let mut buffer = [0; 2];
    assert_eq!(transport.read(&mut buffer).unwrap(), 2);
    assert_eq!(&buffer, b"xy");
    let mut buffer = [0; 8];
    assert_eq!(transport.read(&mut buffer).unwrap(), 1);
    assert_eq!(buffer[0], b'z');
    assert_eq!(transport.read(&mut []).unwrap(), 0);

    transport.peripheral_mut().set_stuck(true);
    let error = transport.write(b"d").unwrap_err();
    assert_eq!(embedded_io::Error::kind(&error), embedded_io::ErrorKind::Other);
}
