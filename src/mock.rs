/*!
    test doubles standing for the hardware

    [MockPeripheral] records every register access as an [Event] so tests can check ordering, and can simulate a slow or stuck transmitter. [MockKeepAlive] counts how often it was serviced.
*/

use std::{
    vec::Vec,
    collections::VecDeque,
    };

use crate::peripheral::{SerialPeripheral, KeepAlive};


/// access made to a [MockPeripheral]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Event {
    Reset,
    Divisor(u16),
    Enable {transmit: bool, receive: bool},
    /// receive-ready flag checked, with the value returned
    ReceiveReadyCheck(bool),
    /// transmit-ready flag checked, with the value returned
    TransmitReadyCheck(bool),
    Read(u8),
    Write(u8),
}

/// in-memory peripheral, bytes fed to it are received one at a time
#[derive(Debug, Default)]
pub struct MockPeripheral {
    incoming: VecDeque<u8>,
    events: Vec<Event>,
    /// number of not-ready polls following every write
    busy_polls: usize,
    busy: usize,
    stuck: bool,
    /// number of writes after which the transmitter gets stuck
    stuck_after: Option<usize>,
    writes: usize,
}

impl MockPeripheral {
    pub fn new() -> Self {
        Self::default()
    }
    /// after each written byte, report the transmitter busy for this many checks
    pub fn with_busy_polls(mut self, polls: usize) -> Self {
        self.busy_polls = polls;
        self
    }
    /// when stuck, the transmitter reports busy whenever a new byte is about to be written
    pub fn set_stuck(&mut self, stuck: bool) {
        self.stuck = stuck;
    }

    /// let this many bytes through, then get stuck as with [set_stuck](Self::set_stuck)
    pub fn with_stuck_after(mut self, writes: usize) -> Self {
        self.stuck_after = Some(writes);
        self
    }

    /// queue bytes as if they arrived on the line
    pub fn feed(&mut self, data: &[u8]) {
        self.incoming.extend(data);
    }
    /// bytes arrived but not read yet
    pub fn pending(&self) -> usize {
        self.incoming.len()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }
    pub fn clear_events(&mut self) {
        self.events.clear();
    }
    /// every byte written to the data register, in order
    pub fn written(&self) -> Vec<u8> {
        self.events.iter()
            .filter_map(|event| match event {
                Event::Write(data) => Some(*data),
                _ => None,
                })
            .collect()
    }
    /// last divisor configured
    pub fn divisor(&self) -> Option<u16> {
        self.events.iter().rev()
            .find_map(|event| match event {
                Event::Divisor(divisor) => Some(*divisor),
                _ => None,
                })
    }
}

impl SerialPeripheral for MockPeripheral {
    fn configure_divisor(&mut self, divisor: u16) {
        self.events.push(Event::Divisor(divisor));
    }
    fn reset_control_registers(&mut self) {
        self.events.push(Event::Reset);
    }
    fn enable(&mut self, transmit: bool, receive: bool) {
        self.events.push(Event::Enable {transmit, receive});
    }
    fn receive_ready(&mut self) -> bool {
        let ready = ! self.incoming.is_empty();
        self.events.push(Event::ReceiveReadyCheck(ready));
        ready
    }
    fn transmit_ready(&mut self) -> bool {
        let ready = if self.busy > 0 {
            self.busy -= 1;
            self.busy == 0
        }
        else {
            ! self.stuck
        };
        self.events.push(Event::TransmitReadyCheck(ready));
        ready
    }
    fn read_data(&mut self) -> u8 {
        // like hardware, reading an empty register gives whatever was left there
        let data = self.incoming.pop_front().unwrap_or(0);
        self.events.push(Event::Read(data));
        data
    }
    fn write_data(&mut self, data: u8) {
        self.events.push(Event::Write(data));
        self.busy = self.busy_polls + 1;
        self.writes += 1;
        if self.stuck_after == Some(self.writes) {
            self.stuck = true;
        }
    }
}


/// keep-alive counting its services
#[derive(Debug, Default)]
pub struct MockKeepAlive {
    pub count: usize,
}

impl KeepAlive for MockKeepAlive {
    fn service(&mut self) {
        self.count += 1;
    }
}
