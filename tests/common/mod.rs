#![allow(dead_code)]

use std::collections::VecDeque;
use std::thread;
use ddcci::edid::{Edid, EDID_LENGTH};
use ddcci::sim::SimulatedMonitor;
use ddcci::{thread_data, IoError, Transport, TransportKind};

/// Runs `f` on a new thread whose protocol sleeps are all zero.
///
/// Per-thread retry and sleep settings start from the process defaults, so
/// every test gets its own.
pub fn on_fresh_thread<F: FnOnce() + Send + 'static>(f: F) {
    thread::spawn(move || {
        thread_data::set_thread_sleep_multiplier(0.0);
        f()
    }).join().unwrap();
}

pub fn edid_block(model: &str, serial: &str) -> [u8; EDID_LENGTH] {
    Edid::synthesize("DEL", model, serial, 0xa0bb).unwrap()
}

pub const CAPABILITIES: &str = "(prot(monitor)type(LCD)model(XYZ)vcp(10 14 16))";

/// A monitor with brightness, contrast and an input source.
pub fn monitor() -> SimulatedMonitor {
    SimulatedMonitor::new()
        .with_edid(edid_block("DELL U2415", "7MT0186"))
        .with_feature(0x10, 100, 50)
        .with_feature(0x12, 100, 75)
        .with_nc_feature(0x60, 0x12, 0x0f)
        .with_feature(0xdf, 0x0202, 0x0202)
        .with_capabilities(CAPABILITIES)
}

/// A transport that answers every DDC/CI read with canned bytes.
#[derive(Debug, Default)]
pub struct Scripted {
    pub writes: Vec<Vec<u8>>,
    pub replies: VecDeque<Vec<u8>>,
}

impl Scripted {
    pub fn replying(replies: &[&[u8]]) -> Self {
        Scripted {
            writes: Vec::new(),
            replies: replies.iter().map(|r| r.to_vec()).collect(),
        }
    }
}

impl Transport for Scripted {
    fn kind(&self) -> TransportKind {
        TransportKind::I2c
    }

    fn set_slave_address(&mut self, _address: u16) -> Result<(), IoError> {
        Ok(())
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), IoError> {
        self.writes.push(bytes.to_vec());
        Ok(())
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<(), IoError> {
        let reply = self.replies.pop_front().unwrap_or_default();
        for (i, b) in buf.iter_mut().enumerate() {
            *b = reply.get(i).cloned().unwrap_or(0);
        }
        Ok(())
    }
}
