//! A simulated Si446x good enough to exercise the driver end to end.
//!
//! The chip keeps its properties, FIFOs and state behind a shared handle so
//! tests can inspect what the driver did and stage what it should read.

#![allow(dead_code)]

use std::{
    cell::RefCell,
    collections::{HashMap, VecDeque},
    convert::Infallible,
    rc::Rc,
};

use embedded_hal::{digital, spi};
use embedded_hal_mock::eh1::delay::NoopDelay;
use si446x::{Config, Device};

pub const FIFO_SIZE: usize = 64;

pub struct ChipState {
    /// Property values keyed by `group << 8 | index`
    pub properties: HashMap<u16, u8>,
    /// Raw state code reported by REQUEST_DEVICE_STATE
    pub state: u8,
    /// REQUEST_DEVICE_STATE polls left before a booted chip reports READY
    pub polls_until_ready: u8,
    /// Response to the last command
    pub response: Vec<u8>,
    /// Whether READ_CMD_BUFF leads with the 0xFF ready marker
    pub response_ready: bool,
    pub tx_fifo: Vec<u8>,
    pub rx_fifo: VecDeque<u8>,
    /// Bytes written in every transaction, in order
    pub frames: Vec<Vec<u8>>,
    pub rssi_raw: u8,
    pub cts: bool,
    /// Hold CTS low for good once this many frames have been clocked
    pub stall_after_frames: Option<usize>,
}

impl Default for ChipState {
    fn default() -> Self {
        Self {
            properties: HashMap::new(),
            state: 0x2,
            polls_until_ready: 0,
            response: Vec::new(),
            response_ready: true,
            tx_fifo: Vec::new(),
            rx_fifo: VecDeque::new(),
            frames: Vec::new(),
            rssi_raw: 0,
            cts: true,
            stall_after_frames: None,
        }
    }
}

impl ChipState {
    fn cts_high(&self) -> bool {
        self.cts
            && self
                .stall_after_frames
                .map_or(true, |limit| self.frames.len() < limit)
    }

    /// Frames that started with `opcode`
    pub fn frames_with(&self, opcode: u8) -> Vec<Vec<u8>> {
        self.frames
            .iter()
            .filter(|frame| frame.first() == Some(&opcode))
            .cloned()
            .collect()
    }

    fn read_byte(&mut self, opcode: u8, position: usize) -> u8 {
        match opcode {
            0x44 if position == 0 => {
                if self.response_ready {
                    0xFF
                } else {
                    0x00
                }
            }
            0x44 => self.response.get(position - 1).copied().unwrap_or(0),
            0x77 => self.rx_fifo.pop_front().unwrap_or(0),
            0x50 => self.rssi_raw,
            0x00 => 0xFF,
            _ => 0,
        }
    }

    fn process(&mut self, frame: &[u8]) {
        let Some(&opcode) = frame.first() else {
            return;
        };

        match opcode {
            // POWER_UP
            0x02 => {
                self.state = 0x2;
                self.polls_until_ready = 2;
            }
            // PART_INFO
            0x01 => self.response = vec![0x11, 0x44, 0x63, 0x00, 0x86, 0x00, 0x00, 0x06],
            // FUNC_INFO
            0x10 => self.response = vec![0x01, 0x02, 0x03, 0x00, 0x00, 0x01, 0x00],
            // SET_PROPERTY
            0x11 => {
                let (group, count, index) = (frame[1], frame[2], frame[3]);
                for (offset, &value) in frame[4..4 + usize::from(count)].iter().enumerate() {
                    let id = u16::from_be_bytes([group, index + offset as u8]);
                    self.properties.insert(id, value);
                }
            }
            // GET_PROPERTY
            0x12 => {
                let (group, count, index) = (frame[1], frame[2], frame[3]);
                self.response = vec![count];
                for offset in 0..count {
                    let id = u16::from_be_bytes([group, index + offset]);
                    self.response
                        .push(self.properties.get(&id).copied().unwrap_or(0));
                }
            }
            // GPIO_PIN_CFG echoes the configuration back
            0x13 => {
                self.response = frame[1..].to_vec();
                self.response.push(0);
            }
            // FIFO_INFO
            0x15 => {
                if frame[1] & 0x01 != 0 {
                    self.tx_fifo.clear();
                }
                if frame[1] & 0x02 != 0 {
                    self.rx_fifo.clear();
                }
                self.response = vec![
                    self.rx_fifo.len() as u8,
                    (FIFO_SIZE - self.tx_fifo.len()) as u8,
                    0,
                ];
            }
            // PACKET_INFO
            0x16 => self.response = vec![0x00, self.rx_fifo.len() as u8, 0x00],
            // GET_INT_STATUS
            0x20 => self.response = vec![0x01, 0x01, 0x10, 0x10, 0, 0, 0x04, 0x04, 0],
            // START_TX
            0x31 => self.state = 0x7,
            // START_RX
            0x32 => self.state = 0x8,
            // REQUEST_DEVICE_STATE
            0x33 => {
                if self.polls_until_ready > 0 {
                    self.polls_until_ready -= 1;
                    if self.polls_until_ready == 0 {
                        self.state = 0x3;
                    }
                }
                self.response = vec![self.state, 0x00, 0x00];
            }
            // CHANGE_STATE
            0x34 => self.state = frame[1],
            // WRITE_TX_FIFO
            0x66 => self.tx_fifo.extend_from_slice(&frame[1..]),
            _ => {}
        }
    }
}

#[derive(Clone, Default)]
pub struct SimChip(pub Rc<RefCell<ChipState>>);

impl spi::ErrorType for SimChip {
    type Error = Infallible;
}

impl spi::SpiDevice for SimChip {
    fn transaction(
        &mut self,
        operations: &mut [spi::Operation<'_, u8>],
    ) -> Result<(), Self::Error> {
        let mut chip = self.0.borrow_mut();
        let mut written: Vec<u8> = Vec::new();
        let mut position = 0;

        for operation in operations.iter_mut() {
            match operation {
                spi::Operation::Write(bytes) => written.extend_from_slice(bytes),
                spi::Operation::Read(buf) => {
                    let opcode = written.first().copied().unwrap_or(0);
                    for byte in buf.iter_mut() {
                        *byte = chip.read_byte(opcode, position);
                        position += 1;
                    }
                }
                spi::Operation::Transfer(read, write) => {
                    written.extend_from_slice(write);
                    let opcode = written.first().copied().unwrap_or(0);
                    for byte in read.iter_mut() {
                        *byte = chip.read_byte(opcode, position);
                        position += 1;
                    }
                }
                spi::Operation::TransferInPlace(buf) => {
                    written.extend_from_slice(buf);
                    let opcode = written.first().copied().unwrap_or(0);
                    for byte in buf.iter_mut() {
                        *byte = chip.read_byte(opcode, position);
                        position += 1;
                    }
                }
                spi::Operation::DelayNs(_) => {}
            }
        }

        chip.process(&written);
        chip.frames.push(written);
        Ok(())
    }
}

/// CTS line driven by the simulated chip
#[derive(Clone)]
pub struct SimCts(pub Rc<RefCell<ChipState>>);

impl digital::ErrorType for SimCts {
    type Error = Infallible;
}

impl digital::InputPin for SimCts {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.0.borrow().cts_high())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.0.borrow().cts_high())
    }
}

/// Shutdown line; holding it high powers the simulated chip down
#[derive(Clone)]
pub struct SimSdn(pub Rc<RefCell<ChipState>>);

impl digital::ErrorType for SimSdn {
    type Error = Infallible;
}

impl digital::OutputPin for SimSdn {
    fn set_high(&mut self) -> Result<(), Self::Error> {
        let mut chip = self.0.borrow_mut();
        chip.cts = false;
        chip.tx_fifo.clear();
        chip.rx_fifo.clear();
        chip.properties.clear();
        Ok(())
    }

    fn set_low(&mut self) -> Result<(), Self::Error> {
        let mut chip = self.0.borrow_mut();
        chip.cts = true;
        chip.state = 0x2;
        Ok(())
    }
}

pub type SimRadio = Device<SimChip, SimCts, SimSdn, NoopDelay>;

pub fn radio(config: Config) -> (SimRadio, Rc<RefCell<ChipState>>) {
    let chip = SimChip::default();
    let state = chip.0.clone();
    let device = Device::new(
        chip,
        SimCts(state.clone()),
        SimSdn(state.clone()),
        NoopDelay::new(),
        config
            .with_cts_timeout_us(100)
            .with_cts_poll_interval_us(10),
    );
    (device, state)
}
