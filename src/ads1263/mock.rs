//! Scripted ADS1263 stand-in for unit tests.

use std::collections::VecDeque;

use crate::transport::{
	Pins,
	Transport,
};

use super::consts::*;
use super::{
	Ads1263,
	Config,
};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Event {
	Pin(u32, bool),
	ReadPin(u32),
	Byte(u8),
	Delay(u32),
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Phase {
	Command,
	ReadCount(u8),
	ReadData(u8),
	WriteCount(u8),
	WriteData(u8),
	Status(u8),
	Output,
}

pub struct MockChip {
	pins: Pins,
	registers: [u8; 27],
	/// DRDY level; low means a conversion is ready
	pub drdy_high: bool,
	/// status polls answered with "no new data" before data is returned
	pub not_ready_polls: usize,
	/// RDATA transactions (counted from 0) whose status never flags new data
	pub stalled: Vec<usize>,
	rdata_frames: usize,
	/// registers ignoring writes
	pub stuck: Vec<Register>,
	/// raw conversion words handed out per RDATA1 / RDATA2 transaction
	pub adc1: VecDeque<u32>,
	pub adc2: VecDeque<u32>,
	pub corrupt_checksum: bool,
	pub events: Vec<Event>,
	/// bytes sent in each chip select window
	pub frames: Vec<Vec<u8>>,
	selected: bool,
	phase: Phase,
	output: VecDeque<u8>,
}

impl MockChip {
	pub fn new(pins: Pins) -> Self {
		let mut registers = [0u8; 27];
		for r in Register::all() {
			registers[r.address() as usize] = r.reset_default();
		}
		// device id 1, revision 1
		registers[Register::Id.address() as usize] = 0x21;

		MockChip {
			pins,
			registers,
			drdy_high: false,
			not_ready_polls: 0,
			stalled: Vec::new(),
			rdata_frames: 0,
			stuck: Vec::new(),
			adc1: VecDeque::new(),
			adc2: VecDeque::new(),
			corrupt_checksum: false,
			events: Vec::new(),
			frames: Vec::new(),
			selected: false,
			phase: Phase::Command,
			output: VecDeque::new(),
		}
	}

	pub fn register(&self, register: Register) -> u8 {
		self.registers[register.address() as usize]
	}

	pub fn set_register(&mut self, register: Register, value: u8) {
		self.registers[register.address() as usize] = value;
	}

	pub fn is_selected(&self) -> bool {
		self.selected
	}

	/// first byte of every chip select window
	pub fn commands(&self) -> Vec<u8> {
		self.frames.iter().filter_map(|f| f.first().cloned()).collect()
	}

	fn data_bytes(&mut self, ready_mask: u8) -> Vec<u8> {
		let mut bytes = Vec::new();
		let value = if ready_mask == CMD_RDATA1_READY {
			let v = self.adc1.pop_front().unwrap_or(0);
			bytes.extend_from_slice(&v.to_be_bytes());
			v
		} else {
			let v = self.adc2.pop_front().unwrap_or(0) & 0x00ff_ffff;
			bytes.extend_from_slice(&v.to_be_bytes()[1..]);
			bytes.push(0x00);
			v
		};
		let sum = value.to_be_bytes().iter().fold(0x9bu8, |s, b| s.wrapping_add(*b));
		bytes.push(if self.corrupt_checksum { !sum } else { sum });
		bytes
	}

	fn respond(&mut self, byte: u8) -> u8 {
		match self.phase {
			Phase::Command => {
				match byte & 0xe0 {
					CMD_RREG => self.phase = Phase::ReadCount(byte & REGISTER_ADDRESS_MASK),
					CMD_WREG => self.phase = Phase::WriteCount(byte & REGISTER_ADDRESS_MASK),
					_ => {
						let ready_mask = match byte & !1 {
							CMD_RDATA1 => CMD_RDATA1_READY,
							CMD_RDATA2 => CMD_RDATA2_READY,
							_ => return 0x00,
						};
						// repeated polls stay in the same window
						if self.frames.last().map_or(false, |f| f.len() == 1) {
							self.rdata_frames += 1;
						}
						self.phase = Phase::Status(ready_mask);
					},
				}
				0x00
			},
			Phase::ReadCount(address) => {
				assert_eq!(byte, SINGLE_REGISTER);
				self.phase = Phase::ReadData(address);
				0x00
			},
			Phase::ReadData(address) => {
				self.phase = Phase::Command;
				self.registers[address as usize]
			},
			Phase::WriteCount(address) => {
				assert_eq!(byte, SINGLE_REGISTER);
				self.phase = Phase::WriteData(address);
				0x00
			},
			Phase::WriteData(address) => {
				self.phase = Phase::Command;
				let register = Register::from_address(address).expect("valid register address");
				if !register.is_read_only() && !self.stuck.contains(&register) {
					self.registers[address as usize] = byte & register.valid_bits();
				}
				0x00
			},
			Phase::Status(ready_mask) => {
				if self.stalled.contains(&(self.rdata_frames - 1)) {
					self.phase = Phase::Command;
					return 0x00;
				}
				if self.not_ready_polls > 0 {
					self.not_ready_polls -= 1;
					self.phase = Phase::Command;
					return 0x00;
				}
				self.output = self.data_bytes(ready_mask).into();
				self.phase = Phase::Output;
				ready_mask
			},
			Phase::Output => {
				let b = self.output.pop_front().unwrap_or(0);
				if self.output.is_empty() {
					self.phase = Phase::Command;
				}
				b
			},
		}
	}
}

const CMD_RDATA1_READY: u8 = 0x40;
const CMD_RDATA2_READY: u8 = 0x80;

impl Transport for MockChip {
	fn write_pin(&mut self, pin: u32, high: bool) -> crate::AResult<()> {
		self.events.push(Event::Pin(pin, high));
		if pin == self.pins.chip_select {
			if !high && !self.selected {
				self.frames.push(Vec::new());
			}
			self.selected = !high;
			self.phase = Phase::Command;
			self.output.clear();
		}
		Ok(())
	}

	fn read_pin(&mut self, pin: u32) -> crate::AResult<bool> {
		self.events.push(Event::ReadPin(pin));
		assert_eq!(pin, self.pins.data_ready);
		Ok(self.drdy_high)
	}

	fn transfer_byte(&mut self, byte: u8) -> crate::AResult<u8> {
		self.events.push(Event::Byte(byte));
		assert!(self.selected, "byte 0x{:02x} clocked without chip select", byte);
		if let Some(frame) = self.frames.last_mut() {
			frame.push(byte);
		}
		Ok(self.respond(byte))
	}

	fn delay_ms(&mut self, ms: u32) {
		self.events.push(Event::Delay(ms));
	}
}

pub fn driver_with<F: FnOnce(&mut Config)>(f: F) -> Ads1263<MockChip> {
	let mut config = Config::default();
	f(&mut config);
	let chip = MockChip::new(config.pins);
	Ads1263::new(chip, config)
}

pub fn driver() -> Ads1263<MockChip> {
	driver_with(|_| ())
}
