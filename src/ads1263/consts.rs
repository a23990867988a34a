use std::fmt;

// commands; the low bit of the two-valued opcodes is "don't care"
pub const CMD_RESET:   u8 = 0x06; // 0000 011x
pub const CMD_START1:  u8 = 0x08; // 0000 100x
pub const CMD_STOP1:   u8 = 0x0a; // 0000 101x
pub const CMD_START2:  u8 = 0x0c; // 0000 110x
pub const CMD_STOP2:   u8 = 0x0e; // 0000 111x
pub const CMD_RDATA1:  u8 = 0x12; // 0001 001x
pub const CMD_RDATA2:  u8 = 0x14; // 0001 010x
pub const CMD_SYOCAL1: u8 = 0x16; // ADC1 system offset calibration
pub const CMD_SYGCAL1: u8 = 0x17; // ADC1 system gain calibration
pub const CMD_SFOCAL1: u8 = 0x19; // ADC1 self offset calibration
pub const CMD_SYOCAL2: u8 = 0x1b; // ADC2 system offset calibration
pub const CMD_SYGCAL2: u8 = 0x1c; // ADC2 system gain calibration
pub const CMD_SFOCAL2: u8 = 0x1e; // ADC2 self offset calibration
pub const CMD_RREG:    u8 = 0x20; // 001r rrrr
pub const CMD_WREG:    u8 = 0x40; // 010r rrrr

pub const REGISTER_ADDRESS_MASK: u8 = 0x1f;
// second byte of RREG/WREG: number of registers minus one
pub const SINGLE_REGISTER: u8 = 0x00;

pub const CHECKSUM_SEED: u8 = 0x9b;

// top 3 bits of the ID register
pub const DEVICE_ID: u8 = 0b001;
pub const DEVICE_ID_SHIFT: u8 = 5;
pub const REVISION_MASK: u8 = 0x1f;

pub const RESET_PULSE_MS: u32 = 300;

// MODE2
pub const MODE2_PGA_BYPASS: u8 = 0x80;
pub const MODE2_GAIN_SHIFT: u8 = 4;
// MODE1: FIR digital filter, sensor bias off
pub const MODE1_FILTER_FIR: u8 = 0x84;
// REFMUX: VAVDD / VAVSS as reference
pub const REFMUX_SUPPLY: u8 = 0x24;
// ADC2CFG
pub const ADC2CFG_REF_SUPPLY: u8 = 0x20;
pub const ADC2CFG_RATE_SHIFT: u8 = 6;
// INPMUX / ADC2MUX
pub const MUX_POSITIVE_SHIFT: u8 = 4;
pub const MUX_AINCOM: u8 = 0x0a;
// TDACP / TDACN
pub const TDAC_OUTPUT_ENABLE: u8 = 0x80;

// 3-wire RTD on the HAT: IDAC1 on AIN3 and IDAC2 on AINCOM at 250 µA,
// sense AIN7 - AIN6, ratiometric reference AIN4 / AIN5
pub const RTD_IDACMUX: u8 = (MUX_AINCOM << 4) | 0x03;
pub const RTD_IDACMAG: u8 = (0x03 << 4) | 0x03;
pub const RTD_INPMUX:  u8 = (0x07 << 4) | 0x06;
pub const RTD_REFMUX:  u8 = (0x03 << 3) | 0x03;
pub const RTD_START_SETTLE_MS: u32 = 10;
pub const IDACMAG_OFF: u8 = 0x00;

// ADC2 results are followed by one zero pad byte before the checksum
pub const ADC2_PAD_BYTES: usize = 1;

pub const ADC2_CHANNELS: usize = 10;

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[repr(u8)]
pub enum Register {
	Id = 0x00,
	Power,
	Interface,
	Mode0,
	Mode1,
	Mode2,
	InpMux,
	OfCal0,
	OfCal1,
	OfCal2,
	FsCal0,
	FsCal1,
	FsCal2,
	IdacMux,
	IdacMag,
	RefMux,
	TdacP,
	TdacN,
	GpioCon,
	GpioDir,
	GpioDat,
	Adc2Cfg,
	Adc2Mux,
	Adc2Ofc0,
	Adc2Ofc1,
	Adc2Fsc0,
	Adc2Fsc1,
}

pub struct RegisterInfo {
	pub register: Register,
	pub name: &'static str,
	pub reset_default: u8,
	pub valid_bits: u8,
	pub read_only: bool,
}

const fn info(register: Register, name: &'static str, reset_default: u8, valid_bits: u8) -> RegisterInfo {
	RegisterInfo {
		register,
		name,
		reset_default,
		valid_bits,
		read_only: false,
	}
}

// indexed by address
pub static REGISTERS: [RegisterInfo; 27] = [
	RegisterInfo {
		register: Register::Id,
		name: "ID",
		reset_default: 0x00, // device dependent
		valid_bits: 0xff,
		read_only: true,
	},
	info(Register::Power,     "POWER",     0x11, 0x13),
	info(Register::Interface, "INTERFACE", 0x05, 0x0f),
	info(Register::Mode0,     "MODE0",     0x00, 0xff),
	info(Register::Mode1,     "MODE1",     0x80, 0xff),
	info(Register::Mode2,     "MODE2",     0x04, 0xff),
	info(Register::InpMux,    "INPMUX",    0x01, 0xff),
	info(Register::OfCal0,    "OFCAL0",    0x00, 0xff),
	info(Register::OfCal1,    "OFCAL1",    0x00, 0xff),
	info(Register::OfCal2,    "OFCAL2",    0x00, 0xff),
	info(Register::FsCal0,    "FSCAL0",    0x00, 0xff),
	info(Register::FsCal1,    "FSCAL1",    0x00, 0xff),
	info(Register::FsCal2,    "FSCAL2",    0x40, 0xff),
	info(Register::IdacMux,   "IDACMUX",   0xbb, 0xff),
	info(Register::IdacMag,   "IDACMAG",   0x00, 0xff),
	info(Register::RefMux,    "REFMUX",    0x00, 0x3f),
	info(Register::TdacP,     "TDACP",     0x00, 0x9f),
	info(Register::TdacN,     "TDACN",     0x00, 0x9f),
	info(Register::GpioCon,   "GPIOCON",   0x00, 0xff),
	info(Register::GpioDir,   "GPIODIR",   0x00, 0xff),
	info(Register::GpioDat,   "GPIODAT",   0x00, 0xff),
	info(Register::Adc2Cfg,   "ADC2CFG",   0x00, 0xff),
	info(Register::Adc2Mux,   "ADC2MUX",   0x01, 0xff),
	info(Register::Adc2Ofc0,  "ADC2OFC0",  0x00, 0xff),
	info(Register::Adc2Ofc1,  "ADC2OFC1",  0x00, 0xff),
	info(Register::Adc2Fsc0,  "ADC2FSC0",  0x00, 0xff),
	info(Register::Adc2Fsc1,  "ADC2FSC1",  0x40, 0xff),
];

impl Register {
	pub fn all() -> impl Iterator<Item = Self> {
		REGISTERS.iter().map(|i| i.register)
	}

	pub fn from_address(address: u8) -> Option<Self> {
		REGISTERS.get(address as usize).map(|i| i.register)
	}

	pub fn address(self) -> u8 {
		self as u8
	}

	pub fn info(self) -> &'static RegisterInfo {
		&REGISTERS[self as usize]
	}

	pub fn name(self) -> &'static str {
		self.info().name
	}

	pub fn reset_default(self) -> u8 {
		self.info().reset_default
	}

	pub fn valid_bits(self) -> u8 {
		self.info().valid_bits
	}

	pub fn is_read_only(self) -> bool {
		self.info().read_only
	}
}

impl fmt::Display for Register {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.write_str(self.name())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn table_is_indexed_by_address() {
		for (address, info) in REGISTERS.iter().enumerate() {
			assert_eq!(info.register.address() as usize, address, "{}", info.name);
		}
		assert_eq!(Register::from_address(26), Some(Register::Adc2Fsc1));
		assert_eq!(Register::from_address(27), None);
		assert_eq!(Register::all().count(), 27);
	}

	#[test]
	fn addresses_fit_opcodes() {
		for r in Register::all() {
			assert_eq!(r.address() & !REGISTER_ADDRESS_MASK, 0);
		}
		assert_eq!(Register::IdacMux.address(), 0x0d);
		assert_eq!(Register::Adc2Mux.address(), 0x16);
	}

	#[test]
	fn recipe_constants() {
		assert_eq!(RTD_IDACMUX, 0xa3);
		assert_eq!(RTD_IDACMAG, 0x33);
		assert_eq!(RTD_INPMUX, 0x76);
		assert_eq!(RTD_REFMUX, 0x1b);
		assert!(Register::Id.is_read_only());
		assert_eq!(Register::IdacMux.reset_default(), 0xbb);
	}
}
