use std::fmt;

// status byte preceding conversion data
const STATUS_RESET:    u8 = 0x01; // chip reset since flag was last cleared (POWER.RESET)
const STATUS_PGAD_ALM: u8 = 0x02; // PGA differential output alarm
const STATUS_PGAH_ALM: u8 = 0x04; // PGA output high alarm
const STATUS_PGAL_ALM: u8 = 0x08; // PGA output low alarm
const STATUS_REF_ALM:  u8 = 0x10; // low reference alarm
const STATUS_EXTCLK:   u8 = 0x20; // external clock in use
const STATUS_ADC1:     u8 = 0x40; // new ADC1 data
const STATUS_ADC2:     u8 = 0x80; // new ADC2 data

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Status(pub u8);

impl Status {
	pub const ADC1_READY: u8 = STATUS_ADC1;
	pub const ADC2_READY: u8 = STATUS_ADC2;

	pub fn is_reset(&self) -> bool {
		0 != self.0 & STATUS_RESET
	}
	pub fn is_pga_differential_alarm(&self) -> bool {
		0 != self.0 & STATUS_PGAD_ALM
	}
	pub fn is_pga_high_alarm(&self) -> bool {
		0 != self.0 & STATUS_PGAH_ALM
	}
	pub fn is_pga_low_alarm(&self) -> bool {
		0 != self.0 & STATUS_PGAL_ALM
	}
	pub fn is_reference_alarm(&self) -> bool {
		0 != self.0 & STATUS_REF_ALM
	}
	pub fn is_external_clock(&self) -> bool {
		0 != self.0 & STATUS_EXTCLK
	}
	pub fn is_adc1_ready(&self) -> bool {
		0 != self.0 & STATUS_ADC1
	}
	pub fn is_adc2_ready(&self) -> bool {
		0 != self.0 & STATUS_ADC2
	}

	pub fn has_alarm(&self) -> bool {
		0 != self.0 & (STATUS_PGAD_ALM | STATUS_PGAH_ALM | STATUS_PGAL_ALM | STATUS_REF_ALM)
	}
}

impl fmt::Display for Status {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "0x{:02x}", self.0)
	}
}

impl fmt::Debug for Status {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "0x{:02x} (", self.0)?;
		if self.is_reset() { write!(f, " [RESET]")?; }
		if self.is_pga_differential_alarm() { write!(f, " [PGAD_ALM]")?; }
		if self.is_pga_high_alarm() { write!(f, " [PGAH_ALM]")?; }
		if self.is_pga_low_alarm() { write!(f, " [PGAL_ALM]")?; }
		if self.is_reference_alarm() { write!(f, " [REF_ALM]")?; }
		if self.is_external_clock() { write!(f, " [EXTCLK]")?; }
		if self.is_adc1_ready() { write!(f, " [ADC1]")?; }
		if self.is_adc2_ready() { write!(f, " [ADC2]")?; }
		write!(f, " )")
	}
}
