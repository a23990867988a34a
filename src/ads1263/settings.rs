use std::fmt;
use std::str;

use failure::Fail;

use super::consts::{
	MUX_AINCOM,
	MUX_POSITIVE_SHIFT,
};

#[derive(Clone, Debug, PartialEq, Eq, Fail)]
#[fail(display = "unknown {}: {:?}", kind, value)]
pub struct ParseSettingError {
	pub kind: &'static str,
	pub value: String,
}

// enum with register bit encoding and a human readable label used for
// Display and FromStr
macro_rules! setting {
	($(#[$meta:meta])* $name:ident, $kind:expr, { $($variant:ident = $bits:expr, $label:expr;)* }) => {
		$(#[$meta])*
		#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
		#[repr(u8)]
		pub enum $name {
			$($variant = $bits,)*
		}

		impl $name {
			pub const ALL: &'static [$name] = &[$($name::$variant,)*];

			pub fn bits(self) -> u8 {
				self as u8
			}

			pub fn label(self) -> &'static str {
				match self {
					$($name::$variant => $label,)*
				}
			}
		}

		impl fmt::Display for $name {
			fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
				f.write_str(self.label())
			}
		}

		impl str::FromStr for $name {
			type Err = ParseSettingError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				let s = s.trim();
				$name::ALL.iter()
					.find(|v| v.label().eq_ignore_ascii_case(s))
					.cloned()
					.ok_or_else(|| ParseSettingError {
						kind: $kind,
						value: s.to_string(),
					})
			}
		}
	};
}

setting!(
	/// ADC1 PGA gain
	Gain, "ADC1 gain", {
		X1 = 0, "1";
		X2 = 1, "2";
		X4 = 2, "4";
		X8 = 3, "8";
		X16 = 4, "16";
		X32 = 5, "32";
		X64 = 6, "64";
	}
);

setting!(
	/// ADC1 data rate in samples per second
	DataRate, "ADC1 data rate", {
		Sps2_5 = 0, "2.5";
		Sps5 = 1, "5";
		Sps10 = 2, "10";
		Sps16_6 = 3, "16.6";
		Sps20 = 4, "20";
		Sps50 = 5, "50";
		Sps60 = 6, "60";
		Sps100 = 7, "100";
		Sps400 = 8, "400";
		Sps1200 = 9, "1200";
		Sps2400 = 10, "2400";
		Sps4800 = 11, "4800";
		Sps7200 = 12, "7200";
		Sps14400 = 13, "14400";
		Sps19200 = 14, "19200";
		Sps38400 = 15, "38400";
	}
);

setting!(
	/// Conversion start delay after a mux or setting change (MODE0)
	Delay, "conversion delay", {
		Zero = 0, "0s";
		Us8_7 = 1, "8.7us";
		Us17 = 2, "17us";
		Us35 = 3, "35us";
		Us169 = 4, "169us";
		Us139 = 5, "139us";
		Us278 = 6, "278us";
		Us555 = 7, "555us";
		Ms1_1 = 8, "1.1ms";
		Ms2_2 = 9, "2.2ms";
		Ms4_4 = 10, "4.4ms";
		Ms8_8 = 11, "8.8ms";
	}
);

setting!(
	/// ADC2 gain
	Adc2Gain, "ADC2 gain", {
		X1 = 0, "1";
		X2 = 1, "2";
		X4 = 2, "4";
		X8 = 3, "8";
		X16 = 4, "16";
		X32 = 5, "32";
		X64 = 6, "64";
		X128 = 7, "128";
	}
);

setting!(
	/// ADC2 data rate in samples per second
	Adc2DataRate, "ADC2 data rate", {
		Sps10 = 0, "10";
		Sps100 = 1, "100";
		Sps400 = 2, "400";
		Sps800 = 3, "800";
	}
);

setting!(
	/// Test DAC output level in volts (relative to VAVSS, 5 V analog supply)
	DacVoltage, "DAC voltage", {
		V4_5 = 0b01001, "4.5";
		V3_5 = 0b01000, "3.5";
		V3 = 0b00111, "3";
		V2_75 = 0b00110, "2.75";
		V2_625 = 0b00101, "2.625";
		V2_5625 = 0b00100, "2.5625";
		V2_53125 = 0b00011, "2.53125";
		V2_515625 = 0b00010, "2.515625";
		V2_5078125 = 0b00001, "2.5078125";
		V2_5 = 0b00000, "2.5";
		V2_4921875 = 0b10001, "2.4921875";
		V2_484375 = 0b10010, "2.484375";
		V2_46875 = 0b10011, "2.46875";
		V2_4375 = 0b10100, "2.4375";
		V2_375 = 0b10101, "2.375";
		V2_25 = 0b10110, "2.25";
		V2 = 0b10111, "2";
		V1_5 = 0b11000, "1.5";
		V0_5 = 0b11001, "0.5";
	}
);

impl Gain {
	pub fn multiplier(self) -> u32 {
		1 << self.bits()
	}
}

impl Adc2Gain {
	pub fn multiplier(self) -> u32 {
		1 << self.bits()
	}
}

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Calibration {
	SystemOffset,
	SystemGain,
	SelfOffset,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum ScanMode {
	/// AIN0..AIN9 (and AINCOM as channel 10) against AINCOM
	SingleEnded,
	/// five fixed pairs AIN0-AIN1 .. AIN8-AIN9
	Differential,
}

impl Default for ScanMode {
	fn default() -> Self {
		ScanMode::SingleEnded
	}
}

impl ScanMode {
	pub fn max_channel(self) -> u8 {
		match self {
			ScanMode::SingleEnded => 10,
			ScanMode::Differential => 4,
		}
	}

	/// INPMUX / ADC2MUX value for `channel`, `None` if out of range
	pub fn input_mux(self, channel: u8) -> Option<u8> {
		if channel > self.max_channel() {
			return None;
		}
		Some(match self {
			ScanMode::SingleEnded => (channel << MUX_POSITIVE_SHIFT) | MUX_AINCOM,
			ScanMode::Differential => {
				let positive = channel * 2;
				(positive << MUX_POSITIVE_SHIFT) | (positive + 1)
			},
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parse_labels() {
		assert_eq!("400".parse::<DataRate>(), Ok(DataRate::Sps400));
		assert_eq!(" 2.5 ".parse::<DataRate>(), Ok(DataRate::Sps2_5));
		assert_eq!("35US".parse::<Delay>(), Ok(Delay::Us35));
		assert_eq!("128".parse::<Adc2Gain>(), Ok(Adc2Gain::X128));
		assert_eq!("4.5".parse::<DacVoltage>().map(DacVoltage::bits), Ok(0b01001));
		let err = "128".parse::<Gain>().unwrap_err();
		assert_eq!(err.kind, "ADC1 gain");
		assert_eq!(err.to_string(), "unknown ADC1 gain: \"128\"");
	}

	#[test]
	fn enumerations_are_complete() {
		assert_eq!(Gain::ALL.len(), 7);
		assert_eq!(DataRate::ALL.len(), 16);
		assert_eq!(Delay::ALL.len(), 12);
		assert_eq!(Adc2Gain::ALL.len(), 8);
		assert_eq!(Adc2DataRate::ALL.len(), 4);
		assert_eq!(DataRate::Sps38400.bits(), 15);
		assert_eq!(Gain::X64.multiplier(), 64);
		assert_eq!(Adc2Gain::X128.multiplier(), 128);
		for v in DacVoltage::ALL {
			assert_eq!(v.label().parse::<DacVoltage>(), Ok(*v));
		}
	}

	#[test]
	fn single_ended_mux() {
		let mode = ScanMode::SingleEnded;
		assert_eq!(mode.input_mux(0), Some(0x0a));
		assert_eq!(mode.input_mux(3), Some(0x3a));
		assert_eq!(mode.input_mux(10), Some(0xaa));
		assert_eq!(mode.input_mux(11), None);
	}

	#[test]
	fn differential_pairs() {
		let mode = ScanMode::Differential;
		let pairs: Vec<_> = (0..5).map(|c| mode.input_mux(c).unwrap()).collect();
		assert_eq!(pairs, vec![0x01, 0x23, 0x45, 0x67, 0x89]);
		assert_eq!(mode.input_mux(5), None);
	}
}
