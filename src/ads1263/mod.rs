/* Texas Instruments ADS1263: 32-bit ADC1 + 24-bit auxiliary ADC2 */

/* Chip documentation: https://www.ti.com/product/ADS1263 */

use crate::transport::Transport;

mod acquire;
mod auxiliary;
mod config;
mod consts;
mod error;
#[cfg(test)]
mod mock;
mod protocol;
mod settings;
mod status;

pub use self::acquire::Reading;
pub use self::config::{
	Config,
	VerifyPolicy,
};
pub use self::consts::*;
pub use self::error::Ads1263Error;
pub use self::protocol::{
	checksum,
	checksum_ok,
};
pub use self::settings::{
	Adc2DataRate,
	Adc2Gain,
	Calibration,
	DacVoltage,
	DataRate,
	Delay,
	Gain,
	ParseSettingError,
	ScanMode,
};
pub use self::status::Status;

/// Per-converter progress; both converters share one reset.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum ConverterState {
	Uninitialized,
	Reset,
	Identified,
	Configured,
	Acquiring,
}

/// Registers whose read-back disagreed during a configuration sequence.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Verification {
	pub mismatched: Vec<Register>,
}

impl Verification {
	fn record(&mut self, register: Register, verified: bool) {
		if !verified {
			self.mismatched.push(register);
		}
	}

	pub fn is_ok(&self) -> bool {
		self.mismatched.is_empty()
	}
}

/// Driver instance; owns the transport and all device state.
///
/// Nothing here is safe to interleave: wrap it in a `Mutex` (or keep it in
/// one thread) if several callers need the chip.
pub struct Ads1263<T: Transport> {
	transport: T,
	config: Config,
	scan_mode: ScanMode,
	adc1: ConverterState,
	adc2: ConverterState,
}

impl<T: Transport> Ads1263<T> {
	pub fn new(transport: T, config: Config) -> Self {
		Ads1263 {
			transport,
			config,
			scan_mode: ScanMode::default(),
			adc1: ConverterState::Uninitialized,
			adc2: ConverterState::Uninitialized,
		}
	}

	pub fn config(&self) -> &Config {
		&self.config
	}

	pub fn transport(&self) -> &T {
		&self.transport
	}

	pub fn transport_mut(&mut self) -> &mut T {
		&mut self.transport
	}

	pub fn adc1_state(&self) -> ConverterState {
		self.adc1
	}

	pub fn adc2_state(&self) -> ConverterState {
		self.adc2
	}

	pub fn scan_mode(&self) -> ScanMode {
		self.scan_mode
	}

	pub fn set_scan_mode(&mut self, mode: ScanMode) {
		self.scan_mode = mode;
	}

	/// Hardware reset through the RESET pin; the pulse timing is what the
	/// chip needs after power-up and must not be shortened.
	pub fn reset(&mut self) -> crate::AResult<()> {
		let pin = self.config.pins.reset;
		for &level in [true, false, true].iter() {
			self.transport.write_pin(pin, level)?;
			self.transport.delay_ms(RESET_PULSE_MS);
		}
		self.adc1 = ConverterState::Reset;
		self.adc2 = ConverterState::Reset;
		info!("ADS1263 reset");
		Ok(())
	}

	/// Device id (top 3 bits of the ID register).
	pub fn identify(&mut self) -> crate::AResult<u8> {
		Ok(self.read_register(Register::Id)? >> DEVICE_ID_SHIFT)
	}

	pub fn revision(&mut self) -> crate::AResult<u8> {
		Ok(self.read_register(Register::Id)? & REVISION_MASK)
	}

	fn check_identity(&mut self) -> crate::AResult<()> {
		let found = self.identify()?;
		if found != DEVICE_ID {
			error!("ID read failed: 0b{:03b}", found);
			return Err(Ads1263Error::ChipIdMismatch {
				found,
				expected: DEVICE_ID,
			}.into());
		}
		info!("ID read success");
		Ok(())
	}

	// write, let the chip settle, read back
	fn configure_register(&mut self, verification: &mut Verification, register: Register, value: u8) -> crate::AResult<()> {
		self.write_register(register, value)?;
		self.transport.delay_ms(self.config.settle_ms);
		let verified = self.verify_register(register, value)?;
		verification.record(register, verified);
		Ok(())
	}

	/// Writes MODE2, REFMUX, MODE0 and MODE1 for ADC1 (PGA bypassed, supply
	/// reference, FIR filter), verifying each one.
	pub fn configure_adc1(&mut self, gain: Gain, rate: DataRate, delay: Delay) -> crate::AResult<Verification> {
		let mut verification = Verification::default();

		let mode2 = MODE2_PGA_BYPASS | (gain.bits() << MODE2_GAIN_SHIFT) | rate.bits();
		self.configure_register(&mut verification, Register::Mode2, mode2)?;
		self.configure_register(&mut verification, Register::RefMux, REFMUX_SUPPLY)?;
		self.configure_register(&mut verification, Register::Mode0, delay.bits())?;
		self.configure_register(&mut verification, Register::Mode1, MODE1_FILTER_FIR)?;

		if self.adc1 < ConverterState::Configured {
			self.adc1 = ConverterState::Configured;
		}
		Ok(verification)
	}

	/// Writes ADC2CFG (supply reference) and MODE0, verifying each one.
	pub fn configure_adc2(&mut self, gain: Adc2Gain, rate: Adc2DataRate, delay: Delay) -> crate::AResult<Verification> {
		let mut verification = Verification::default();

		let adc2cfg = ADC2CFG_REF_SUPPLY | (rate.bits() << ADC2CFG_RATE_SHIFT) | gain.bits();
		self.configure_register(&mut verification, Register::Adc2Cfg, adc2cfg)?;
		self.configure_register(&mut verification, Register::Mode0, delay.bits())?;

		if self.adc2 < ConverterState::Configured {
			self.adc2 = ConverterState::Configured;
		}
		Ok(verification)
	}

	fn select_input(&mut self, register: Register, mode: ScanMode, channel: u8) -> crate::AResult<bool> {
		let mux = match mode.input_mux(channel) {
			Some(mux) => mux,
			None => return Err(Ads1263Error::InvalidChannel {
				channel,
				mode,
			}.into()),
		};
		self.write_verified(register, mux)
	}

	/// Single-ended ADC1 input `channel` (0..=10) against AINCOM.
	pub fn select_channel(&mut self, channel: u8) -> crate::AResult<bool> {
		self.select_input(Register::InpMux, ScanMode::SingleEnded, channel)
	}

	pub fn select_channel_adc2(&mut self, channel: u8) -> crate::AResult<bool> {
		self.select_input(Register::Adc2Mux, ScanMode::SingleEnded, channel)
	}

	/// Differential ADC1 pair `channel` (0..=4).
	pub fn select_diff_channel(&mut self, channel: u8) -> crate::AResult<bool> {
		self.select_input(Register::InpMux, ScanMode::Differential, channel)
	}

	pub fn select_diff_channel_adc2(&mut self, channel: u8) -> crate::AResult<bool> {
		self.select_input(Register::Adc2Mux, ScanMode::Differential, channel)
	}

	/// Reset, check the chip id, configure ADC1 (gain 1, 35 µs delay) and
	/// start continuous conversions.
	pub fn init_adc1(&mut self, rate: DataRate) -> crate::AResult<Verification> {
		self.reset()?;
		let identity = self.check_identity();
		self.adc1 = ConverterState::Identified;
		identity?;

		self.send_command(CMD_STOP1)?;
		let verification = self.configure_adc1(Gain::X1, rate, Delay::Us35)?;
		self.send_command(CMD_START1)?;
		self.adc1 = ConverterState::Acquiring;

		info!("ADC1 running at {} SPS", rate);
		Ok(verification)
	}

	/// Reset, check the chip id and configure ADC2 (gain 1, 35 µs delay).
	/// ADC2 is started per read.
	pub fn init_adc2(&mut self, rate: Adc2DataRate) -> crate::AResult<Verification> {
		self.reset()?;
		let identity = self.check_identity();
		self.adc2 = ConverterState::Identified;
		identity?;

		self.send_command(CMD_STOP2)?;
		let verification = self.configure_adc2(Adc2Gain::X1, rate, Delay::Us35)?;

		info!("ADC2 configured for {} SPS", rate);
		Ok(verification)
	}

	pub fn dump_registers(&mut self) -> crate::AResult<Vec<(Register, u8)>> {
		let mut result = Vec::with_capacity(REGISTERS.len());
		for register in Register::all() {
			result.push((register, self.read_register(register)?));
		}
		Ok(result)
	}

	/// Puts RESET and CS low and hands back the transport.
	pub fn close(mut self) -> crate::AResult<T> {
		self.transport.write_pin(self.config.pins.reset, false)?;
		self.transport.write_pin(self.config.pins.chip_select, false)?;
		Ok(self.transport)
	}
}
