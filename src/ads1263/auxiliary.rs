use crate::transport::Transport;

use super::consts::*;
use super::settings::{
	Calibration,
	DacVoltage,
	DataRate,
	Delay,
	Gain,
};
use super::{
	Ads1263,
	ConverterState,
	Reading,
};

impl<T: Transport> Ads1263<T> {
	fn write_settled(&mut self, register: Register, value: u8) -> crate::AResult<()> {
		self.write_register(register, value)?;
		self.transport.delay_ms(self.config.settle_ms);
		Ok(())
	}

	/// One ratiometric 3-wire RTD conversion on ADC1.
	///
	/// Routes both excitation currents, selects AIN7 - AIN6 against the
	/// AIN4 / AIN5 reference, then runs a single start/read/stop cycle. The
	/// PGA is enabled; leaves ADC1 configured for the RTD, not for
	/// `read_channel`.
	pub fn measure_rtd(&mut self, delay: Delay, gain: Gain, rate: DataRate) -> crate::AResult<Reading> {
		self.write_settled(Register::Mode0, delay.bits())?;
		self.write_settled(Register::IdacMux, RTD_IDACMUX)?;
		self.write_settled(Register::IdacMag, RTD_IDACMAG)?;
		self.write_settled(Register::Mode2, (gain.bits() << MODE2_GAIN_SHIFT) | rate.bits())?;
		self.write_settled(Register::InpMux, RTD_INPMUX)?;
		self.write_settled(Register::RefMux, RTD_REFMUX)?;

		self.send_command(CMD_START1)?;
		let result = self.rtd_conversion();
		self.send_command(CMD_STOP1)?;
		if self.adc1 > ConverterState::Configured {
			self.adc1 = ConverterState::Configured;
		}

		match result {
			Ok(reading) => {
				debug!("RTD: {:?}", reading);
				Ok(reading)
			},
			Err(e) => {
				if let Err(off) = self.write_register(Register::IdacMag, IDACMAG_OFF) {
					error!("failed to switch off RTD excitation: {}", off);
				}
				Err(e)
			},
		}
	}

	fn rtd_conversion(&mut self) -> crate::AResult<Reading> {
		self.transport.delay_ms(RTD_START_SETTLE_MS);
		let ready = self.wait_ready_on_pin()?;
		let mut reading = self.read_adc1_word()?;
		reading.ready = ready;
		Ok(reading)
	}

	pub fn configure_rtd(&mut self, delay: Delay, gain: Gain, rate: DataRate) -> crate::AResult<i32> {
		Ok(self.measure_rtd(delay, gain, rate)?.value)
	}

	/// Drives the positive (TDACP) or negative (TDACN) test DAC to `voltage`;
	/// `is_open == false` disconnects it.
	pub fn set_dac_output(&mut self, voltage: DacVoltage, is_positive: bool, is_open: bool) -> crate::AResult<()> {
		let register = if is_positive { Register::TdacP } else { Register::TdacN };
		let value = if is_open { voltage.bits() | TDAC_OUTPUT_ENABLE } else { 0 };
		self.write_register(register, value)?;
		info!("{}: {} V {}", register, voltage, if is_open { "on" } else { "off" });
		Ok(())
	}

	/// Runs an ADC1 calibration on the currently selected input and waits
	/// for its completion on DRDY. ADC1 must be running.
	pub fn calibrate_adc1(&mut self, calibration: Calibration) -> crate::AResult<bool> {
		let command = match calibration {
			Calibration::SystemOffset => CMD_SYOCAL1,
			Calibration::SystemGain => CMD_SYGCAL1,
			Calibration::SelfOffset => CMD_SFOCAL1,
		};
		if self.adc1 != ConverterState::Acquiring {
			warn!("ADC1 calibration while {:?}", self.adc1);
		}
		self.send_command(command)?;
		let done = self.wait_ready_on_pin()?;
		info!("ADC1 {:?} calibration {}", calibration, if done { "done" } else { "timed out" });
		Ok(done)
	}

	/// Issues an ADC2 calibration command; completion can only be seen in
	/// the status byte of the next ADC2 read.
	pub fn calibrate_adc2(&mut self, calibration: Calibration) -> crate::AResult<()> {
		let command = match calibration {
			Calibration::SystemOffset => CMD_SYOCAL2,
			Calibration::SystemGain => CMD_SYGCAL2,
			Calibration::SelfOffset => CMD_SFOCAL2,
		};
		self.send_command(command)?;
		info!("ADC2 {:?} calibration issued", calibration);
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use std::time::Duration;

	use super::*;
	use crate::ads1263::Ads1263Error;
	use crate::ads1263::mock::{
		self,
		Event,
	};

	#[test]
	fn rtd_recipe() {
		let mut adc = mock::driver();
		adc.transport_mut().adc1.push_back(0x0012_3456);
		let value = adc.configure_rtd(Delay::Us35, Gain::X4, DataRate::Sps20).unwrap();
		assert_eq!(value, 0x0012_3456);

		let chip = adc.transport();
		assert_eq!(chip.register(Register::Mode0), Delay::Us35.bits());
		assert_eq!(chip.register(Register::IdacMux), 0xa3);
		assert_eq!(chip.register(Register::IdacMag), 0x33);
		assert_eq!(chip.register(Register::Mode2), (Gain::X4.bits() << 4) | DataRate::Sps20.bits());
		assert_eq!(chip.register(Register::InpMux), 0x76);
		assert_eq!(chip.register(Register::RefMux), 0x1b);

		// writes only, no read-back
		assert_eq!(chip.commands(), vec![0x43, 0x4d, 0x4e, 0x45, 0x46, 0x4f, CMD_START1, CMD_RDATA1, CMD_STOP1]);
		let delays: Vec<u32> = chip.events.iter()
			.filter_map(|e| match *e { Event::Delay(ms) => Some(ms), _ => None })
			.collect();
		assert_eq!(delays, vec![1, 1, 1, 1, 1, 1, RTD_START_SETTLE_MS]);
		// never initialized, the RTD cycle doesn't change that
		assert_eq!(adc.adc1_state(), ConverterState::Uninitialized);
	}

	#[test]
	fn rtd_after_init_stops_adc1() {
		let mut adc = mock::driver();
		adc.init_adc1(DataRate::Sps20).unwrap();
		assert_eq!(adc.adc1_state(), ConverterState::Acquiring);
		adc.transport_mut().adc1.push_back(7);
		assert_eq!(adc.configure_rtd(Delay::Us35, Gain::X1, DataRate::Sps20).unwrap(), 7);
		assert_eq!(adc.adc1_state(), ConverterState::Configured);
	}

	#[test]
	fn rtd_timeout_stops_adc1_and_excitation() {
		let mut adc = mock::driver_with(|c| c.status_timeout = Duration::from_millis(5));
		adc.transport_mut().not_ready_polls = usize::max_value();
		let err = adc.measure_rtd(Delay::Us35, Gain::X1, DataRate::Sps20).unwrap_err();
		match err.downcast_ref::<Ads1263Error>() {
			Some(Ads1263Error::ReadyTimeout { .. }) => (),
			other => panic!("unexpected error {:?}", other),
		}

		let chip = adc.transport();
		assert_eq!(chip.commands(), vec![0x43, 0x4d, 0x4e, 0x45, 0x46, 0x4f, CMD_START1, CMD_RDATA1, CMD_STOP1, 0x4e]);
		assert_eq!(chip.register(Register::IdacMag), IDACMAG_OFF);
		assert!(!chip.is_selected());
		assert_eq!(adc.adc1_state(), ConverterState::Uninitialized);
	}

	#[test]
	fn dac_output() {
		let mut adc = mock::driver();
		adc.set_dac_output(DacVoltage::V3, true, true).unwrap();
		assert_eq!(adc.transport().register(Register::TdacP), 0x87);
		adc.set_dac_output(DacVoltage::V2, false, true).unwrap();
		assert_eq!(adc.transport().register(Register::TdacN), 0x97);
		adc.set_dac_output(DacVoltage::V3, true, false).unwrap();
		assert_eq!(adc.transport().register(Register::TdacP), 0x00);
		assert_eq!(adc.transport().register(Register::TdacN), 0x97);
	}

	#[test]
	fn calibration_commands() {
		let mut adc = mock::driver();
		adc.calibrate_adc1(Calibration::SystemOffset).unwrap();
		adc.calibrate_adc1(Calibration::SystemGain).unwrap();
		assert!(adc.calibrate_adc1(Calibration::SelfOffset).unwrap());
		adc.calibrate_adc2(Calibration::SystemOffset).unwrap();
		adc.calibrate_adc2(Calibration::SystemGain).unwrap();
		adc.calibrate_adc2(Calibration::SelfOffset).unwrap();
		assert_eq!(adc.transport().commands(), vec![0x16, 0x17, 0x19, 0x1b, 0x1c, 0x1e]);

		// only ADC1 waits for DRDY
		let polls = adc.transport().events.iter().filter(|e| **e == Event::ReadPin(17)).count();
		assert_eq!(polls, 3);
	}
}
