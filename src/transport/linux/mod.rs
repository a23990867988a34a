use crate::transport::{
	Pins,
	Transport,
};

mod gpio;
mod spidev;

use self::gpio::SysfsPin;
use self::spidev::SpiDev;

pub use self::spidev::{
	SPI_MODE_1,
};

const SPI_SPEED_HZ: u32 = 1_000_000;

/// Kernel spidev for the byte exchange, sysfs GPIO for RESET, CS and DRDY.
pub struct LinuxTransport {
	spi: SpiDev,
	pins: Vec<SysfsPin>,
}

impl LinuxTransport {
	fn pin(&mut self, number: u32) -> crate::AResult<&mut SysfsPin> {
		match self.pins.iter_mut().find(|p| p.number() == number) {
			Some(p) => Ok(p),
			None => bail!("GPIO {} is not managed by this transport", number),
		}
	}
}

impl Transport for LinuxTransport {
	fn write_pin(&mut self, pin: u32, high: bool) -> crate::AResult<()> {
		self.pin(pin)?.set(high)?;
		Ok(())
	}

	fn read_pin(&mut self, pin: u32) -> crate::AResult<bool> {
		Ok(self.pin(pin)?.get()?)
	}

	fn transfer_byte(&mut self, byte: u8) -> crate::AResult<u8> {
		Ok(self.spi.transfer_byte(byte)?)
	}
}

pub fn open(spi_path: &str, pins: Pins) -> crate::AResult<LinuxTransport> {
	let spi = with_context!(("open SPI device {}", spi_path), {
		Ok(SpiDev::open(spi_path, SPI_MODE_1, SPI_SPEED_HZ)?)
	})?;

	let mut exported = Vec::with_capacity(3);
	for &(number, output) in [(pins.reset, true), (pins.chip_select, true), (pins.data_ready, false)].iter() {
		let pin = with_context!(("export GPIO {}", number), {
			Ok(SysfsPin::export(number, output)?)
		})?;
		exported.push(pin);
	}

	let mut transport = LinuxTransport {
		spi,
		pins: exported,
	};
	// chip select idles high
	transport.write_pin(pins.chip_select, true)?;

	Ok(transport)
}
