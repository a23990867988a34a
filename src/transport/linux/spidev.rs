use std::fs;
use std::io;
use std::os::unix::io::AsRawFd;

use libc::{
	c_void,
	ioctl,
};

// _IOW('k', nr, size) from <linux/spi/spidev.h>
const SPI_IOC_MESSAGE_1:        u32 = 0x4020_6b00; // one struct spi_ioc_transfer
const SPI_IOC_WR_MODE:          u32 = 0x4001_6b01;
const SPI_IOC_WR_BITS_PER_WORD: u32 = 0x4001_6b03;
const SPI_IOC_WR_MAX_SPEED_HZ:  u32 = 0x4004_6b04;

pub const SPI_MODE_1: u8 = 0x01; // CPOL = 0, CPHA = 1

const BITS_PER_WORD: u8 = 8;

// struct spi_ioc_transfer
#[repr(C)]
#[derive(Default)]
struct SpiIocTransfer {
	tx_buf: u64,
	rx_buf: u64,
	len: u32,
	speed_hz: u32,
	delay_usecs: u16,
	bits_per_word: u8,
	cs_change: u8,
	tx_nbits: u8,
	rx_nbits: u8,
	word_delay_usecs: u8,
	pad: u8,
}

pub struct SpiDev {
	file: fs::File,
	speed_hz: u32,
}

impl SpiDev {
	fn write_setting<V>(&self, request: u32, value: &V) -> io::Result<()> {
		let res = unsafe {
			ioctl(self.file.as_raw_fd(), request as _, value as *const V as *const c_void)
		};
		if res < 0 {
			return Err(io::Error::last_os_error());
		}
		Ok(())
	}

	pub fn open(path: &str, mode: u8, speed_hz: u32) -> io::Result<Self> {
		let file = fs::OpenOptions::new()
			.read(true)
			.write(true)
			.open(path)?;

		let dev = SpiDev {
			file,
			speed_hz,
		};
		dev.write_setting(SPI_IOC_WR_MODE, &mode)?;
		dev.write_setting(SPI_IOC_WR_BITS_PER_WORD, &BITS_PER_WORD)?;
		dev.write_setting(SPI_IOC_WR_MAX_SPEED_HZ, &speed_hz)?;

		Ok(dev)
	}

	pub fn transfer_byte(&mut self, byte: u8) -> io::Result<u8> {
		let tx = [byte];
		let mut rx = [0u8];
		let transfer = SpiIocTransfer {
			tx_buf: tx.as_ptr() as u64,
			rx_buf: rx.as_mut_ptr() as u64,
			len: 1,
			speed_hz: self.speed_hz,
			bits_per_word: BITS_PER_WORD,
			..Default::default()
		};

		let res = unsafe {
			ioctl(self.file.as_raw_fd(), SPI_IOC_MESSAGE_1 as _, &transfer as *const SpiIocTransfer)
		};
		if res < 1 {
			return Err(io::Error::last_os_error());
		}

		Ok(rx[0])
	}
}
