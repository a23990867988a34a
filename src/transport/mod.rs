use std::thread;
use std::time::{
	Duration,
	Instant,
};

pub mod linux;

pub fn reliable_sleep(mut duration: Duration) {
	loop {
		let now = Instant::now();
		thread::sleep(duration);
		let elapsed = now.elapsed();
		if elapsed >= duration {
			return;
		}
		duration -= elapsed;
	}
}

/// Pin ids of the three control lines; their meaning is up to the transport.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Pins {
	pub reset: u32,
	pub chip_select: u32,
	pub data_ready: u32,
}

impl Default for Pins {
	// BCM numbering of the Raspberry Pi "High-Precision AD HAT"
	fn default() -> Self {
		Pins {
			reset: 18,
			chip_select: 22,
			data_ready: 17,
		}
	}
}

/// Platform access needed to talk to the chip: GPIO levels (`true` is
/// high), a full-duplex single byte exchange and a millisecond delay.
pub trait Transport {
	fn write_pin(&mut self, pin: u32, high: bool) -> crate::AResult<()>;
	fn read_pin(&mut self, pin: u32) -> crate::AResult<bool>;
	fn transfer_byte(&mut self, byte: u8) -> crate::AResult<u8>;

	fn delay_ms(&mut self, ms: u32) {
		reliable_sleep(Duration::from_millis(ms as u64));
	}
}

impl<'a, T: ?Sized + Transport> Transport for &'a mut T {
	fn write_pin(&mut self, pin: u32, high: bool) -> crate::AResult<()> {
		T::write_pin(*self, pin, high)
	}
	fn read_pin(&mut self, pin: u32) -> crate::AResult<bool> {
		T::read_pin(*self, pin)
	}
	fn transfer_byte(&mut self, byte: u8) -> crate::AResult<u8> {
		T::transfer_byte(*self, byte)
	}
	fn delay_ms(&mut self, ms: u32) {
		T::delay_ms(*self, ms)
	}
}
