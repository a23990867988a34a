use std::fs;
use std::io;
use std::os::unix::fs::FileExt;
use std::path::PathBuf;

const GPIO_ROOT: &str = "/sys/class/gpio";

pub struct SysfsPin {
	number: u32,
	value: fs::File,
}

impl SysfsPin {
	pub fn export(number: u32, output: bool) -> io::Result<Self> {
		let base = PathBuf::from(format!("{}/gpio{}", GPIO_ROOT, number));
		if !base.exists() {
			fs::write(format!("{}/export", GPIO_ROOT), number.to_string())?;
		}
		fs::write(base.join("direction"), if output { "out" } else { "in" })?;

		let value = fs::OpenOptions::new()
			.read(true)
			.write(output)
			.open(base.join("value"))?;

		Ok(SysfsPin {
			number,
			value,
		})
	}

	pub fn number(&self) -> u32 {
		self.number
	}

	pub fn set(&mut self, high: bool) -> io::Result<()> {
		let l = self.value.write_at(if high { b"1" } else { b"0" }, 0)?;
		if l != 1 {
			Err(io::Error::new(io::ErrorKind::Other, "failed to write GPIO value"))
		} else {
			Ok(())
		}
	}

	pub fn get(&mut self) -> io::Result<bool> {
		let mut buf = [0u8];
		// sysfs wants a fresh read from offset 0 for every sample
		let l = self.value.read_at(&mut buf, 0)?;
		if l != 1 {
			return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "empty GPIO value"));
		}
		Ok(buf[0] == b'1')
	}
}

impl Drop for SysfsPin {
	fn drop(&mut self) {
		if let Err(e) = fs::write(format!("{}/unexport", GPIO_ROOT), self.number.to_string()) {
			warn!("Couldn't unexport GPIO {}: {}", self.number, e);
		}
	}
}
