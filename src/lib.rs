#[macro_use]
extern crate failure;
#[macro_use]
extern crate log;

macro_rules! with_context {
	(( $fmt:tt $($t:tt)* ), $e:expr) => {{
		use failure::Error;

		match (|| { $e })() {
			Ok(v) => Ok(v),
			Err(e) => {
				let e: Error = e;
				let msg = format!(concat!($fmt, ": {}") $($t)*, e);
				Err(Error::from(e.context(msg)))
			}
		}
	}};

	($msg:expr, $e:expr) => {
		with_context!(("{}", $msg), $e)
	};
}

pub type AResult<T> = Result<T, failure::Error>;

pub mod ads1263;
pub mod transport;

pub use self::ads1263::{
	Adc2DataRate,
	Adc2Gain,
	Ads1263,
	Ads1263Error,
	Calibration,
	Config,
	DacVoltage,
	DataRate,
	Delay,
	Gain,
	Reading,
	Register,
	ScanMode,
	Status,
	VerifyPolicy,
	DEVICE_ID,
};

pub use self::transport::{
	Pins,
	Transport,
};
