#[macro_use]
extern crate clap;
#[macro_use]
extern crate failure;
#[macro_use]
extern crate log;

extern crate ads1263;
use ads1263::*;

use std::process::exit;
use std::time::Duration;

const DEFAULT_SPI: &str = "/dev/spidev0.0";

type Adc = Ads1263<transport::linux::LinuxTransport>;

fn get_param<T>(matches: &clap::ArgMatches, name: &str) -> AResult<T>
where
	T: std::str::FromStr,
	failure::Error: From<<T as std::str::FromStr>::Err>,
{
	let param = match matches.value_of(name) {
		Some(p) => p,
		None => bail!("missing parameter {}", name),
	};
	parse_param(name, param)
}

fn get_param_or<T>(matches: &clap::ArgMatches, name: &str, default: T) -> AResult<T>
where
	T: std::str::FromStr,
	failure::Error: From<<T as std::str::FromStr>::Err>,
{
	match matches.value_of(name) {
		Some(p) => parse_param(name, p),
		None => Ok(default),
	}
}

fn parse_param<T>(name: &str, param: &str) -> AResult<T>
where
	T: std::str::FromStr,
	failure::Error: From<<T as std::str::FromStr>::Err>,
{
	param.parse::<T>().map_err(|e| {
		let e = failure::Error::from(e);
		let msg = format!("invalid parameter {}: {}", name, e);
		e.context(msg).into()
	})
}

fn open(matches: &clap::ArgMatches) -> AResult<Adc> {
	let mut config = Config::default();
	config.pins = Pins {
		reset: get_param_or(matches, "rst", config.pins.reset)?,
		chip_select: get_param_or(matches, "cs", config.pins.chip_select)?,
		data_ready: get_param_or(matches, "drdy", config.pins.data_ready)?,
	};
	if let Some(ms) = matches.value_of("timeout") {
		let timeout = Duration::from_millis(parse_param("timeout", ms)?);
		config.ready_timeout = timeout;
		config.status_timeout = timeout;
	}
	if matches.is_present("strict") {
		config.verify = VerifyPolicy::Strict;
	}

	let spi = matches.value_of("spi").unwrap_or(DEFAULT_SPI);
	let bus = transport::linux::open(spi, config.pins)?;
	Ok(Ads1263::new(bus, config))
}

fn print_reading(label: &str, reading: &Reading) {
	let mut flags = String::new();
	if !reading.checksum_ok {
		flags.push_str(" [checksum]");
	}
	if !reading.ready {
		flags.push_str(" [not ready]");
	}
	if reading.status.has_alarm() {
		flags.push_str(&format!(" [status {:?}]", reading.status));
	}
	println!("{}: {}{}", label, reading.value, flags);
}

fn id(adc: &mut Adc) -> AResult<()> {
	adc.reset()?;
	let id = adc.identify()?;
	let revision = adc.revision()?;
	println!("device id: 0b{:03b}, revision: {}", id, revision);
	if id != DEVICE_ID {
		bail!("not an ADS1263 (expected device id 0b{:03b})", DEVICE_ID);
	}
	Ok(())
}

fn registers(adc: &mut Adc) -> AResult<()> {
	for (register, value) in adc.dump_registers()? {
		let marker = if value == register.reset_default() { "" } else { " *" };
		println!("@{:02x} {:<9} {:02x}{}", register.address(), register.name(), value, marker);
	}
	Ok(())
}

fn adc1(adc: &mut Adc, sub_m: &clap::ArgMatches) -> AResult<()> {
	let rate: DataRate = get_param_or(sub_m, "rate", DataRate::Sps20)?;
	if sub_m.is_present("differential") {
		adc.set_scan_mode(ScanMode::Differential);
	}
	let channels: Vec<u8> = match sub_m.values_of("CHANNEL") {
		Some(values) => values.map(|c| parse_param("CHANNEL", c)).collect::<AResult<_>>()?,
		None => (0..=adc.scan_mode().max_channel()).collect(),
	};

	let verification = adc.init_adc1(rate)?;
	if !verification.is_ok() {
		warn!("ADC1 configuration not verified: {:?}", verification.mismatched);
	}

	for channel in channels {
		match adc.read_channel(channel)? {
			Some(reading) => print_reading(&format!("ADC1 {}", channel), &reading),
			None => eprintln!("ADC1 {}: no such channel in {:?} mode", channel, adc.scan_mode()),
		}
	}
	Ok(())
}

fn adc2(adc: &mut Adc, sub_m: &clap::ArgMatches) -> AResult<()> {
	let rate: Adc2DataRate = get_param_or(sub_m, "rate", Adc2DataRate::Sps10)?;
	let verification = adc.init_adc2(rate)?;
	if !verification.is_ok() {
		warn!("ADC2 configuration not verified: {:?}", verification.mismatched);
	}

	for (channel, value) in adc.get_all_adc2()?.iter().enumerate() {
		println!("ADC2 {}: {}", channel, value);
	}
	Ok(())
}

fn rtd(adc: &mut Adc, sub_m: &clap::ArgMatches) -> AResult<()> {
	let delay: Delay = get_param_or(sub_m, "delay", Delay::Ms8_8)?;
	let gain: Gain = get_param_or(sub_m, "gain", Gain::X1)?;
	let rate: DataRate = get_param_or(sub_m, "rate", DataRate::Sps20)?;

	adc.reset()?;
	let reading = adc.measure_rtd(delay, gain, rate)?;
	print_reading("RTD", &reading);
	Ok(())
}

fn dac(adc: &mut Adc, sub_m: &clap::ArgMatches) -> AResult<()> {
	let voltage: DacVoltage = get_param(sub_m, "voltage")?;
	let positive = !sub_m.is_present("negative");
	let open = !sub_m.is_present("off");

	adc.set_dac_output(voltage, positive, open)?;
	let register = if positive { Register::TdacP } else { Register::TdacN };
	println!("{}: {:02x}", register, adc.read_register(register)?);
	Ok(())
}

fn main_app() -> AResult<()> {
	let matches = clap_app!(@app (app_from_crate!())
		(@setting SubcommandRequiredElseHelp)
		(global_setting: clap::AppSettings::VersionlessSubcommands)
		(@arg spi: --spi +takes_value "spidev device (default /dev/spidev0.0)")
		(@arg rst: --rst +takes_value "RESET GPIO number (default 18)")
		(@arg cs: --cs +takes_value "chip select GPIO number (default 22)")
		(@arg drdy: --drdy +takes_value "DRDY GPIO number (default 17)")
		(@arg timeout: --timeout +takes_value "data ready timeout in milliseconds (default 5000)")
		(@arg strict: --strict "fail on register verify mismatches")
		(@subcommand id =>
			(about: "reset and show device id and revision")
		)
		(@subcommand registers =>
			(about: "dump all registers")
		)
		(@subcommand adc1 =>
			(about: "initialize ADC1 and read channels")
			(@arg rate: -r --rate +takes_value "data rate in SPS (default 20)")
			(@arg differential: -d --differential "read differential pairs instead of single-ended inputs")
			(@arg CHANNEL: ... "channels to read (default: all)")
		)
		(@subcommand adc2 =>
			(about: "initialize ADC2 and read all single-ended channels")
			(@arg rate: -r --rate +takes_value "data rate in SPS (default 10)")
		)
		(@subcommand rtd =>
			(about: "3-wire RTD measurement on ADC1")
			(@arg delay: --delay +takes_value "conversion delay (default 8.8ms)")
			(@arg gain: -g --gain +takes_value "PGA gain (default 1)")
			(@arg rate: -r --rate +takes_value "data rate in SPS (default 20)")
		)
		(@subcommand dac =>
			(about: "set test DAC output")
			(@arg voltage: -v --voltage +takes_value +required "output voltage")
			(@arg negative: -n --negative "use TDACN instead of TDACP")
			(@arg off: --off "disconnect the output")
		)
	).get_matches();

	let mut adc = open(&matches)?;

	let result = match matches.subcommand() {
		("id", _) => id(&mut adc),
		("registers", _) => registers(&mut adc),
		("adc1", Some(sub_m)) => adc1(&mut adc, sub_m),
		("adc2", Some(sub_m)) => adc2(&mut adc, sub_m),
		("rtd", Some(sub_m)) => rtd(&mut adc, sub_m),
		("dac", Some(sub_m)) => dac(&mut adc, sub_m),
		("", _) => Err(format_err!("no subcommand")),
		(cmd, _) => Err(format_err!("not implemented subcommand {:?}", cmd)),
	};

	if let Err(e) = adc.close() {
		warn!("failed to release ADS1263: {}", e);
	}
	result
}

fn main() {
	env_logger::from_env(env_logger::Env::default().default_filter_or("info")).init();

	if let Err(e) = main_app() {
		error!("Error: {}", e);
		exit(1);
	}
}
