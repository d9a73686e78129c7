//! Command dispatch.

use std::{fs, thread};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};
use ddcci::dumpload::DumpData;
use ddcci::features::{self, FeatureInfo, FeatureSubset};
use ddcci::i2c::{self, LinuxI2cBus};
use ddcci::registry::{self, DetectOptions, DisplayHandle, DisplayIdentifier, DisplayRef, Registry};
use ddcci::sim::{Fault, SimulatedMonitor};
use ddcci::{delay, stats, thread_data, Ddc, DdcOptions, Edid, Error, IoOptions, IoStrategy, NewValue, Result, Transport, VcpValue};
use crate::cli::{self, Cli, Command, DisplaySelection, GlobalOptions};
use crate::output;

type Handle = DisplayHandle<LinuxI2cBus>;

const TEST_CASES: &[(u32, &str)] = &[
    (1, "Read brightness using read(2) and write(2)"),
    (2, "Read brightness using a single I2C_RDWR ioctl"),
    (3, "Read brightness one byte at a time"),
    (4, "Read and parse the EDID"),
    (5, "Exercise the protocol against a simulated monitor"),
];

pub struct App {
    options: GlobalOptions,
    select: DisplaySelection,
    io: IoOptions,
    ddc_options: DdcOptions,
    registry: Option<Registry>,
    current: Option<DisplayRef>,
}

impl App {
    /// Applies the global options to the library's defaults.
    pub fn new(cli: &Cli) -> Result<Self> {
        let options = cli.options.clone();

        if let Some(maxtries) = &options.maxtries {
            for (class, n) in cli::parse_maxtries(maxtries)? {
                thread_data::set_default_max_tries(class, n)?;
                thread_data::set_thread_max_tries(class, n)?;
            }
        }
        if let Some(factor) = options.sleep_multiplier {
            thread_data::set_default_sleep_multiplier(factor)?;
            thread_data::set_thread_sleep_multiplier(factor);
        }
        match options.sleep_strategy {
            None | Some(0) => (),
            Some(1) => {
                thread_data::set_dynamic_sleep_default(true);
                thread_data::set_thread_dynamic_sleep(true);
            },
            Some(2) => {
                thread_data::set_dynamic_sleep_default(true);
                thread_data::set_thread_dynamic_sleep(true);
                delay::set_sleep_suppression(true);
            },
            Some(n) => return Err(Error::InvalidArgument(format!("unknown sleep strategy {}", n))),
        }

        let io = IoOptions {
            strategy: if options.ioctl { IoStrategy::Ioctl } else { IoStrategy::FileIo },
            ..Default::default()
        };
        let ddc_options = DdcOptions {
            verify: !options.noverify,
            ..Default::default()
        };

        // reject bad combinations before touching any bus
        cli.select.identifier()?;

        Ok(App {
            options,
            select: cli.select.clone(),
            io,
            ddc_options,
            registry: None,
            current: None,
        })
    }

    pub fn current_display(&self) -> Option<&DisplayRef> {
        self.current.as_ref()
    }

    pub fn report_stats(&self) {
        if let Some(which) = self.options.stats {
            print!("{}", stats::report(which.into()));
        }
    }

    #[instrument(skip(self))]
    pub fn run(&mut self, command: &Command) -> Result<()> {
        match command {
            Command::Detect => self.detect(),
            Command::Capabilities => self.capabilities(),
            Command::Getvcp { features } => self.getvcp(features),
            Command::Setvcp { args } => self.setvcp(args),
            Command::Vcpinfo { features } => self.vcpinfo(features),
            Command::Listvcp => {
                for entry in features::entries() {
                    println!("{}", output::feature_entry_row(entry));
                }
                Ok(())
            },
            Command::Listtests => {
                for (n, desc) in TEST_CASES {
                    println!("{:>3}  {}", n, desc);
                }
                Ok(())
            },
            Command::Testcase { number } => self.testcase(*number),
            Command::Loadvcp { file } => self.loadvcp(file),
            Command::Dumpvcp { file } => self.dumpvcp(file.as_deref()),
            Command::Interrogate => self.interrogate(),
            Command::Environment => {
                self.environment();
                Ok(())
            },
            Command::Usbenv => {
                println!("USB HID monitor support is not built into this program.");
                Ok(())
            },
            Command::Chkusbmon { device } =>
                Err(Error::DisplayNotFound(format!("{}: USB HID monitor support is not built", device))),
            Command::Readchanges => self.readchanges(),
            Command::Probe => self.probe(),
        }
    }

    fn detect_options(&self) -> DetectOptions {
        DetectOptions {
            io: self.io,
            async_probe: self.options.async_probe,
            use_udev: self.options.udev,
        }
    }

    fn registry(&mut self) -> &Registry {
        let options = self.detect_options();
        self.registry.get_or_insert_with(|| Registry::detect(&options))
    }

    fn resolve(&mut self, id: Option<DisplayIdentifier>) -> Result<DisplayRef> {
        let id = match id {
            Some(id) => id,
            None => self.select.identifier()?.unwrap_or(DisplayIdentifier::ByDisplayNumber(1)),
        };

        let display = match id {
            DisplayIdentifier::ByBus(busno) if self.options.nodetect => DisplayRef::for_bus(busno),
            id => self.registry().resolve(&id)?,
        };
        self.current = Some(display.clone());
        Ok(display)
    }

    fn open_display(&mut self, id: Option<DisplayIdentifier>) -> Result<Handle> {
        let chosen = self.resolve(id)?;
        info!(display = %chosen, "opening");
        Registry::open(&chosen, self.io, self.ddc_options)
    }

    fn detect(&mut self) -> Result<()> {
        let (verbose, terse) = (self.options.verbose, self.options.terse);
        print!("{}", output::detect_report(self.registry(), verbose, terse));
        Ok(())
    }

    fn capabilities(&mut self) -> Result<()> {
        let mut handle = self.open_display(None)?;
        let caps = handle.capabilities()?;
        print!("{}", output::capabilities_report(&caps, self.options.terse));
        Ok(())
    }

    /// Whether a feature found through a subset is part of a bulk query.
    fn wanted(&self, info: &FeatureInfo, subset: FeatureSubset) -> bool {
        if !info.is_readable() {
            return false
        }
        if info.is_table() && (self.options.no_table || !(self.options.show_table || subset.includes_tables())) {
            return false
        }
        match (self.options.rw, self.options.ro, self.options.wo) {
            (true, _, _) => info.is_readable() && info.is_writable(),
            (_, true, _) => !info.is_writable(),
            (_, _, true) => false,
            _ => true,
        }
    }

    fn show_feature(&self, handle: &mut Handle, info: &FeatureInfo, single: bool) -> Result<()> {
        let terse = self.options.terse;
        match handle.get_feature_value(info) {
            Ok(value) => println!("{}", output::value_line(info, &value, terse)),
            Err(e) if single => {
                if terse {
                    println!("{}", output::error_line(info, &e, terse));
                }
                return Err(e)
            },
            Err(Error::FeatureUnsupportedByMonitor(_)) if !self.options.show_unsupported =>
                debug!(code = info.code, "unsupported"),
            Err(e) => println!("{}", output::error_line(info, &e, terse)),
        }
        Ok(())
    }

    fn getvcp(&mut self, names: &[String]) -> Result<()> {
        let subsets = names.iter()
            .map(|name| name.parse::<FeatureSubset>())
            .collect::<Result<Vec<_>>>()?;

        let mut handle = self.open_display(None)?;
        self.getvcp_on(&mut handle, &subsets)
    }

    fn getvcp_on(&self, handle: &mut Handle, subsets: &[FeatureSubset]) -> Result<()> {
        let version = handle.mccs_version();
        for &subset in subsets {
            match subset {
                FeatureSubset::Single(code) => {
                    let info = features::lookup(code, version, self.options.force)?;
                    self.show_feature(handle, &info, true)?;
                },
                subset => for code in features::subset_codes(subset, version) {
                    let info = features::feature_info(code, version)
                        .unwrap_or_else(|| features::synthetic_info(code, version));
                    if self.wanted(&info, subset) {
                        self.show_feature(handle, &info, false)?;
                    }
                },
            }
        }
        Ok(())
    }

    fn setvcp(&mut self, args: &[String]) -> Result<()> {
        if args.len() % 2 != 0 {
            return Err(Error::InvalidArgument("setvcp takes FEATURE VALUE pairs".into()))
        }

        let mut handle = self.open_display(None)?;
        for pair in args.chunks(2) {
            let code = features::parse_feature_code(&pair[0])?;
            let info = handle.feature_info(code, self.options.force)?;
            let value = NewValue::parse(&pair[1], info.is_table())?;
            let written = handle.set_feature_value(&info, value)?;
            if self.options.verbose {
                println!("{}", output::value_line(&info, &written, false));
            }
        }
        Ok(())
    }

    fn vcpinfo(&mut self, names: &[String]) -> Result<()> {
        let subsets = if names.is_empty() {
            vec![FeatureSubset::Known]
        } else {
            names.iter().map(|name| name.parse::<FeatureSubset>()).collect::<Result<Vec<_>>>()?
        };

        for subset in subsets {
            let codes = match subset {
                FeatureSubset::Single(code) => vec![code],
                subset => features::subset_codes(subset, ddcci::VersionSpec::V22),
            };
            for code in codes {
                match features::find_entry(code) {
                    Some(entry) => print!("{}", output::feature_entry_report(entry, self.options.verbose)),
                    None if features::is_manufacturer_code(code) => println!("VCP code {:02X}: manufacturer specific", code),
                    None => println!("VCP code {:02X}: unrecognized", code),
                }
            }
        }
        Ok(())
    }

    fn dumpvcp(&mut self, file: Option<&std::path::Path>) -> Result<()> {
        let mut handle = self.open_display(None)?;
        let mut data = handle.dump()?;
        data.bus = Some(handle.display().busno);

        let path = match file {
            Some(path) => path.to_path_buf(),
            None => data.default_path()?,
        };
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        fs::write(&path, data.to_text())?;
        println!("Settings saved to {}", path.display());
        Ok(())
    }

    fn loadvcp(&mut self, file: &std::path::Path) -> Result<()> {
        let text = fs::read_to_string(file)?;
        let data = DumpData::parse(&text)?;

        let id = match self.select.identifier()? {
            Some(id) => Some(id),
            None => data.identifier(),
        };
        let mut handle = self.open_display(id)?;
        handle.load(&data)?;
        if self.options.verbose {
            println!("Restored {} values to {}", data.values.len(), handle.display());
        }
        Ok(())
    }

    fn readchanges(&mut self) -> Result<()> {
        let mut handle = self.open_display(None)?;
        let version = handle.mccs_version();
        println!("Watching {} for changes, interrupt to stop", handle.display());

        loop {
            thread::sleep(Duration::from_secs(1));
            let pending = match handle.get_vcp_feature(0x02) {
                Ok(v) => v.sl == 0x02,
                Err(e) => {
                    warn!(error = %e, "polling new control value failed");
                    continue
                },
            };
            if !pending {
                continue
            }

            loop {
                let code = handle.get_vcp_feature(0x52)?.sl;
                if code == 0 {
                    break
                }
                let info = features::lookup(code, version, true)?;
                match handle.get_feature_value(&info) {
                    Ok(value) => println!("{}", output::value_line(&info, &value, self.options.terse)),
                    Err(e) => println!("{}", output::error_line(&info, &e, self.options.terse)),
                }
            }
            handle.set_vcp_feature(0x02, 0x01)?;
        }
    }

    fn probe(&mut self) -> Result<()> {
        let mut handle = self.open_display(None)?;
        let version = handle.mccs_version();
        println!("Probing {}", handle.display());
        println!("MCCS version: {}", version);

        let caps = handle.capabilities()?;
        print!("{}", output::capabilities_report(&caps, false));

        println!();
        println!("Current values of advertised features:");
        for code in caps.feature_codes() {
            let info = features::lookup(code, version, true)?;
            if !info.is_readable() {
                continue
            }
            match handle.get_feature_value(&info) {
                Ok(value) => println!("   {}", output::value_line(&info, &value, false)),
                Err(e) => println!("   {}", output::error_line(&info, &e, false)),
            }
        }

        println!();
        let brightness = features::lookup(0x10, version, false)?;
        match handle.get_feature_value(&brightness) {
            Ok(VcpValue::NonTable(current)) => {
                let mut ddc_options = handle.options();
                ddc_options.verify = true;
                handle.set_options(ddc_options);
                match handle.set_feature_value(&brightness, NewValue::Absolute(current.value())) {
                    Ok(_) => println!("Brightness write-back verified at {}", current.value()),
                    Err(e) => println!("Brightness write-back failed: {}", e),
                }
            },
            Ok(_) => (),
            Err(e) => println!("Brightness not readable: {}", e),
        }
        Ok(())
    }

    fn environment(&self) {
        let nodes: Vec<_> = (0..registry::MAX_BUSES)
            .filter(|&busno| i2c::bus_path(busno).exists())
            .map(|busno| {
                let adapter_name = registry::sysfs_adapter_name(busno);
                match i2c::open_bus(busno, self.io) {
                    Ok(mut bus) => output::NodeReport {
                        busno,
                        adapter_name,
                        open_error: None,
                        functionality: bus.functionality().unwrap_or(0),
                    },
                    Err(e) => output::NodeReport {
                        busno,
                        adapter_name,
                        open_error: Some(e.into()),
                        functionality: 0,
                    },
                }
            })
            .collect();
        print!("{}", output::environment_report(&nodes, self.options.verbose));
    }

    fn interrogate(&mut self) -> Result<()> {
        println!("*** Environment ***");
        self.environment();

        println!();
        println!("*** Detected displays ***");
        let verbose = self.options.verbose;
        let displays = {
            let registry = self.registry();
            print!("{}", output::detect_report(registry, true, false));
            registry.displays()
        };

        for display in displays {
            println!();
            println!("*** {} ***", display);
            if !display.ddc_ok {
                println!("DDC communication failed, skipping");
                continue
            }
            self.current = Some(display.clone());
            let mut handle = Registry::open(&display, self.io, self.ddc_options)?;
            match handle.capabilities() {
                Ok(caps) => print!("{}", output::capabilities_report(&caps, false)),
                Err(e) => println!("Capabilities unavailable: {}", e),
            }

            let saved = std::mem::replace(&mut self.options.show_unsupported, verbose);
            let scanned = self.getvcp_on(&mut handle, &[FeatureSubset::Scan]);
            self.options.show_unsupported = saved;
            if let Err(e) = scanned {
                println!("Scan stopped: {}", e);
            }
        }

        println!();
        print!("{}", stats::report(stats::StatsType::All));
        Ok(())
    }

    fn testcase(&mut self, number: u32) -> Result<()> {
        let desc = TEST_CASES.iter().find(|(n, _)| *n == number).map(|(_, d)| *d)
            .ok_or_else(|| Error::InvalidArgument(format!("no test case {}", number)))?;
        println!("Test case {}: {}", number, desc);

        let result = match number {
            1 | 2 | 3 => {
                let io = IoOptions {
                    strategy: if number == 2 { IoStrategy::Ioctl } else { IoStrategy::FileIo },
                    bytewise: number == 3,
                    ..self.io
                };
                let display = self.resolve(None)?;
                let mut handle = Registry::open(&display, io, self.ddc_options)?;
                handle.get_vcp_feature(0x10).map(|v| format!("brightness {} of {}", v.value(), v.maximum()))
            },
            4 => {
                let display = self.resolve(None)?;
                let mut handle = Registry::open(&display, self.io, self.ddc_options)?;
                handle.read_edid().map(|edid| format!("{} {} {}", edid.mfg_id, edid.model(), edid.serial()))
            },
            _ => simulated_self_test(),
        };

        match result {
            Ok(summary) => {
                println!("Passed: {}", summary);
                Ok(())
            },
            Err(e) => {
                println!("Failed: {}", e);
                Err(e)
            },
        }
    }
}

/// Runs a read, a verified write and a capabilities fetch through a
/// simulated monitor that misbehaves on the first tries.
fn simulated_self_test() -> Result<String> {
    let block = Edid::synthesize("SIM", "SIMULATED", "0001", 0x0001)?;
    let mut monitor = SimulatedMonitor::new()
        .with_edid(block)
        .with_feature(0x10, 100, 50)
        .with_capabilities("(prot(monitor)type(lcd)model(SIMULATED)vcp(10)mccs_ver(2.2))");
    monitor.push_fault(Fault::Null);
    monitor.push_fault(Fault::BadChecksum);

    let mut ddc = Ddc::new(&mut monitor);
    let edid = ddc.read_edid()?;
    let info = ddc.feature_info(0x10, false)?;
    let before = ddc.get_feature_value(&info)?;
    ddc.set_feature_value(&info, NewValue::Relative(10))?;
    let caps = ddc.capabilities()?;

    match before {
        VcpValue::NonTable(v) if v.value() == 50 => (),
        other => return Err(Error::InvalidOperation(format!("unexpected initial value {:?}", other))),
    }
    match monitor.feature(0x10) {
        Some(f) if f.value == 60 => (),
        other => return Err(Error::InvalidOperation(format!("unexpected final value {:?}", other))),
    }

    Ok(format!("{} answered {} requests, capabilities list {} features",
        edid.model(), monitor.requests().len(), caps.feature_codes().len()))
}
