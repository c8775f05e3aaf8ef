//! Build script for softwire-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates bus.toml and turns it into constants for the firmware

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// GPIOs exposed by the RP2040
const GPIO_COUNT: u8 = 30;

/// Validated bus configuration
struct BusConfig {
    scl: PinSpec,
    sda: PinSpec,
    frequency: u32,
    tolerance_percent: u8,
    stretch_budget: u16,
    scan_interval_ms: u64,
}

/// A pin string such as `^gpio4`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PinSpec {
    number: u8,
    pull_up: bool,
}

fn main() {
    setup_linker();
    let config = validate_config();
    generate_config(&config);
}

/// Set up linker search paths and scripts
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());
    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Abort the build with a boxed error message
fn fail(title: &str, lines: &[String]) -> ! {
    let body = lines
        .iter()
        .map(|line| format!("║  • {:<62} ║", line))
        .collect::<Vec<_>>()
        .join("\n");
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title, body
    );
}

/// Validate bus.toml at compile time
fn validate_config() -> BusConfig {
    println!("cargo:rerun-if-changed=bus.toml");

    let config_path = Path::new("bus.toml");
    if !config_path.exists() {
        fail(
            "bus.toml not found",
            &["Create one in the softwire-firmware directory.".to_string()],
        );
    }

    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => fail("Failed to read bus.toml", &[e.to_string()]),
    };

    let config: toml::Value = match toml::from_str(&content) {
        Ok(value) => value,
        Err(e) => {
            let lines: Vec<String> = e.to_string().lines().map(truncate).collect();
            fail("Invalid TOML syntax in bus.toml", &lines);
        }
    };

    let mut errors = Vec::new();

    let bus = table(&config, "bus", &mut errors);
    let scan = table(&config, "scan", &mut errors);

    let scl = pin(bus, "scl_pin", &mut errors);
    let sda = pin(bus, "sda_pin", &mut errors);
    if let (Some(scl), Some(sda)) = (scl, sda) {
        if scl.number == sda.number {
            errors.push(format!("[bus] scl_pin and sda_pin are both gpio{}", scl.number));
        }
    }

    let frequency = integer(bus, "bus", "frequency", 1, 1_000_000, &mut errors);
    let tolerance_percent = integer(bus, "bus", "tolerance_percent", 0, 100, &mut errors);
    let stretch_budget = integer(bus, "bus", "stretch_budget", 1, i64::from(u16::MAX), &mut errors);
    let scan_interval_ms = integer(scan, "scan", "interval_ms", 100, 3_600_000, &mut errors);

    if !errors.is_empty() {
        fail("Invalid bus.toml", &errors);
    }

    println!("cargo:warning=bus.toml validated successfully");

    // every field is Some once no errors were recorded
    BusConfig {
        scl: scl.unwrap(),
        sda: sda.unwrap(),
        frequency: frequency.unwrap() as u32,
        tolerance_percent: tolerance_percent.unwrap() as u8,
        stretch_budget: stretch_budget.unwrap() as u16,
        scan_interval_ms: scan_interval_ms.unwrap() as u64,
    }
}

fn truncate(line: &str) -> String {
    if line.len() > 62 {
        format!("{}...", &line[..59])
    } else {
        line.to_string()
    }
}

fn table<'a>(
    config: &'a toml::Value,
    name: &str,
    errors: &mut Vec<String>,
) -> Option<&'a toml::value::Table> {
    match config.get(name) {
        Some(toml::Value::Table(t)) => Some(t),
        Some(_) => {
            errors.push(format!("[{}] must be a table", name));
            None
        }
        None => {
            errors.push(format!("Missing [{}] section", name));
            None
        }
    }
}

fn integer(
    table: Option<&toml::value::Table>,
    section: &str,
    key: &str,
    min: i64,
    max: i64,
    errors: &mut Vec<String>,
) -> Option<i64> {
    let table = table?;
    match table.get(key) {
        Some(toml::Value::Integer(value)) if (min..=max).contains(value) => Some(*value),
        Some(toml::Value::Integer(_)) => {
            errors.push(format!("[{}] {} must be {}-{}", section, key, min, max));
            None
        }
        Some(_) => {
            errors.push(format!("[{}] {} must be an integer", section, key));
            None
        }
        None => {
            errors.push(format!("[{}] missing '{}'", section, key));
            None
        }
    }
}

fn pin(
    table: Option<&toml::value::Table>,
    key: &str,
    errors: &mut Vec<String>,
) -> Option<PinSpec> {
    let table = table?;
    let Some(toml::Value::String(s)) = table.get(key) else {
        errors.push(format!("[bus] {} must be a pin string like \"gpio4\"", key));
        return None;
    };
    match parse_pin(s) {
        Some(parsed) => Some(parsed),
        None => {
            errors.push(format!("[bus] {} = \"{}\" is not gpio0-gpio{}", key, s, GPIO_COUNT - 1));
            None
        }
    }
}

/// Parse a pin string
///
/// Supports formats:
/// - "gpio4" -> pin 4, no pull-up
/// - "^gpio4" -> pin 4, internal pull-up enabled
fn parse_pin(s: &str) -> Option<PinSpec> {
    let s = s.trim();
    let (s, pull_up) = match s.strip_prefix('^') {
        Some(rest) => (rest, true),
        None => (s, false),
    };
    let number: u8 = s.strip_prefix("gpio")?.parse().ok()?;
    if number >= GPIO_COUNT {
        return None;
    }
    Some(PinSpec { number, pull_up })
}

/// Write the validated configuration to `$OUT_DIR/bus_config.rs`
fn generate_config(config: &BusConfig) {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let code = format!(
        "// Generated from bus.toml by build.rs\n\
        \n\
        pub const FREQUENCY: u32 = {frequency};\n\
        pub const TOLERANCE_PERCENT: u8 = {tolerance};\n\
        pub const STRETCH_BUDGET: u16 = {budget};\n\
        pub const SCAN_INTERVAL_MS: u64 = {interval};\n\
        pub const SCL_PIN: u8 = {scl};\n\
        pub const SDA_PIN: u8 = {sda};\n\
        pub const SCL_PULL_UP: bool = {scl_pull};\n\
        pub const SDA_PULL_UP: bool = {sda_pull};\n\
        \n\
        /// Move the configured SCL and SDA pins out of the peripherals\n\
        pub fn take_bus_pins(\n    \
            p: embassy_rp::Peripherals,\n\
        ) -> (\n    \
            embassy_rp::Peri<'static, embassy_rp::gpio::AnyPin>,\n    \
            embassy_rp::Peri<'static, embassy_rp::gpio::AnyPin>,\n\
        ) {{\n    \
            (p.PIN_{scl}.into(), p.PIN_{sda}.into())\n\
        }}\n",
        frequency = config.frequency,
        tolerance = config.tolerance_percent,
        budget = config.stretch_budget,
        interval = config.scan_interval_ms,
        scl = config.scl.number,
        sda = config.sda.number,
        scl_pull = config.scl.pull_up,
        sda_pull = config.sda.pull_up,
    );

    fs::write(out_dir.join("bus_config.rs"), code).unwrap();
}
