//! Build script for pinlock-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates lock.toml and compiles it into `lock_config.rs`

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

fn main() {
    setup_linker();
    let config = validate_config();
    generate_config(&config);
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validated contents of lock.toml
struct LockToml {
    pin: [u8; 4],
    max_attempts: u8,
    lockout_duration_ms: u32,
    key_debounce_ms: u32,
    telemetry_interval_ms: u32,
    voltage_smoothing: f64,
    charge_debounce_ms: u32,
    battery: [f64; 6],
    loop_period_ms: u32,
    entry_pause_ms: u32,
    result_screen_ms: u32,
    welcome_ms: u32,
    product_name: String,
}

/// Validate lock.toml at compile time
fn validate_config() -> LockToml {
    println!("cargo:rerun-if-changed=lock.toml");

    let config_path = Path::new("lock.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: lock.toml not found!                                     ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a lock.toml configuration file            ║\n\
            ║  in the pinlock-firmware directory.                              ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read lock.toml                                 ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in lock.toml                         ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                {}\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();
    let mut fields = Fields {
        config: &config,
        errors: &mut errors,
    };

    let pin = fields.pin();
    let max_attempts = fields.integer("security", "max_attempts", 5, 1, 254) as u8;
    let lockout_duration_ms =
        fields.integer("security", "lockout_duration_ms", 120_000, 1, u32::MAX as i64) as u32;
    let key_debounce_ms = fields.integer("keypad", "debounce_ms", 200, 0, 10_000) as u32;
    let telemetry_interval_ms = fields.integer("telemetry", "interval_ms", 500, 1, 60_000) as u32;
    let voltage_smoothing = fields.float("telemetry", "voltage_smoothing", 0.2);
    let charge_debounce_ms =
        fields.integer("telemetry", "charge_debounce_ms", 1000, 0, 60_000) as u32;
    let battery = [
        fields.float("battery", "empty_v", 9.0),
        fields.float("battery", "low_knee_v", 10.5),
        fields.float("battery", "low_knee_percent", 20.0),
        fields.float("battery", "high_knee_v", 11.7),
        fields.float("battery", "high_knee_percent", 80.0),
        fields.float("battery", "full_v", 12.6),
    ];
    let loop_period_ms = fields.integer("timing", "loop_period_ms", 50, 1, 1000) as u32;
    let entry_pause_ms = fields.integer("timing", "entry_pause_ms", 500, 0, 10_000) as u32;
    let result_screen_ms = fields.integer("timing", "result_screen_ms", 2000, 0, 10_000) as u32;
    let welcome_ms = fields.integer("timing", "welcome_ms", 3000, 0, 10_000) as u32;
    let product_name = fields.string("display", "product_name", "Energram");

    if !(voltage_smoothing > 0.0 && voltage_smoothing <= 1.0) {
        errors.push("[telemetry] voltage_smoothing must be in (0, 1]".to_string());
    }

    let [empty, low, low_pct, high, high_pct, full] = battery;
    if !(empty < low && low < high && high < full) {
        errors.push("[battery] voltages must increase: empty < low knee < high knee < full".to_string());
    }
    if !(0.0 < low_pct && low_pct < high_pct && high_pct < 100.0) {
        errors.push("[battery] knee percentages must satisfy 0 < low < high < 100".to_string());
    }

    if product_name.is_empty() || product_name.len() > 21 || !product_name.is_ascii() {
        errors.push("[display] product_name must be 1-21 ASCII characters".to_string());
    }

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid lock configuration                               ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=lock.toml validated successfully");

    LockToml {
        pin,
        max_attempts,
        lockout_duration_ms,
        key_debounce_ms,
        telemetry_interval_ms,
        voltage_smoothing,
        charge_debounce_ms,
        battery,
        loop_period_ms,
        entry_pause_ms,
        result_screen_ms,
        welcome_ms,
        product_name,
    }
}

/// Field lookup that records problems instead of stopping at the first
struct Fields<'a> {
    config: &'a toml::Value,
    errors: &'a mut Vec<String>,
}

impl Fields<'_> {
    fn get(&self, section: &str, key: &str) -> Option<&toml::Value> {
        self.config.get(section).and_then(|s| s.get(key))
    }

    fn pin(&mut self) -> [u8; 4] {
        match self.get("security", "pin") {
            Some(toml::Value::String(pin))
                if pin.len() == 4 && pin.bytes().all(|b| b.is_ascii_digit()) =>
            {
                let b = pin.as_bytes();
                [b[0] - b'0', b[1] - b'0', b[2] - b'0', b[3] - b'0']
            }
            Some(_) => {
                self.errors
                    .push("[security] pin must be a string of 4 digits".to_string());
                [0; 4]
            }
            None => {
                self.errors.push("[security] missing 'pin'".to_string());
                [0; 4]
            }
        }
    }

    fn integer(&mut self, section: &str, key: &str, default: i64, min: i64, max: i64) -> i64 {
        match self.get(section, key) {
            Some(toml::Value::Integer(v)) if (min..=max).contains(v) => *v,
            Some(toml::Value::Integer(_)) => {
                self.errors
                    .push(format!("[{}] {} must be {}-{}", section, key, min, max));
                default
            }
            Some(_) => {
                self.errors
                    .push(format!("[{}] {} must be an integer", section, key));
                default
            }
            None => default,
        }
    }

    fn float(&mut self, section: &str, key: &str, default: f64) -> f64 {
        match self.get(section, key) {
            Some(toml::Value::Float(v)) => *v,
            Some(toml::Value::Integer(v)) => *v as f64,
            Some(_) => {
                self.errors
                    .push(format!("[{}] {} must be a number", section, key));
                default
            }
            None => default,
        }
    }

    fn string(&mut self, section: &str, key: &str, default: &str) -> String {
        match self.get(section, key) {
            Some(toml::Value::String(v)) => v.clone(),
            Some(_) => {
                self.errors
                    .push(format!("[{}] {} must be a string", section, key));
                default.to_string()
            }
            None => default.to_string(),
        }
    }
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Write the validated values as `const` items
fn generate_config(config: &LockToml) {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let [empty, low, low_pct, high, high_pct, full] = config.battery;

    let source = format!(
        "// Generated from lock.toml by build.rs\n\
        pub const PIN_DIGITS: [u8; 4] = {:?};\n\
        pub const MAX_ATTEMPTS: u8 = {};\n\
        pub const LOCKOUT_DURATION_MS: u32 = {};\n\
        pub const KEY_DEBOUNCE_MS: u32 = {};\n\
        pub const TELEMETRY_INTERVAL_MS: u32 = {};\n\
        pub const VOLTAGE_SMOOTHING: f32 = {:?};\n\
        pub const CHARGE_DEBOUNCE_MS: u32 = {};\n\
        pub const BATTERY_EMPTY_V: f32 = {:?};\n\
        pub const BATTERY_LOW_KNEE_V: f32 = {:?};\n\
        pub const BATTERY_LOW_KNEE_PERCENT: f32 = {:?};\n\
        pub const BATTERY_HIGH_KNEE_V: f32 = {:?};\n\
        pub const BATTERY_HIGH_KNEE_PERCENT: f32 = {:?};\n\
        pub const BATTERY_FULL_V: f32 = {:?};\n\
        pub const LOOP_PERIOD_MS: u32 = {};\n\
        pub const ENTRY_PAUSE_MS: u32 = {};\n\
        pub const RESULT_SCREEN_MS: u32 = {};\n\
        pub const WELCOME_MS: u32 = {};\n\
        pub const PRODUCT_NAME: &str = {:?};\n",
        config.pin,
        config.max_attempts,
        config.lockout_duration_ms,
        config.key_debounce_ms,
        config.telemetry_interval_ms,
        config.voltage_smoothing,
        config.charge_debounce_ms,
        empty,
        low,
        low_pct,
        high,
        high_pct,
        full,
        config.loop_period_ms,
        config.entry_pause_ms,
        config.result_screen_ms,
        config.welcome_ms,
        config.product_name,
    );

    fs::write(out_dir.join("lock_config.rs"), source).unwrap();
}
