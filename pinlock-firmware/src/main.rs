//! pinlock - Keypad PIN Lock Firmware
//!
//! Main firmware binary for RP2040-based boards. A 4x3 keypad gates a
//! relay behind a PIN; wrong entries are counted in flash and a lockout
//! survives power loss. An SH1106 OLED shows the entry screens and, once
//! unlocked, the battery status.
//!
//! # Wiring
//!
//! | Function        | Pins                     |
//! |-----------------|--------------------------|
//! | Keypad rows     | GP2, GP3, GP4, GP5       |
//! | Keypad columns  | GP6, GP7, GP8 (pull-up)  |
//! | Relay           | GP12 (active high)       |
//! | OLED (I2C0)     | SDA GP20, SCL GP21       |
//! | INA219 (I2C1)   | SDA GP26, SCL GP27       |

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::i2c::{self, I2c};
use embassy_time::{Delay, Timer};
use {defmt_rtt as _, panic_probe as _};

use pinlock_core::traits::KeySource;
use pinlock_core::LockController;
use pinlock_display::Presenter;
use pinlock_drivers::display::{Sh1106, SH1106_DEFAULT_ADDRESS};
use pinlock_drivers::keypad::MatrixKeypad;
use pinlock_hal_rp2040::{EmbassyUptime, RelayOutput, Rp2040Eeprom};

mod config;

/// I2C bus speed for the OLED and the power monitor
const I2C_FREQUENCY: u32 = 400_000;

/// Main entry point
#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("pinlock firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let lock_config = config::lock_config();
    // lock.toml is checked by build.rs; this catches a broken generator
    unwrap!(lock_config.validate());

    // Security state lives in the last 64KB of flash
    let mut eeprom = Rp2040Eeprom::new(p.FLASH, p.DMA_CH0);
    if let Err(e) = eeprom.load().await {
        warn!("Stored security state unreadable: {}", e);
    }

    // OLED on I2C0
    let mut i2c_config = i2c::Config::default();
    i2c_config.frequency = I2C_FREQUENCY;
    let oled_i2c = I2c::new_blocking(p.I2C0, p.PIN_21, p.PIN_20, i2c_config);
    let mut oled = Sh1106::new(oled_i2c, SH1106_DEFAULT_ADDRESS);
    match oled.init() {
        Ok(()) => info!("OLED initialized"),
        Err(e) => warn!("OLED init failed: {}", e),
    }
    let presenter = Presenter::with_product_name(oled, config::PRODUCT_NAME);

    // Keypad: rows idle high, a pressed key pulls its column low
    let rows = [
        Output::new(p.PIN_2, Level::High),
        Output::new(p.PIN_3, Level::High),
        Output::new(p.PIN_4, Level::High),
        Output::new(p.PIN_5, Level::High),
    ];
    let cols = [
        Input::new(p.PIN_6, Pull::Up),
        Input::new(p.PIN_7, Pull::Up),
        Input::new(p.PIN_8, Pull::Up),
    ];
    let mut keypad = MatrixKeypad::new(rows, cols, EmbassyUptime);

    let relay = RelayOutput::new(p.PIN_12);

    #[cfg(feature = "ina219")]
    let mut sensor = {
        use pinlock_drivers::power::{Ina219, INA219_DEFAULT_ADDRESS};

        let sensor_i2c = I2c::new_blocking(p.I2C1, p.PIN_27, p.PIN_26, i2c_config);
        let mut ina = Ina219::new(sensor_i2c, INA219_DEFAULT_ADDRESS);
        match ina.init() {
            Ok(()) => info!("INA219 initialized"),
            Err(e) => warn!("INA219 init failed: {}", e),
        }
        ina
    };

    #[cfg(not(feature = "ina219"))]
    let mut sensor = pinlock_drivers::power::FixedPowerSensor::default();

    let mut controller = unwrap!(LockController::new(
        lock_config,
        eeprom,
        relay,
        presenter,
        Delay,
        EmbassyUptime,
    ));

    controller.boot(&mut sensor);
    info!("Lock running");

    loop {
        let key = keypad.poll_key();
        controller.tick(key, &mut sensor);
        Timer::after_millis(lock_config.loop_period_ms as u64).await;
    }
}
