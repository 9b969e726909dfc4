//! INA219 high-side current and power monitor
//!
//! Configured for a 32 V bus and up to 2 A through a 0.1 ohm shunt:
//! calibration 4096, current LSB 0.1 mA, power LSB 2 mW.

use embedded_hal::i2c::I2c;
use pinlock_core::telemetry::PowerSample;
use pinlock_core::traits::{PowerSensor, SensorError};

/// Address with A0 and A1 tied to ground
pub const DEFAULT_ADDRESS: u8 = 0x40;

mod reg {
    pub const CONFIG: u8 = 0x00;
    pub const SHUNT_VOLTAGE: u8 = 0x01;
    pub const BUS_VOLTAGE: u8 = 0x02;
    pub const POWER: u8 = 0x03;
    pub const CURRENT: u8 = 0x04;
    pub const CALIBRATION: u8 = 0x05;
}

/// 32 V range, /8 gain (320 mV), 12-bit bus and shunt, continuous
const CONFIG_32V_2A: u16 = 0x2000 | 0x1800 | 0x0180 | 0x0018 | 0x0007;

const CALIBRATION_32V_2A: u16 = 4096;

const SHUNT_LSB_V: f32 = 10e-6;
const BUS_LSB_V: f32 = 4e-3;
const CURRENT_LSB_A: f32 = 100e-6;
const POWER_LSB_W: f32 = 2e-3;

/// Bus register math overflow flag
const BUS_OVF: u16 = 0x0001;

/// INA219 on a blocking I2C bus
pub struct Ina219<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C: I2c> Ina219<I2C> {
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Write configuration and calibration
    pub fn init(&mut self) -> Result<(), SensorError> {
        self.write_register(reg::CONFIG, CONFIG_32V_2A)
            .map_err(|_| SensorError::NotPresent)?;
        self.write_register(reg::CALIBRATION, CALIBRATION_32V_2A)
            .map_err(|_| SensorError::NotPresent)
    }

    /// Shunt voltage (V)
    pub fn shunt_voltage(&mut self) -> Result<f32, SensorError> {
        let raw = self.read_register(reg::SHUNT_VOLTAGE)? as i16;
        Ok(f32::from(raw) * SHUNT_LSB_V)
    }

    /// Bus voltage (V)
    pub fn bus_voltage(&mut self) -> Result<f32, SensorError> {
        let raw = self.read_register(reg::BUS_VOLTAGE)?;
        if raw & BUS_OVF != 0 {
            return Err(SensorError::Overflow);
        }
        Ok(f32::from(raw >> 3) * BUS_LSB_V)
    }

    /// Current (A), negative when flowing into the battery
    ///
    /// Rewrites the calibration first: a brown-out resets it to 0 and the
    /// current register would then read 0.
    pub fn current(&mut self) -> Result<f32, SensorError> {
        self.write_register(reg::CALIBRATION, CALIBRATION_32V_2A)?;
        let raw = self.read_register(reg::CURRENT)? as i16;
        Ok(f32::from(raw) * CURRENT_LSB_A)
    }

    /// Power (W)
    pub fn power(&mut self) -> Result<f32, SensorError> {
        self.write_register(reg::CALIBRATION, CALIBRATION_32V_2A)?;
        let raw = self.read_register(reg::POWER)?;
        Ok(f32::from(raw) * POWER_LSB_W)
    }

    pub fn release(self) -> I2C {
        self.i2c
    }

    fn read_register(&mut self, register: u8) -> Result<u16, SensorError> {
        let mut buf = [0u8; 2];
        self.i2c
            .write_read(self.address, &[register], &mut buf)
            .map_err(|_| SensorError::Bus)?;
        Ok(u16::from_be_bytes(buf))
    }

    fn write_register(&mut self, register: u8, value: u16) -> Result<(), SensorError> {
        let [hi, lo] = value.to_be_bytes();
        self.i2c
            .write(self.address, &[register, hi, lo])
            .map_err(|_| SensorError::Bus)
    }
}

impl<I2C: I2c> PowerSensor for Ina219<I2C> {
    fn sample(&mut self) -> Result<PowerSample, SensorError> {
        Ok(PowerSample {
            shunt_voltage_v: self.shunt_voltage()?,
            bus_voltage_v: self.bus_voltage()?,
            current_a: self.current()?,
            power_w: self.power()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::i2c::{ErrorKind, ErrorType, Operation};

    /// Register file behind a fake bus
    #[derive(Default)]
    struct FakeIna {
        regs: [u16; 6],
        pointer: usize,
        absent: bool,
    }

    impl ErrorType for FakeIna {
        type Error = ErrorKind;
    }

    impl I2c for FakeIna {
        fn transaction(&mut self, address: u8, operations: &mut [Operation<'_>]) -> Result<(), ErrorKind> {
            if self.absent || address != DEFAULT_ADDRESS {
                return Err(ErrorKind::NoAcknowledge(embedded_hal::i2c::NoAcknowledgeSource::Address));
            }
            for op in operations {
                match op {
                    Operation::Write(bytes) => {
                        self.pointer = usize::from(bytes[0]);
                        if bytes.len() == 3 {
                            self.regs[self.pointer] = u16::from_be_bytes([bytes[1], bytes[2]]);
                        }
                    }
                    Operation::Read(buf) => {
                        buf.copy_from_slice(&self.regs[self.pointer].to_be_bytes());
                    }
                }
            }
            Ok(())
        }
    }

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn test_init_writes_config_and_calibration() {
        let mut ina = Ina219::new(FakeIna::default(), DEFAULT_ADDRESS);
        ina.init().unwrap();
        let bus = ina.release();
        assert_eq!(bus.regs[reg::CONFIG as usize], 0x399F);
        assert_eq!(bus.regs[reg::CALIBRATION as usize], 4096);
    }

    #[test]
    fn test_missing_device() {
        let fake = FakeIna {
            absent: true,
            ..FakeIna::default()
        };
        let mut ina = Ina219::new(fake, DEFAULT_ADDRESS);
        assert_eq!(ina.init(), Err(SensorError::NotPresent));
        assert_eq!(ina.sample(), Err(SensorError::Bus));
    }

    #[test]
    fn test_sample_scaling() {
        let mut fake = FakeIna::default();
        // -12.5 mV shunt, 12.0 V bus, -1.25 A, 15 W
        fake.regs[reg::SHUNT_VOLTAGE as usize] = (-1250i16) as u16;
        fake.regs[reg::BUS_VOLTAGE as usize] = 3000 << 3 | 0b10;
        fake.regs[reg::CURRENT as usize] = (-12500i16) as u16;
        fake.regs[reg::POWER as usize] = 7500;

        let mut ina = Ina219::new(fake, DEFAULT_ADDRESS);
        let sample = ina.sample().unwrap();
        assert!(close(sample.shunt_voltage_v, -0.0125));
        assert!(close(sample.bus_voltage_v, 12.0));
        assert!(close(sample.current_a, -1.25));
        assert!(close(sample.power_w, 15.0));
    }

    #[test]
    fn test_bus_overflow() {
        let mut fake = FakeIna::default();
        fake.regs[reg::BUS_VOLTAGE as usize] = 3000 << 3 | BUS_OVF;
        let mut ina = Ina219::new(fake, DEFAULT_ADDRESS);
        assert_eq!(ina.bus_voltage(), Err(SensorError::Overflow));
    }
}
