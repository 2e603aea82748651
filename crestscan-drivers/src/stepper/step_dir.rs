//! STEP/DIR/ENABLE stepper driver
//!
//! One call to [`StepActuator::step`] is one microstep: set DIR if it
//! changed, wait the setup time, then a single high/low pulse on STEP.
//! The low time doubles as the inter-step delay, so it sets the scan speed.

use crestscan_core::config::StepperHwConfig;
use crestscan_core::traits::{Direction, StepActuator};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

/// Bit-banged step/direction driver
pub struct StepDirDriver<STEP, DIR, EN, D> {
    step: STEP,
    dir: DIR,
    enable: EN,
    delay: D,
    config: StepperHwConfig,
    /// Direction currently latched on DIR
    direction: Option<Direction>,
    enabled: bool,
}

impl<STEP, DIR, EN, D> StepDirDriver<STEP, DIR, EN, D>
where
    STEP: OutputPin,
    DIR: OutputPin,
    EN: OutputPin,
    D: DelayNs,
{
    /// Create a driver with the outputs idle and the driver de-energized
    pub fn new(step: STEP, dir: DIR, enable: EN, delay: D, config: StepperHwConfig) -> Self {
        let mut driver = Self {
            step,
            dir,
            enable,
            delay,
            config,
            direction: None,
            enabled: true,
        };
        let _ = driver.step.set_low();
        driver.set_enabled(false);
        driver
    }

    /// Check if the driver is energized
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Direction currently set on DIR
    pub fn direction(&self) -> Option<Direction> {
        self.direction
    }

    /// Release the pins and delay
    pub fn release(self) -> (STEP, DIR, EN, D) {
        (self.step, self.dir, self.enable, self.delay)
    }

    fn set_direction(&mut self, direction: Direction) {
        if self.direction == Some(direction) {
            return;
        }

        let high = (direction == Direction::Positive) != self.config.invert_direction;
        let _ = if high {
            self.dir.set_high()
        } else {
            self.dir.set_low()
        };
        self.direction = Some(direction);
        self.delay.delay_us(self.config.dir_setup_us);
    }
}

impl<STEP, DIR, EN, D> StepActuator for StepDirDriver<STEP, DIR, EN, D>
where
    STEP: OutputPin,
    DIR: OutputPin,
    EN: OutputPin,
    D: DelayNs,
{
    fn step(&mut self, direction: Direction) {
        self.set_direction(direction);

        let _ = self.step.set_high();
        self.delay.delay_us(self.config.pulse_high_us);
        let _ = self.step.set_low();
        self.delay.delay_us(self.config.pulse_low_us);
    }

    fn set_enabled(&mut self, enabled: bool) {
        if self.enabled == enabled {
            return;
        }

        // Active-low: energized = pin LOW
        let high = enabled != self.config.enable_active_low;
        let _ = if high {
            self.enable.set_high()
        } else {
            self.enable.set_low()
        };
        self.enabled = enabled;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::digital::ErrorType;

    /// Mock output pin counting rising edges
    #[derive(Default)]
    struct MockPin {
        high: bool,
        rising_edges: u32,
    }

    impl ErrorType for MockPin {
        type Error = Infallible;
    }

    impl OutputPin for MockPin {
        fn set_high(&mut self) -> Result<(), Infallible> {
            if !self.high {
                self.rising_edges += 1;
            }
            self.high = true;
            Ok(())
        }

        fn set_low(&mut self) -> Result<(), Infallible> {
            self.high = false;
            Ok(())
        }
    }

    /// Mock delay accumulating requested time
    #[derive(Default)]
    struct MockDelay {
        total_ns: u64,
    }

    impl DelayNs for MockDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.total_ns += u64::from(ns);
        }
    }

    type TestDriver = StepDirDriver<MockPin, MockPin, MockPin, MockDelay>;

    fn driver(config: StepperHwConfig) -> TestDriver {
        StepDirDriver::new(
            MockPin::default(),
            MockPin::default(),
            MockPin::default(),
            MockDelay::default(),
            config,
        )
    }

    #[test]
    fn test_starts_disabled() {
        let driver = driver(StepperHwConfig::default());
        assert!(!driver.is_enabled());
        let (step, _, enable, _) = driver.release();
        assert!(!step.high);
        // Active-low enable held high
        assert!(enable.high);
    }

    #[test]
    fn test_enable_polarity() {
        let mut driver = driver(StepperHwConfig::default());
        driver.set_enabled(true);
        assert!(driver.is_enabled());
        assert!(!driver.enable.high);

        let mut driver = driver_active_high();
        driver.set_enabled(true);
        assert!(driver.enable.high);
    }

    fn driver_active_high() -> TestDriver {
        driver(StepperHwConfig {
            enable_active_low: false,
            ..Default::default()
        })
    }

    #[test]
    fn test_one_pulse_per_step() {
        let mut driver = driver(StepperHwConfig::default());
        for _ in 0..5 {
            driver.step(Direction::Positive);
        }
        assert_eq!(driver.step.rising_edges, 5);
        assert!(!driver.step.high);
        assert!(driver.dir.high);
    }

    #[test]
    fn test_direction_setup_only_on_change() {
        let config = StepperHwConfig::default();
        let per_step_ns = u64::from(config.pulse_high_us + config.pulse_low_us) * 1000;
        let setup_ns = u64::from(config.dir_setup_us) * 1000;

        let mut driver = driver(config);
        driver.step(Direction::Negative);
        driver.step(Direction::Negative);
        driver.step(Direction::Positive);

        assert_eq!(driver.direction(), Some(Direction::Positive));
        assert_eq!(driver.delay.total_ns, 3 * per_step_ns + 2 * setup_ns);
    }

    #[test]
    fn test_inverted_direction() {
        let mut driver = driver(StepperHwConfig {
            invert_direction: true,
            ..Default::default()
        });
        driver.step(Direction::Positive);
        assert!(!driver.dir.high);
        driver.step(Direction::Negative);
        assert!(driver.dir.high);
    }
}
