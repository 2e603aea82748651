//! Crestscan - Rotary Crest Scanner Firmware
//!
//! Main firmware binary for RP2040-based scanner boards. A stepper sweeps
//! the probe across an angular range, finds the angle of the strongest
//! signal and refines it, stopping on either travel-limit switch.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::adc::{Adc, Channel};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{BufferedInterruptHandler, BufferedUart, Config as UartConfig};
use embassy_time::Delay;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use crestscan_core::config::ScannerConfig;
use crestscan_core::scan::ScanEngine;
use crestscan_core::sim::SimSensor;
use crestscan_drivers::limit::LimitSwitchPair;
use crestscan_drivers::sensor::AdcVoltageSensor;
use crestscan_drivers::stepper::StepDirDriver;

use crate::config::load_config;
use crate::console::ReportWriter;
use crate::probe::{ProbeSensor, RpAdcChannel};

mod channels;
mod config;
mod console;
mod probe;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 512]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Crestscan firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = load_config();

    // Console UART (115200 baud default)
    // Pin assignment is board-specific (SKR Pico: TX=GPIO0, RX=GPIO1)
    let tx_buf = TX_BUF.init([0u8; 512]);
    let rx_buf = RX_BUF.init([0u8; 256]);
    let uart = BufferedUart::new(
        p.UART0,
        p.PIN_0,
        p.PIN_1,
        Irqs,
        tx_buf,
        rx_buf,
        UartConfig::default(),
    );
    let (tx, rx) = uart.split();
    info!("Console UART initialized");

    // Stepper outputs
    // Pin assignments are board-specific (SKR Pico X: STEP=GPIO11, DIR=GPIO10, ENABLE=GPIO12)
    let stepper = StepDirDriver::new(
        Output::new(p.PIN_11, Level::Low),
        Output::new(p.PIN_10, Level::Low),
        Output::new(p.PIN_12, Level::High),
        Delay,
        config.stepper,
    );
    info!("Stepper initialized (driver de-energized)");

    // Limit switches
    // Pin assignments are board-specific (SKR Pico X-STOP=GPIO4, Y-STOP=GPIO3)
    let pull = limit_pull(&config);
    let limits = LimitSwitchPair::new(
        Input::new(p.PIN_4, pull),
        Input::new(p.PIN_3, pull),
        &config.limits,
    );
    info!("Limit switches initialized");

    // Probe input
    // Pin assignment is board-specific (SKR Pico TH0: GPIO27)
    let sensor = if config.simulation.enabled {
        warn!("Simulation enabled: probe ADC is ignored");
        ProbeSensor::Simulated(SimSensor::from_config(&config.simulation))
    } else {
        let adc = Adc::new_blocking(p.ADC, embassy_rp::adc::Config::default());
        let channel = Channel::new_pin(p.PIN_27, Pull::None);
        ProbeSensor::Hardware(AdcVoltageSensor::new(
            RpAdcChannel::new(adc, channel),
            config.sensor,
        ))
    };
    info!("Probe input initialized");

    let engine = ScanEngine::new(config.scan, stepper, limits, sensor);

    spawner.spawn(tasks::console_rx_task(rx)).unwrap();
    spawner
        .spawn(tasks::scanner_task(engine, ReportWriter::new(tx)))
        .unwrap();

    info!("All tasks spawned, scanner ready");

    // Main task has nothing else to do - all work happens in spawned tasks
    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}

/// Input pull matching the switch wiring
fn limit_pull(config: &ScannerConfig) -> Pull {
    match (config.limits.pull_up, config.limits.active_low) {
        (false, _) => Pull::None,
        (true, true) => Pull::Up,
        (true, false) => Pull::Down,
    }
}
