//! Scanner task
//!
//! Owns the scan engine and executes console commands one at a time. A
//! scan blocks this task (and the executor) until it finishes or aborts;
//! limit switches are polled after every step, not by interrupt.

use defmt::*;
use embassy_rp::gpio::{Input, Output};
use embassy_time::Delay;

use crestscan_core::scan::{ScanEngine, ScanObserver};
use crestscan_drivers::limit::LimitSwitchPair;
use crestscan_drivers::stepper::StepDirDriver;
use crestscan_protocol::Report;

use crate::channels::CONSOLE_CHANNEL;
use crate::console::ReportWriter;
use crate::probe::ProbeSensor;

/// Stepper on GPIO STEP/DIR/ENABLE with busy-wait pulse timing
pub type FirmwareStepper =
    StepDirDriver<Output<'static>, Output<'static>, Output<'static>, Delay>;

/// Left and right limit inputs
pub type FirmwareLimits = LimitSwitchPair<Input<'static>, Input<'static>>;

/// The scan engine as wired on the board
pub type FirmwareEngine = ScanEngine<FirmwareStepper, FirmwareLimits, ProbeSensor>;

/// Scanner task - executes commands from the console
#[embassy_executor::task]
pub async fn scanner_task(mut engine: FirmwareEngine, mut console: ReportWriter) {
    info!("Scanner task started");

    loop {
        let command = match CONSOLE_CHANNEL.receive().await {
            Ok(command) => command,
            Err(e) => {
                console.report(Report::Rejected(e));
                continue;
            }
        };

        if command.is_test_only() {
            warn!("Executing test-only command: {:?}", command);
        } else {
            info!("Executing {:?}", command);
        }

        if let Err(e) = engine.execute(command, &mut console) {
            warn!("Command failed: {:?}", e);
            continue;
        }

        let state = engine.state();
        debug!(
            "position={} home_offset={}° driver_enabled={} trips={}",
            state.position(),
            state.home_offset_deg(),
            state.driver_enabled(),
            engine.safety().trip_count()
        );
    }
}
