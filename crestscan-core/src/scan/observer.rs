//! Report sink for scan progress

use crestscan_protocol::Report;

/// Receives every report produced while executing a command
pub trait ScanObserver {
    /// Handle one report
    fn report(&mut self, report: Report);
}

impl<F: FnMut(Report)> ScanObserver for F {
    fn report(&mut self, report: Report) {
        self(report)
    }
}

/// Observer that discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl ScanObserver for NullObserver {
    fn report(&mut self, _report: Report) {}
}
