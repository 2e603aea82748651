//! Console output
//!
//! Reports are written to the UART as they are produced. The scan runs to
//! completion inside the scanner task, so writes block on the TX ring
//! buffer rather than queueing through a channel.

use defmt::*;
use embassy_rp::uart::BufferedUartTx;
use embedded_io::Write;

use crestscan_core::scan::ScanObserver;
use crestscan_protocol::Report;

/// Writes each report as one CRLF-terminated line
pub struct ReportWriter {
    tx: BufferedUartTx,
}

impl ReportWriter {
    /// Create a writer on the console UART
    pub fn new(tx: BufferedUartTx) -> Self {
        Self { tx }
    }

    fn write_line(&mut self, report: &Report) {
        let line = match report.to_line() {
            Ok(line) => line,
            Err(_) => {
                warn!("Report too long for line buffer: {:?}", report);
                return;
            }
        };

        if let Err(e) = self
            .tx
            .write_all(line.as_bytes())
            .and_then(|()| self.tx.write_all(b"\r\n"))
        {
            warn!("Console write failed: {:?}", e);
        }
    }
}

impl ScanObserver for ReportWriter {
    fn report(&mut self, report: Report) {
        if report.is_progress() {
            trace!("{}", report);
        } else if matches!(report, Report::Aborted { .. } | Report::Rejected(_)) {
            warn!("{}", report);
        } else if report.is_terminal() {
            info!("Scan finished: {}", report);
        } else {
            info!("{}", report);
        }
        self.write_line(&report);
    }
}
