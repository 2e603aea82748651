//! Voltage sensor trait

/// Trait for the probe's voltage reading
pub trait VoltageSensor {
    /// Called once before every scan with the scan's span in degrees
    ///
    /// Simulated sensors regenerate their waveform here; hardware sensors
    /// usually have nothing to do.
    fn begin_scan(&mut self, _span_deg: f32) {}

    /// Read the effective (RMS) voltage at the current axis position
    ///
    /// `position` is the absolute atomic-unit index. Hardware sensors
    /// ignore it; simulated sensors sample their waveform there.
    fn read_voltage(&mut self, position: i32) -> f32;
}
