//! End-to-end scans on the simulated rig

use crestscan_core::config::ScanConfig;
use crestscan_core::motion::ATOMIC_UNIT_DEG;
use crestscan_core::safety::SafetyState;
use crestscan_core::scan::{NullObserver, ScanEngine, ScanOutcome};
use crestscan_core::sim::{SimLimits, SimSensor, SimStepper};
use crestscan_core::state::Phase;
use crestscan_core::waveform::{WaveformModel, WaveformSegment};
use crestscan_core::{Command, Report, Side};
use proptest::prelude::*;

type SimEngine = ScanEngine<SimStepper, SimLimits, SimSensor>;

fn engine(segments: &[WaveformSegment], span: f32) -> SimEngine {
    let model = WaveformModel::from_segments(span, segments).unwrap();
    ScanEngine::new(
        ScanConfig::default(),
        SimStepper::new(),
        SimLimits::new(),
        SimSensor::fixed(model),
    )
}

/// A narrow bump so the brackets stop quickly
fn bump() -> SimEngine {
    engine(
        &[
            WaveformSegment::new(0.0, 8.0, 1.0),
            WaveformSegment::new(8.0, 4.0, 4.5),
            WaveformSegment::new(12.0, 8.0, 1.0),
        ],
        20.0,
    )
}

fn collect(engine: &mut SimEngine, command: Command) -> Vec<Report> {
    let mut reports = Vec::new();
    engine
        .execute(command, &mut |report: Report| reports.push(report))
        .unwrap();
    reports
}

#[test]
fn single_segment_coarse_peak() {
    let mut engine = engine(&[WaveformSegment::new(0.0, 90.0, 3.0)], 90.0);
    let reports = collect(&mut engine, Command::Scan(90.0));

    let sweeps: Vec<_> = reports
        .iter()
        .filter(|r| matches!(r, Report::Sweep { .. }))
        .collect();
    // Constant plateau: reported once on entry
    assert_eq!(sweeps.len(), 1);
    match sweeps[0] {
        Report::Sweep { degree, voltage } => {
            assert!((degree - ATOMIC_UNIT_DEG).abs() < 1e-6);
            assert!((voltage - 2.121).abs() < 1e-3);
        }
        _ => unreachable!(),
    }

    assert!(matches!(reports.last(), Some(Report::Crest { .. })));
}

#[test]
fn report_order_follows_phases() {
    let mut engine = bump();
    let reports = collect(&mut engine, Command::Scan(20.0));

    let rank = |r: &Report| match r {
        Report::Sweep { .. } => 0,
        Report::Bracket {
            side: Side::Left, ..
        } => 1,
        Report::Recenter { .. } => 2,
        Report::Bracket {
            side: Side::Right, ..
        } => 3,
        Report::Probe { .. } => 4,
        Report::Crest { .. } => 5,
        _ => 99,
    };
    let ranks: Vec<_> = reports.iter().map(rank).collect();
    assert!(ranks.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(ranks.iter().filter(|&&r| r == 2).count(), 1);
    assert_eq!(*ranks.last().unwrap(), 5);
}

#[test]
fn bump_crest_inside_plateau() {
    let mut engine = bump();
    let outcome = engine.scan(20.0, &mut NullObserver).unwrap();
    let crest = outcome.crest().unwrap();

    assert!(crest.degree >= 8.0 && crest.degree < 12.0);
    assert!((crest.voltage - 4.5 * 0.707).abs() < 1e-3);
    assert_eq!(engine.state().home_offset_deg(), crest.degree);
}

#[test]
fn flat_waveform_terminates_on_no_gain() {
    let mut engine = engine(&[WaveformSegment::new(0.0, 90.0, 3.0)], 90.0);
    let reports = collect(&mut engine, Command::Scan(60.0));

    let probes = reports
        .iter()
        .filter(|r| matches!(r, Report::Probe { .. }))
        .count();
    // Three rounds of two in-range offsets
    assert_eq!(probes, 6);

    let outcome = engine.scan(60.0, &mut NullObserver).unwrap();
    let crest = outcome.crest().unwrap();
    assert_eq!(crest.probe_rounds, 3);
    assert!((crest.voltage - 3.0 * 0.707).abs() < 1e-6);
}

#[test]
fn probe_skips_offsets_outside_range() {
    let mut engine = engine(&[WaveformSegment::new(0.0, 90.0, 3.0)], 90.0);
    let reports = collect(&mut engine, Command::Scan(4.0));

    for report in &reports {
        if let Report::Probe { degree, .. } = report {
            assert!(degree.abs() <= 4.0 + ATOMIC_UNIT_DEG);
        }
    }
    // 10° and 5° offsets are out of range on both sides
    let first_jump = reports.iter().find_map(|r| match r {
        Report::Probe { jump, .. } => Some(*jump),
        _ => None,
    });
    assert_eq!(first_jump, Some(2.5));
}

#[test]
fn trip_in_fine_search_aborts_without_crest() {
    let mut engine = bump();
    let sweep_units = 356;
    // Sweep, walk back to the peak at 8.044° (index 143), then one bracket step
    let back = sweep_units - 143;
    engine
        .safety_mut()
        .switches_mut()
        .trip_after(sweep_units + back + 1, Side::Left);

    let outcome = engine.scan(20.0, &mut NullObserver).unwrap();
    let abort = outcome.aborted().unwrap();
    assert_eq!(abort.interrupted, Phase::FineBracketLeft);
    assert_eq!(abort.side, Side::Left);
    assert_eq!(abort.retreat_units, 35556);
    assert_eq!(engine.state().position(), 142 + 35556);
    assert_eq!(engine.state().home_offset_deg(), 0.0);
}

#[test]
fn reset_home_returns_to_zero_and_is_idempotent() {
    let mut engine = bump();
    engine.scan(20.0, &mut NullObserver).unwrap();
    engine.scan(20.0, &mut NullObserver).unwrap();
    let offset = engine.state().home_offset_deg();
    assert!(offset > 16.0);

    let first = collect(&mut engine, Command::ResetHome);
    assert!(matches!(first[..], [Report::HomeReset { .. }]));
    assert_eq!(engine.state().position(), 0);
    assert_eq!(engine.state().home_offset_deg(), 0.0);

    let steps = engine.actuator().driver().total_steps();
    let second = collect(&mut engine, Command::ResetHome);
    assert_eq!(second, vec![Report::HomeIdle]);
    assert_eq!(engine.actuator().driver().total_steps(), steps);
}

#[test]
fn seeded_sensor_scans_regenerate_waveform() {
    let mut engine = ScanEngine::new(
        ScanConfig::default(),
        SimStepper::new(),
        SimLimits::new(),
        SimSensor::seeded(11),
    );

    engine.scan(120.0, &mut NullObserver).unwrap();
    assert_eq!(engine.sensor().model(), &WaveformModel::generate(120.0, 11));

    engine.scan(-120.0, &mut NullObserver).unwrap();
    assert_eq!(engine.sensor().model(), &WaveformModel::generate(120.0, 12));
}

#[test]
fn report_lines_render() {
    let mut engine = bump();
    let reports = collect(&mut engine, Command::Scan(20.0));
    for report in reports {
        let line = report.to_line().unwrap();
        assert!(!line.is_empty());
        assert!(!line.contains('\n'));
    }

    let abort = collect(&mut engine, Command::InjectTrip(Side::Right));
    assert_eq!(
        abort[0].to_line().unwrap().as_str(),
        "abort right retreat=2000.0deg"
    );
}

fn polls_of_clean_scan() -> u32 {
    let mut engine = bump();
    engine.scan(20.0, &mut NullObserver).unwrap();
    engine.safety().switches().polls()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn trip_anywhere_retreats_once(fraction in 0.0f64..1.0, left in any::<bool>()) {
        let total = polls_of_clean_scan();
        let at = 1 + (fraction * f64::from(total - 1)) as u32;
        let side = if left { Side::Left } else { Side::Right };

        let mut engine = bump();
        engine.safety_mut().switches_mut().trip_after(at, side);

        let mut aborts = 0;
        let mut crests = 0;
        let outcome = engine
            .scan(20.0, &mut |report: Report| match report {
                Report::Aborted { .. } => aborts += 1,
                Report::Crest { .. } => crests += 1,
                _ => {}
            })
            .unwrap();

        prop_assert_eq!(aborts, 1);
        prop_assert_eq!(crests, 0);
        match outcome {
            ScanOutcome::Aborted(abort) => {
                prop_assert_eq!(abort.side, side);
                prop_assert_eq!(abort.retreat_units, 35556);
                prop_assert!(abort.interrupted.is_scanning());
            }
            ScanOutcome::Crest(_) => prop_assert!(false, "scan completed despite trip"),
        }
        prop_assert_eq!(engine.state().safety(), SafetyState::Clear);
        prop_assert_eq!(engine.state().phase(), Phase::Idle);
        prop_assert_eq!(engine.state().home_offset_deg(), 0.0);
        // Exactly one retreat: polls stop while latched, so the schedule
        // is consumed once
        prop_assert_eq!(engine.safety().trip_count(), 1);
    }
}
