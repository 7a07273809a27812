//! End-to-end replay runs
//!
//! Drives a [`ReplayDriver`] with simulated live frames and collects the
//! per-step reports. Used by the integration tests below and by the demo.

use serde::Serialize;
use tracing::info;

use mirrorstep_core::MirrorResult;
use mirrorstep_runtime::{ReplayDriver, SessionConfig, SessionStats, StepReport};

use crate::simulator::{DanceSimulator, PerformerProfile, SimulatorStats};

/// Outcome of a simulated replay
#[derive(Clone, Debug, Serialize)]
pub struct ReplaySummary {
    pub steps: u64,
    /// Mean displayed score over all steps
    pub mean_smoothed: f32,
    /// Steps whose feedback contained at least one correction
    pub correction_steps: u64,
    pub session: SessionStats,
    #[serde(skip)]
    pub simulator: SimulatorStats,
}

/// Run `steps` frames of a simulated performer against the routine
///
/// `on_step` sees every report as it is produced.
pub fn run_replay<F>(
    config: SessionConfig,
    profile: PerformerProfile,
    seed: u64,
    steps: u64,
    mut on_step: F,
) -> MirrorResult<ReplaySummary>
where
    F: FnMut(&StepReport),
{
    let mut simulator = DanceSimulator::new(profile, seed);
    let mut driver = ReplayDriver::new(config, simulator.reference()?)?;

    let mut smoothed_total = 0.0f64;
    let mut correction_steps = 0;
    for step in 0..steps {
        let live = simulator.live_frame(step)?;
        let report = driver.advance(&live);
        smoothed_total += report.smoothed_similarity as f64;
        if report.feedback.iter().any(|m| m.is_correction()) {
            correction_steps += 1;
        }
        on_step(&report);
    }

    let summary = ReplaySummary {
        steps,
        mean_smoothed: if steps == 0 {
            0.0
        } else {
            (smoothed_total / steps as f64) as f32
        },
        correction_steps,
        session: driver.session().stats().clone(),
        simulator: simulator.stats().clone(),
    };
    info!(
        steps,
        mean_smoothed = summary.mean_smoothed,
        corrections = correction_steps,
        "replay finished"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{flatten, frame, rotate_about, standing_pose};
    use mirrorstep_core::{LandmarkFrame, LEFT_ELBOW, LEFT_ELBOW_ANGLE, LEFT_WRIST};
    use mirrorstep_feedback::{FeedbackKind, SkeletonColor, ALL_GOOD_MESSAGE};
    use mirrorstep_metrics::{MissPolicy, ScoreStatus};
    use mirrorstep_runtime::{ComparisonSession, ReferenceSequence};
    use proptest::prelude::*;

    #[test]
    fn test_mirror_performer_scores_perfectly() {
        let mut reports = Vec::new();
        let summary = run_replay(
            SessionConfig::default(),
            PerformerProfile::mirror(),
            3,
            120,
            |r| reports.push(r.clone()),
        )
        .unwrap();

        assert_eq!(summary.session.scored, 120);
        assert_eq!(summary.correction_steps, 0);
        assert!((summary.mean_smoothed - 1.0).abs() < 1e-5);
        for report in &reports {
            assert!((report.result.similarity - 1.0).abs() < 1e-5);
            assert_eq!(report.feedback[0].text, ALL_GOOD_MESSAGE);
        }
    }

    #[test]
    fn test_typical_performer_scores_well() {
        let summary = run_replay(
            SessionConfig::default(),
            PerformerProfile::typical(),
            11,
            600,
            |_| {},
        )
        .unwrap();
        assert!(summary.mean_smoothed > 0.8, "mean {}", summary.mean_smoothed);
    }

    #[test]
    fn test_sloppy_performer_scores_below_typical() {
        let typical =
            run_replay(SessionConfig::default(), PerformerProfile::typical(), 5, 600, |_| {})
                .unwrap();
        let sloppy =
            run_replay(SessionConfig::default(), PerformerProfile::sloppy(), 5, 600, |_| {})
                .unwrap();
        assert!(sloppy.mean_smoothed < typical.mean_smoothed);
    }

    #[test]
    fn test_dropouts_counted_as_missed_live() {
        let summary = run_replay(
            SessionConfig::default(),
            PerformerProfile::sloppy(),
            21,
            400,
            |_| {},
        )
        .unwrap();
        assert!(summary.simulator.dropped > 0);
        assert_eq!(summary.session.missed_live, summary.simulator.dropped);
        assert_eq!(
            summary.session.scored
                + summary.session.missed_live
                + summary.session.insufficient_visibility
                + summary.session.missed_reference,
            400
        );
    }

    #[test]
    fn test_same_seed_same_scores() {
        let run = || {
            let mut scores = Vec::new();
            run_replay(
                SessionConfig::default(),
                PerformerProfile::sloppy(),
                77,
                200,
                |r| scores.push(r.smoothed_similarity),
            )
            .unwrap();
            scores
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_reset_policy_zeroes_after_dropout() {
        let mut config = SessionConfig::default();
        config.smoothing.miss_policy = MissPolicy::Reset;

        let mut checked = 0;
        run_replay(config, PerformerProfile::sloppy(), 4, 300, |r| {
            if !r.live_detected {
                assert_eq!(r.smoothed_similarity, 0.0);
                checked += 1;
            }
        })
        .unwrap();
        assert!(checked > 0);
    }

    #[test]
    fn test_reference_gaps_skip_scoring() {
        let sim = DanceSimulator::with_period(PerformerProfile::mirror(), 0, 10);
        let reference = ReferenceSequence::from_detections(sim.reference_detections(5)).unwrap();
        assert_eq!(reference.detected_count(), 8);

        let mut session = ComparisonSession::new(SessionConfig::default()).unwrap();
        for step in 0..20 {
            let live = frame(sim.routine_pose(step)).unwrap();
            let report = session.step(reference.frame_at(step), &live);
            if step % 5 == 4 {
                assert_eq!(report.result.status, ScoreStatus::MissingReference);
                assert!(report.feedback.is_empty());
            } else {
                assert_eq!(report.result.status, ScoreStatus::Scored);
            }
        }
        assert_eq!(session.stats().missed_reference, 4);
        assert!((session.smoothed_similarity() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_bent_elbow_flagged_end_to_end() {
        let reference = frame(standing_pose()).unwrap();
        let mut bent = standing_pose();
        rotate_about(&mut bent, LEFT_ELBOW, LEFT_WRIST, 60.0);
        let live = LandmarkFrame::from_flat(&flatten(&bent)).unwrap();

        let mut session = ComparisonSession::new(SessionConfig::default()).unwrap();
        let report = session.step(&reference, &live);

        assert!(report.result.similarity < 1.0);
        assert!(report.feedback.iter().any(|m| matches!(
            m.kind,
            FeedbackKind::Correction { angle, .. } if angle == LEFT_ELBOW_ANGLE
        )));
        let forearm = report
            .bones
            .iter()
            .find(|b| b.connection == (LEFT_ELBOW, LEFT_WRIST))
            .unwrap();
        assert_eq!(forearm.color, SkeletonColor::TrackedBad);
    }

    #[test]
    fn test_summary_serializes() {
        let summary = run_replay(
            SessionConfig::default(),
            PerformerProfile::mirror(),
            0,
            10,
            |_| {},
        )
        .unwrap();
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["steps"], 10);
        assert_eq!(json["session"]["scored"], 10);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_any_seed_stays_in_range(seed in any::<u64>(), reset in any::<bool>()) {
            let mut config = SessionConfig::default();
            if reset {
                config.smoothing.miss_policy = MissPolicy::Reset;
            }
            let mut in_range = true;
            let summary = run_replay(config, PerformerProfile::sloppy(), seed, 120, |r| {
                in_range &= (0.0..=1.0).contains(&r.smoothed_similarity)
                    && (0.0..=1.0).contains(&r.result.similarity);
            })
            .unwrap();

            prop_assert!(in_range);
            prop_assert!((0.0..=1.0).contains(&summary.mean_smoothed));
            prop_assert_eq!(summary.session.missed_live, summary.simulator.dropped);
            prop_assert_eq!(summary.session.steps, 120);
        }
    }
}
