//! Comparison session - the per-frame loop

use serde::Serialize;
use tracing::{debug, info};

use mirrorstep_core::{LandmarkFrame, MirrorResult};
use mirrorstep_feedback::{BoneColor, FeedbackGenerator, FeedbackMessage, SkeletonClassifier};
use mirrorstep_metrics::{ComparisonResult, ScoreStatus, SimilarityHistory, SimilarityScorer};

use crate::{ReferenceSequence, SessionConfig};

/// Counters accumulated over the lifetime of a session
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    pub steps: u64,
    /// Steps that produced a real score
    pub scored: u64,
    pub missed_live: u64,
    pub missed_reference: u64,
    pub insufficient_visibility: u64,
}

/// Everything produced for one frame pair
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StepReport {
    pub step: u64,
    pub result: ComparisonResult,
    /// Running mean of recent raw scores, the value to display
    pub smoothed_similarity: f32,
    pub feedback: Vec<FeedbackMessage>,
    pub bones: Vec<BoneColor>,
    pub live_detected: bool,
}

/// One performer compared against one reference
#[derive(Debug, Clone)]
pub struct ComparisonSession {
    config: SessionConfig,
    scorer: SimilarityScorer,
    history: SimilarityHistory,
    feedback: FeedbackGenerator,
    classifier: SkeletonClassifier,
    stats: SessionStats,
}

impl ComparisonSession {
    pub fn new(config: SessionConfig) -> MirrorResult<Self> {
        config.validate()?;
        info!(
            capacity = config.smoothing.capacity,
            miss_policy = ?config.smoothing.miss_policy,
            "comparison session created"
        );
        Ok(Self {
            scorer: SimilarityScorer::with_config(config.scoring.clone()),
            history: SimilarityHistory::with_config(&config.smoothing),
            feedback: FeedbackGenerator::with_config(config.feedback.clone()),
            classifier: SkeletonClassifier::with_thresholds(config.colors.clone()),
            stats: SessionStats::default(),
            config,
        })
    }

    /// Run the pipeline for one frame pair
    ///
    /// A step where either pose is absent applies the miss policy instead
    /// of entering the history. Insufficient visibility is a real zero and
    /// is pushed.
    pub fn step(&mut self, reference: &LandmarkFrame, live: &LandmarkFrame) -> StepReport {
        let step = self.stats.steps;
        let result = self.scorer.compare(reference, live);

        if result.is_missing_pose() {
            self.history.record_miss();
        } else {
            self.history.push(result.similarity);
        }
        let smoothed_similarity = self.history.current();

        let feedback = self.feedback.for_result(&result);
        let bones = self.classifier.classify_skeleton(&result);

        self.stats.steps += 1;
        match result.status {
            ScoreStatus::Scored => self.stats.scored += 1,
            ScoreStatus::MissingLive => self.stats.missed_live += 1,
            ScoreStatus::MissingReference => self.stats.missed_reference += 1,
            ScoreStatus::InsufficientVisibility => self.stats.insufficient_visibility += 1,
        }

        debug!(
            step,
            status = ?result.status,
            similarity = result.similarity,
            smoothed = smoothed_similarity,
            "step"
        );

        StepReport {
            step,
            result,
            smoothed_similarity,
            feedback,
            bones,
            live_detected: live.is_present(),
        }
    }

    pub fn smoothed_similarity(&self) -> f32 {
        self.history.current()
    }

    pub fn history(&self) -> &SimilarityHistory {
        &self.history
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Clear history and counters, keeping the configuration
    pub fn reset(&mut self) {
        self.history.clear();
        self.stats = SessionStats::default();
    }
}

/// Loops a recorded reference against a live stream
///
/// Step `n` compares live frame `n` with reference frame `n mod len`.
#[derive(Debug, Clone)]
pub struct ReplayDriver {
    session: ComparisonSession,
    reference: ReferenceSequence,
    cursor: u64,
}

impl ReplayDriver {
    pub fn new(config: SessionConfig, reference: ReferenceSequence) -> MirrorResult<Self> {
        Ok(Self {
            session: ComparisonSession::new(config)?,
            reference,
            cursor: 0,
        })
    }

    /// Feed the next live frame
    pub fn advance(&mut self, live: &LandmarkFrame) -> StepReport {
        let reference = self.reference.frame_at(self.cursor);
        let report = self.session.step(reference, live);
        self.cursor += 1;
        report
    }

    pub fn session(&self) -> &ComparisonSession {
        &self.session
    }

    pub fn reference(&self) -> &ReferenceSequence {
        &self.reference
    }

    /// Steps taken so far
    pub fn cursor(&self) -> u64 {
        self.cursor
    }

    /// Restart playback from the first reference frame
    pub fn rewind(&mut self) {
        self.cursor = 0;
        self.session.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mirrorstep_core::{Landmark, POSE_LANDMARK_COUNT};
    use mirrorstep_feedback::{
        FeedbackKind, SkeletonColor, ALL_GOOD_MESSAGE, LOW_VISIBILITY_MESSAGE, NO_POSE_MESSAGE,
    };
    use mirrorstep_metrics::{MissPolicy, SmoothingConfig};
    use proptest::prelude::*;

    fn standing_pose() -> LandmarkFrame {
        let mut joints = vec![Landmark::new(0.5, 0.2, 0.0, 1.0); POSE_LANDMARK_COUNT];
        let points: [(usize, f32, f32); 12] = [
            (11, 0.60, 0.30),
            (12, 0.40, 0.30),
            (13, 0.70, 0.40),
            (14, 0.30, 0.40),
            (15, 0.80, 0.50),
            (16, 0.20, 0.50),
            (23, 0.57, 0.60),
            (24, 0.43, 0.60),
            (25, 0.58, 0.75),
            (26, 0.42, 0.75),
            (27, 0.58, 0.90),
            (28, 0.42, 0.90),
        ];
        for (i, x, y) in points {
            joints[i] = Landmark::new(x, y, 0.0, 1.0);
        }
        LandmarkFrame::from_landmarks(joints).unwrap()
    }

    fn hidden_pose() -> LandmarkFrame {
        LandmarkFrame::from_landmarks(vec![
            Landmark::new(0.5, 0.5, 0.0, 0.1);
            POSE_LANDMARK_COUNT
        ])
        .unwrap()
    }

    fn session_with(miss_policy: MissPolicy) -> ComparisonSession {
        ComparisonSession::new(SessionConfig {
            smoothing: SmoothingConfig {
                capacity: 3,
                miss_policy,
            },
            ..SessionConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_identical_frames() {
        let mut session = ComparisonSession::new(SessionConfig::default()).unwrap();
        let pose = standing_pose();
        let report = session.step(&pose, &pose);

        assert_eq!(report.step, 0);
        assert!(report.live_detected);
        assert_eq!(report.result.similarity, 1.0);
        assert_eq!(report.smoothed_similarity, 1.0);
        assert_eq!(report.feedback.len(), 1);
        assert_eq!(report.feedback[0].kind, FeedbackKind::AllGood);
        assert_eq!(report.feedback[0].text, ALL_GOOD_MESSAGE);
        assert!(report
            .bones
            .iter()
            .filter(|b| b.color.is_tracked())
            .all(|b| b.color == SkeletonColor::TrackedGood));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = SessionConfig::default();
        config.smoothing.capacity = 0;
        assert!(ComparisonSession::new(config).is_err());
    }

    #[test]
    fn test_missing_live_skip_policy() {
        let mut session = session_with(MissPolicy::Skip);
        let pose = standing_pose();
        session.step(&pose, &pose);

        let report = session.step(&pose, &LandmarkFrame::absent());
        assert!(!report.live_detected);
        assert_eq!(report.result.similarity, 0.0);
        assert_eq!(report.result.status, ScoreStatus::MissingLive);
        assert_eq!(report.smoothed_similarity, 1.0);
        assert_eq!(report.feedback[0].text, NO_POSE_MESSAGE);
        assert!(report.bones.iter().all(|b| !b.color.is_tracked()));
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn test_missing_live_reset_policy() {
        let mut session = session_with(MissPolicy::Reset);
        let pose = standing_pose();
        session.step(&pose, &pose);
        session.step(&pose, &pose);

        let report = session.step(&pose, &LandmarkFrame::absent());
        assert_eq!(report.smoothed_similarity, 0.0);
        assert!(session.history().is_empty());

        let report = session.step(&pose, &pose);
        assert_eq!(report.smoothed_similarity, 1.0);
    }

    #[test]
    fn test_missing_reference_gives_no_feedback() {
        let mut session = session_with(MissPolicy::Skip);
        let report = session.step(&LandmarkFrame::absent(), &standing_pose());
        assert!(report.live_detected);
        assert_eq!(report.result.status, ScoreStatus::MissingReference);
        assert!(report.feedback.is_empty());
        assert_eq!(session.stats().missed_reference, 1);
    }

    #[test]
    fn test_insufficient_visibility_is_pushed() {
        let mut session = session_with(MissPolicy::Skip);
        let pose = standing_pose();
        session.step(&pose, &pose);

        let report = session.step(&pose, &hidden_pose());
        assert_eq!(report.result.status, ScoreStatus::InsufficientVisibility);
        assert!(report.live_detected);
        assert_eq!(session.history().len(), 2);
        assert!((report.smoothed_similarity - 0.5).abs() < 1e-6);

        assert_eq!(report.feedback.len(), 1);
        assert_eq!(report.feedback[0].kind, FeedbackKind::LowVisibility);
        assert_eq!(report.feedback[0].text, LOW_VISIBILITY_MESSAGE);
        assert!(!report.feedback.iter().any(|m| m.is_correction()
            || m.kind == FeedbackKind::Position));
        assert!(report.bones.iter().all(|b| !b.color.is_tracked()));
    }

    #[test]
    fn test_stats_and_reset() {
        let mut session = session_with(MissPolicy::Skip);
        let pose = standing_pose();
        session.step(&pose, &pose);
        session.step(&pose, &LandmarkFrame::absent());
        session.step(&pose, &hidden_pose());

        let stats = session.stats();
        assert_eq!(stats.steps, 3);
        assert_eq!(stats.scored, 1);
        assert_eq!(stats.missed_live, 1);
        assert_eq!(stats.insufficient_visibility, 1);

        session.reset();
        assert_eq!(session.stats(), &SessionStats::default());
        assert_eq!(session.smoothed_similarity(), 0.0);
        assert_eq!(session.step(&pose, &pose).step, 0);
    }

    #[test]
    fn test_replay_driver_wraps_reference() {
        let pose = standing_pose();
        let reference =
            ReferenceSequence::new(vec![pose.clone(), LandmarkFrame::absent()]).unwrap();
        let mut driver = ReplayDriver::new(SessionConfig::default(), reference).unwrap();

        let statuses: Vec<ScoreStatus> = (0..4)
            .map(|_| driver.advance(&pose).result.status)
            .collect();
        assert_eq!(
            statuses,
            vec![
                ScoreStatus::Scored,
                ScoreStatus::MissingReference,
                ScoreStatus::Scored,
                ScoreStatus::MissingReference,
            ]
        );
        assert_eq!(driver.cursor(), 4);

        driver.rewind();
        assert_eq!(driver.cursor(), 0);
        assert_eq!(driver.session().stats().steps, 0);
    }

    #[test]
    fn test_report_serializes() {
        let mut session = ComparisonSession::new(SessionConfig::default()).unwrap();
        let pose = standing_pose();
        let json = serde_json::to_string(&session.step(&pose, &pose)).unwrap();
        assert!(json.contains("\"smoothed_similarity\":1.0"));
        assert!(json.contains("\"live_detected\":true"));
    }

    fn arb_frame() -> impl Strategy<Value = LandmarkFrame> {
        let joint = (0.0f32..1.0, 0.0f32..1.0, -0.5f32..0.5, 0.0f32..1.0)
            .prop_map(|(x, y, z, v)| Landmark::new(x, y, z, v));
        prop_oneof![
            1 => Just(LandmarkFrame::absent()),
            4 => prop::collection::vec(joint, POSE_LANDMARK_COUNT)
                .prop_map(|joints| LandmarkFrame::from_landmarks(joints).unwrap()),
        ]
    }

    proptest! {
        #[test]
        fn prop_smoothed_stays_in_unit_range(
            frames in prop::collection::vec((arb_frame(), arb_frame()), 1..20),
            reset in any::<bool>(),
        ) {
            let policy = if reset { MissPolicy::Reset } else { MissPolicy::Skip };
            let mut session = session_with(policy);
            for (step, (reference, live)) in frames.iter().enumerate() {
                let report = session.step(reference, live);
                prop_assert_eq!(report.step, step as u64);
                prop_assert!((0.0..=1.0).contains(&report.result.similarity));
                prop_assert!((0.0..=1.0).contains(&report.smoothed_similarity));
                prop_assert!(session.history().len() <= 3);
                prop_assert!(!report.feedback.is_empty() || !reference.is_present());
            }
            prop_assert_eq!(session.stats().steps, frames.len() as u64);
        }
    }
}
