//! Prediction statistics tests.
//!
//! Bucket routing, counter invariants under arbitrary retirement streams, the
//! periodic report cadence, and the exact text of both report formats.

use npcsim_core::isa::{Classification, ControlFlow, classify};
use npcsim_core::stats::{PredictionStats, Rate, Tally, WindowSnapshot};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

use crate::common::harness::{BEQ_BACK_8, BNE_FWD_16, JAL_8, RET};

fn outcome(kind: ControlFlow, correct: bool) -> Classification {
    Classification { kind, correct }
}

#[test]
fn indirect_jump_feeds_indirect_and_overall_only() {
    let mut stats = PredictionStats::default();
    stats.record(classify(RET, 0x8000_0100, 0x8000_0100).unwrap());

    assert_eq!(stats.indirect(), Tally { total: 1, correct: 1 });
    assert_eq!(stats.control_flow(), Tally { total: 1, correct: 1 });
    assert_eq!(stats.branch(), Tally::default());
    assert_eq!(stats.branch_forward(), Tally::default());
    assert_eq!(stats.branch_backward(), Tally::default());
}

#[test]
fn mispredicted_backward_branch() {
    let mut stats = PredictionStats::default();
    stats.record(classify(BEQ_BACK_8, 0x8000_0010, 0x8000_0008).unwrap());

    assert_eq!(stats.branch(), Tally { total: 1, correct: 0 });
    assert_eq!(stats.branch_backward(), Tally { total: 1, correct: 0 });
    assert_eq!(stats.branch_forward(), Tally::default());
    assert_eq!(stats.control_flow().wrong(), 1);
}

#[test]
fn forward_branch_is_bucketed_forward() {
    let mut stats = PredictionStats::default();
    stats.record(classify(BNE_FWD_16, 0x8000_0020, 0x8000_0020).unwrap());

    assert_eq!(stats.branch_forward(), Tally { total: 1, correct: 1 });
    assert_eq!(stats.branch_backward(), Tally::default());
}

#[test]
fn direct_jump_counts_only_overall() {
    let mut stats = PredictionStats::default();
    stats.record(classify(JAL_8, 0x8000_0008, 0x8000_0008).unwrap());

    assert_eq!(stats.control_flow(), Tally { total: 1, correct: 1 });
    assert_eq!(stats.branch(), Tally::default());
    assert_eq!(stats.indirect(), Tally::default());
}

fn arb_outcome() -> impl Strategy<Value = Classification> {
    let kind = prop_oneof![
        (-2048i32..2048).prop_map(|h| ControlFlow::Branch { offset: h * 2 }),
        Just(ControlFlow::Jump),
        Just(ControlFlow::IndirectJump),
    ];
    (kind, any::<bool>()).prop_map(|(kind, correct)| outcome(kind, correct))
}

proptest! {
    #[test]
    fn bucket_invariants_hold(stream in prop::collection::vec(arb_outcome(), 0..200)) {
        let mut stats = PredictionStats::default();
        for o in &stream {
            stats.record(*o);
        }

        let buckets = [
            stats.control_flow(),
            stats.branch(),
            stats.branch_forward(),
            stats.branch_backward(),
            stats.indirect(),
        ];
        for t in buckets {
            prop_assert!(t.correct <= t.total);
            prop_assert_eq!(t.wrong(), t.total - t.correct);
        }
        prop_assert_eq!(stats.control_flow().total, stream.len() as u64);
        prop_assert_eq!(
            stats.branch_forward().total + stats.branch_backward().total,
            stats.branch().total
        );
        prop_assert_eq!(
            stats.branch_forward().correct + stats.branch_backward().correct,
            stats.branch().correct
        );
        prop_assert!(stats.branch().total + stats.indirect().total <= stats.control_flow().total);
    }
}

#[test]
fn report_fires_on_exact_multiples_only() {
    let mut stats = PredictionStats::new(50_000);
    let fired: Vec<u64> = (1..=100_000)
        .filter(|&n| stats.maybe_report(n).is_some())
        .collect();
    assert_eq!(fired, vec![50_000, 100_000]);
    assert_eq!(stats.window().instructions, 100_000);
}

#[test]
fn off_interval_calls_leave_the_window_alone() {
    let mut stats = PredictionStats::new(50_000);
    stats.record(classify(RET, 1, 1).unwrap());
    assert!(stats.maybe_report(49_999).is_none());
    assert_eq!(stats.window(), WindowSnapshot::default());

    assert!(stats.maybe_report(50_000).is_some());
    let snapshot = stats.window();
    assert_eq!(snapshot.instructions, 50_000);
    assert_eq!(snapshot.control_flow, Tally { total: 1, correct: 1 });

    stats.record(classify(RET, 2, 3).unwrap());
    assert!(stats.maybe_report(50_001).is_none());
    assert_eq!(stats.window(), snapshot);
}

#[test]
fn disabled_interval_never_reports() {
    let mut stats = PredictionStats::new(0);
    assert!((1..=1_000).all(|n| stats.maybe_report(n).is_none()));
    assert_eq!(stats.window().instructions, 0);
}

#[test]
fn window_covers_only_the_last_interval() {
    let mut stats = PredictionStats::new(10);
    stats.record(classify(RET, 1, 1).unwrap());
    stats.record(classify(RET, 1, 2).unwrap());
    let first = stats.maybe_report(10).unwrap();
    assert_eq!(first.window, Tally { total: 2, correct: 1 });

    stats.record(classify(RET, 3, 3).unwrap());
    let second = stats.maybe_report(20).unwrap();
    assert_eq!(second.window_instructions, 10);
    assert_eq!(second.window, Tally { total: 1, correct: 1 });
    assert_eq!(second.cumulative, Tally { total: 3, correct: 2 });
}

#[test]
fn progress_line_with_empty_window() {
    let mut stats = PredictionStats::new(50_000);
    let report = stats.maybe_report(50_000).unwrap();
    assert_eq!(
        report.to_string(),
        "[PCPRED] commit=50000 win_inst=50000 cf_total=0 cf_correct=0 cf_wrong=0 cf_rate=0.00% \
         win_cf_total=0 win_cf_correct=0 win_cf_wrong=0 win_cf_rate=0.00%"
    );
}

#[test]
fn progress_line_rates() {
    let mut stats = PredictionStats::new(4);
    stats.record(classify(RET, 1, 1).unwrap());
    stats.record(classify(RET, 1, 1).unwrap());
    stats.record(classify(RET, 1, 1).unwrap());
    stats.record(classify(RET, 1, 2).unwrap());
    let report = stats.maybe_report(4).unwrap();
    assert_eq!(
        report.to_string(),
        "[PCPRED] commit=4 win_inst=4 cf_total=4 cf_correct=3 cf_wrong=1 cf_rate=75.00% \
         win_cf_total=4 win_cf_correct=3 win_cf_wrong=1 win_cf_rate=75.00%"
    );
}

#[test]
fn final_report_text() {
    let mut stats = PredictionStats::default();
    stats.record(classify(RET, 0x10, 0x10).unwrap());

    let expected = "\
NEXT-PC PREDICTION
  cf.total               1
  cf.correct             1
  cf.wrong               0
  cf.rate                100.00%
  branch (0x63)          total=0 correct=0 wrong=0 rate=N/A
  branch.forward         total=0 correct=0 wrong=0 rate=N/A
  branch.backward        total=0 correct=0 wrong=0 rate=N/A
  jalr (0x67)            total=1 correct=1 wrong=0 rate=100.00%
";
    assert_eq!(stats.to_string(), expected);
}

#[test]
fn rate_formatting() {
    assert_eq!(Rate(Some(97.2857)).to_string(), "97.29%");
    assert_eq!(Rate(None).to_string(), "N/A");
    assert_eq!(Tally { total: 3, correct: 1 }.rate().map(|r| (r * 100.0).round()), Some(3333.0));
}
