//! End-to-end simulations: every strategy against a seeded bomb.

use forget_fractal::{PuzzleConfig, Verdict};
use forget_fractal_sim::{run, SimConfig, Strategy};

fn config(seed: u64, strategy: Strategy) -> SimConfig {
    SimConfig {
        seed: Some(seed),
        modules: 5,
        strategy,
        puzzle: PuzzleConfig { reveal_ms: 0, ..PuzzleConfig::default() },
        ..SimConfig::default()
    }
}

#[tokio::test]
async fn test_optimal_solves_first_try() {
    let report = run(config(42, Strategy::Optimal)).await.unwrap();
    assert_eq!(report.verdicts, vec![Verdict::Accept]);
    assert!(report.solved);
    assert_eq!(report.strikes, 0);
    assert!(report.budget >= 1);
    assert!(report.reveal_events >= 32);
    assert_eq!(report.journal.verdicts().collect::<Vec<_>>(), report.verdicts);
}

#[tokio::test]
async fn test_each_penalty_strategy_then_recovers() {
    let cases = [
        (Strategy::Overspend, Verdict::OverBudget),
        (Strategy::CopyOriginal, Verdict::RevealedOriginal),
        (Strategy::Invalid, Verdict::InvalidPattern(1)),
    ];
    for (strategy, first) in cases {
        let report = run(config(7, strategy)).await.unwrap();
        assert_eq!(report.verdicts, vec![first, Verdict::Accept], "{strategy}");
        assert_eq!(report.strikes, 1, "{strategy}");
        assert!(report.solved);
        assert!(!report.exploded);
    }
}

#[tokio::test]
async fn test_single_attempt_leaves_puzzle_unsolved() {
    let cfg = SimConfig { max_attempts: 1, ..config(11, Strategy::Invalid) };
    let report = run(cfg).await.unwrap();
    assert_eq!(report.verdicts.len(), 1);
    assert!(!report.solved);
}

#[tokio::test]
async fn test_same_seed_same_session() {
    let a = run(config(99, Strategy::Optimal)).await.unwrap();
    let b = run(config(99, Strategy::Optimal)).await.unwrap();
    assert_eq!(a.budget, b.budget);
    assert_eq!(a.stages, b.stages);
    assert_eq!(a.ticks, b.ticks);
    assert_ne!(a.session, b.session);
}

#[tokio::test]
async fn test_report_serializes() {
    let report = run(config(3, Strategy::Optimal)).await.unwrap();
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["strategy"], "optimal");
    assert_eq!(json["solved"], true);
    assert!(json["journal"]["entries"].as_array().unwrap().len() > 3);
}
