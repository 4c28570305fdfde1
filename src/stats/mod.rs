//! Pure statistics calculators shared by the scoring engine.
//!
//! Every function is deterministic and treats a zero denominator as a defined
//! sentinel instead of letting NaN/Infinity leak into persisted or displayed
//! figures.

/// Batting strike rate: runs per 100 balls faced.
pub fn strike_rate(runs: u32, balls: u32) -> f64 {
    if balls == 0 {
        return 0.0;
    }
    runs as f64 / balls as f64 * 100.0
}

/// Bowling economy: runs conceded per over bowled.
pub fn economy(runs: u32, overs: f64) -> f64 {
    if overs <= 0.0 {
        return 0.0;
    }
    runs as f64 / overs
}

/// Batting or bowling average. With no dismissals/wickets the raw run count
/// is returned, matching the convention for a not-out average.
pub fn average(runs: u32, count: u32) -> f64 {
    if count == 0 {
        return runs as f64;
    }
    runs as f64 / count as f64
}

/// Current scoring rate in runs per over.
pub fn run_rate(runs: u32, overs: f64) -> f64 {
    if overs <= 0.0 {
        return 0.0;
    }
    runs as f64 / overs
}

/// Rate the chasing side needs to reach the target. `None` once no overs
/// remain - the chase is decided, not a division by zero.
pub fn required_run_rate(target: u32, current_runs: u32, overs_left: f64) -> Option<f64> {
    if overs_left <= 0.0 {
        return None;
    }
    Some((target + 1).saturating_sub(current_runs) as f64 / overs_left)
}

/// Projected final score if the current run rate holds for the full quota.
pub fn projected_score(current_runs: u32, current_overs: f64, total_overs: u32) -> u32 {
    if current_overs <= 0.0 {
        return 0;
    }
    (current_runs as f64 / current_overs * total_overs as f64).round() as u32
}

/// Net run rate: scoring rate minus conceding rate, rounded to 3 decimals.
pub fn net_run_rate(
    runs_scored: u32,
    overs_faced: f64,
    runs_conceded: u32,
    overs_bowled: f64,
) -> f64 {
    let scored = runs_scored as f64 / overs_faced.max(1.0);
    let conceded = runs_conceded as f64 / overs_bowled.max(1.0);
    round3(scored - conceded)
}

/// Fractional overs from a legal-ball count: completed overs plus the
/// in-progress fraction (e.g. 16 balls -> 2.666...).
pub fn overs_from_balls(legal_balls: u32) -> f64 {
    (legal_balls / 6) as f64 + (legal_balls % 6) as f64 / 6.0
}

/// Cricket-notation overs display for a legal-ball count (16 balls -> "2.4").
pub fn overs_display(legal_balls: u32) -> String {
    format!("{}.{}", legal_balls / 6, legal_balls % 6)
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
