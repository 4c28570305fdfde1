use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::model::{
    Ball, CommentaryLine, Dismissal, Extra, MatchModel, SealReason, MAX_WICKETS, POWERPLAY_OVERS,
};
use crate::scoring::{BallEvent, CommentaryGenerator, ScoringError};
use crate::stats;

/// Normalized state-delta produced by one applied ball, suitable for
/// persistence and broadcast.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BallOutcome {
    pub ball: Ball,
    pub inning: u8,
    pub total_runs: u32,
    pub wickets: u32,
    pub extras: u32,
    /// Over/ball position of the next delivery slot after this one.
    pub over_number: u32,
    pub ball_number: u32,
    pub overs_display: String,
    pub commentary: String,
    pub innings_complete: bool,
    pub seal_reason: Option<SealReason>,
    pub required_run_rate: Option<f64>,
    pub projected_score: Option<u32>,
}

/// Apply one ball event to the match's active innings.
///
/// All-or-nothing: every validation runs before the first mutation, so a
/// rejected ball leaves the match untouched. Legal deliveries advance the
/// 6-ball over counter; wides and no-balls do not.
pub fn apply_ball(
    m: &mut MatchModel,
    event: &BallEvent,
    commentary: &dyn CommentaryGenerator,
) -> Result<BallOutcome, ScoringError> {
    // -------- validation, no mutation past this block --------
    if !m.status.is_active_innings() {
        return Err(ScoringError::InvalidState(format!(
            "match {} is not in an active innings (status {})",
            m.id, m.status
        )));
    }
    let innings = m
        .current_innings()
        .ok_or_else(|| ScoringError::NotFound(format!("active innings of match {}", m.id)))?;
    if let Some(reason) = innings.sealed {
        return Err(ScoringError::InvalidState(format!(
            "innings {} is sealed ({})",
            innings.number, reason
        )));
    }
    if event.runs > 6 {
        return Err(ScoringError::InvalidInput(format!(
            "runs must be 0-6, got {}",
            event.runs
        )));
    }
    if let Some(wicket) = &event.wicket {
        let illegal_delivery = event.extra.map_or(false, Extra::is_illegal_delivery);
        if illegal_delivery && wicket.kind.requires_legal_delivery() {
            return Err(ScoringError::InvalidInput(format!(
                "{} dismissal is impossible off a {}",
                wicket.kind,
                event.extra.unwrap_or(Extra::Wide)
            )));
        }
    }

    let match_id = m.id.clone();
    let inning = m.current_inning;
    let overs_quota_balls = m.overs_per_innings * 6;

    // -------- normalization --------
    let legal = event.extra.map_or(true, |e| !e.is_illegal_delivery());
    let (bat_runs, extra_runs) = match event.extra {
        None => (event.runs, 0),
        // Automatic penalty run on top of any runs the batsmen ran.
        Some(Extra::Wide) | Some(Extra::NoBall) => (0, event.runs + 1),
        Some(Extra::Bye) | Some(Extra::LegBye) | Some(Extra::Penalty) => (0, event.runs),
    };
    let total = bat_runs + extra_runs;

    let innings = m.current_innings_mut().expect("validated above");

    // Position of this delivery; wides and no-balls occupy the upcoming slot
    // without consuming it.
    let over_number = innings.legal_balls / 6;
    let ball_number = innings.legal_balls % 6 + 1;

    // Deterministic per delivery slot. A retried ball after a partial
    // persistence failure reuses the id, so the log store can replace the
    // orphaned entry instead of duplicating it.
    innings.deliveries += 1;
    let ball_id = format!("{}:{}:{}", match_id, inning, innings.deliveries);

    let dismissal = event.wicket.as_ref().map(|w| Dismissal {
        kind: w.kind,
        player_id: w
            .player_id
            .clone()
            .unwrap_or_else(|| event.striker_id.clone()),
        fielder_id: w.fielder_id.clone(),
    });

    let ball = Ball {
        id: ball_id,
        match_id,
        inning,
        over_number,
        ball_number,
        bowler_id: event.bowler_id.clone(),
        striker_id: event.striker_id.clone(),
        non_striker_id: event.non_striker_id.clone(),
        bat_runs,
        extra_runs,
        extra: event.extra,
        dismissal: dismissal.clone(),
        shot: event.shot.clone(),
        recorded_at: Utc::now(),
    };

    // -------- innings aggregates --------
    innings.total_runs += total;
    match event.extra {
        Some(Extra::Wide) => innings.extras.wides += extra_runs,
        Some(Extra::NoBall) => innings.extras.no_balls += extra_runs,
        Some(Extra::Bye) => innings.extras.byes += extra_runs,
        Some(Extra::LegBye) => innings.extras.leg_byes += extra_runs,
        Some(Extra::Penalty) => innings.extras.penalty += extra_runs,
        None => {}
    }
    if legal {
        innings.legal_balls += 1;
    }
    if over_number < POWERPLAY_OVERS {
        innings.powerplay.runs += total;
        if dismissal.is_some() {
            innings.powerplay.wickets += 1;
        }
    }

    // Striker: balls faced on everything but a wide, runs off the bat,
    // boundary counters on fair deliveries only.
    let faces_ball = !matches!(event.extra, Some(Extra::Wide));
    {
        let entry = innings.batting_entry_mut(&event.striker_id);
        if faces_ball {
            entry.balls += 1;
        }
        entry.runs += bat_runs;
        if event.extra.is_none() {
            match bat_runs {
                4 => entry.fours += 1,
                6 => entry.sixes += 1,
                _ => {}
            }
        }
        entry.strike_rate = stats::strike_rate(entry.runs, entry.balls);
    }

    // Bowler: wides and no-balls count against him, byes and leg-byes do not;
    // run-outs carry no bowler credit.
    let over_completed = legal && innings.legal_balls % 6 == 0;
    {
        let charged = bat_runs
            + if event.extra.map_or(false, Extra::charged_to_bowler) {
                extra_runs
            } else {
                0
            };
        let entry = innings.bowling_entry_mut(&event.bowler_id);
        if legal {
            entry.balls += 1;
        }
        entry.runs_conceded += charged;
        entry.current_over_runs += charged;
        if let Some(d) = &dismissal {
            if d.kind.credits_bowler() {
                entry.wickets += 1;
            }
        }
        if over_completed {
            if entry.current_over_runs == 0 {
                entry.maidens += 1;
            }
            entry.current_over_runs = 0;
        }
        entry.economy = stats::economy(entry.runs_conceded, entry.overs());
    }

    // Partnership for the pair at the crease; a new pair starts a fresh one.
    let pair_matches = innings
        .current_partnership
        .as_ref()
        .map_or(false, |p| p.involves(&event.striker_id, &event.non_striker_id));
    if !pair_matches {
        innings.current_partnership = Some(crate::model::Partnership::new(
            event.striker_id.clone(),
            event.non_striker_id.clone(),
        ));
    }
    if let Some(partnership) = innings.current_partnership.as_mut() {
        partnership.runs += total;
        if legal {
            partnership.balls += 1;
        }
    }

    if let Some(d) = &dismissal {
        let entry = innings.batting_entry_mut(&d.player_id);
        entry.is_out = true;
        entry.is_batting = false;
        entry.dismissal = Some(d.clone());
        innings.wickets += 1;
        innings.close_partnership();
        if innings.wickets >= MAX_WICKETS {
            innings.sealed = Some(SealReason::AllOut);
        }
    }

    if innings.sealed.is_none() && innings.legal_balls >= overs_quota_balls {
        innings.sealed = Some(SealReason::OversExhausted);
    }

    let total_runs = innings.total_runs;
    let wickets = innings.wickets;
    let extras = innings.extras.total();
    let legal_balls = innings.legal_balls;
    let target = innings.target;
    let seal_reason = innings.sealed;

    m.current_over = legal_balls / 6;
    m.current_ball = legal_balls % 6 + 1;

    let overs = stats::overs_from_balls(legal_balls);
    let overs_left = m.overs_per_innings as f64 - overs;
    let required_run_rate =
        target.and_then(|t| stats::required_run_rate(t, total_runs, overs_left));
    let projected_score = if target.is_none() && overs > 0.0 {
        Some(stats::projected_score(total_runs, overs, m.overs_per_innings))
    } else {
        None
    };

    let text = {
        let innings = m.current_innings().expect("innings exists");
        commentary.describe(&ball, innings)
    };
    m.commentary.push(CommentaryLine {
        inning,
        over: ball.over_number,
        ball: ball.ball_number,
        text: text.clone(),
        at: ball.recorded_at,
    });

    Ok(BallOutcome {
        ball,
        inning,
        total_runs,
        wickets,
        extras,
        over_number: m.current_over,
        ball_number: m.current_ball,
        overs_display: stats::overs_display(legal_balls),
        commentary: text,
        innings_complete: seal_reason.is_some(),
        seal_reason,
        required_run_rate,
        projected_score,
    })
}
