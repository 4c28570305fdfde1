use crate::model::{Ball, Extra, Innings};

/// Injected collaborator that turns a ball into a commentary line. Kept
/// behind a trait so core tests never depend on natural-language output.
pub trait CommentaryGenerator: Send + Sync {
    fn describe(&self, ball: &Ball, innings: &Innings) -> String;
}

/// Deterministic default commentary.
pub struct BasicCommentary;

impl CommentaryGenerator for BasicCommentary {
    fn describe(&self, ball: &Ball, innings: &Innings) -> String {
        let position = format!("{}.{}", ball.over_number, ball.ball_number);

        let action = if let Some(dismissal) = &ball.dismissal {
            format!("WICKET! {} {}", dismissal.player_id, dismissal.kind)
        } else {
            match (ball.extra, ball.bat_runs, ball.extra_runs) {
                (Some(extra), _, extra_runs) => format!("{}, {} extra", extra, extra_runs),
                (None, 0, _) => "no run".to_string(),
                (None, 4, _) => format!("FOUR by {}", ball.striker_id),
                (None, 6, _) => format!("SIX by {}", ball.striker_id),
                (None, runs, _) => format!("{} run(s) to {}", runs, ball.striker_id),
            }
        };

        format!(
            "{} - {} to {}: {}. {} {}/{}",
            position,
            ball.bowler_id,
            ball.striker_id,
            action,
            innings.batting_team,
            innings.total_runs,
            innings.wickets
        )
    }
}
