use serde::{Deserialize, Serialize};

use crate::model::{Innings, MatchResult, ResultMethod, MAX_WICKETS};
use crate::stats;

/// Tournament-standings row for one team, accumulated across its matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamStanding {
    pub team_id: String,
    pub played: u32,
    pub won: u32,
    pub lost: u32,
    pub tied: u32,
    pub points: u32,
    pub runs_scored: u32,
    pub overs_faced: f64,
    pub runs_conceded: u32,
    pub overs_bowled: f64,
    pub net_run_rate: f64,
}

impl TeamStanding {
    pub fn new(team_id: String) -> Self {
        Self {
            team_id,
            played: 0,
            won: 0,
            lost: 0,
            tied: 0,
            points: 0,
            runs_scored: 0,
            overs_faced: 0.0,
            runs_conceded: 0,
            overs_bowled: 0.0,
            net_run_rate: 0.0,
        }
    }

    /// Fold one completed match into the standing. `batted` is this team's
    /// innings, `bowled` the opponent's.
    pub fn apply_match(&mut self, batted: &Innings, bowled: &Innings, result: &MatchResult) {
        self.played += 1;
        match (&result.winner, result.method) {
            (_, ResultMethod::Tie) => {
                self.tied += 1;
                self.points += 1;
            }
            (Some(winner), _) if *winner == self.team_id => {
                self.won += 1;
                self.points += 2;
            }
            _ => self.lost += 1,
        }
        self.runs_scored += batted.total_runs;
        self.overs_faced += batted.overs();
        self.runs_conceded += bowled.total_runs;
        self.overs_bowled += bowled.overs();
        self.net_run_rate = stats::net_run_rate(
            self.runs_scored,
            self.overs_faced,
            self.runs_conceded,
            self.overs_bowled,
        );
    }
}

/// Compare both sealed innings and produce the match result.
///
/// The chasing side wins by wickets in hand, the defending side by its run
/// margin; level scores are a tie (no superover modeled).
pub fn compute_result(first: &Innings, second: &Innings) -> MatchResult {
    let target = second.target.unwrap_or(first.total_runs + 1);

    if second.total_runs >= target {
        let margin = MAX_WICKETS - second.wickets;
        MatchResult {
            winner: Some(second.batting_team.clone()),
            margin,
            method: ResultMethod::Wickets,
            summary: format!("{} won by {} wickets", second.batting_team, margin),
        }
    } else if second.total_runs == first.total_runs {
        MatchResult {
            winner: None,
            margin: 0,
            method: ResultMethod::Tie,
            summary: "Match tied".to_string(),
        }
    } else {
        let margin = first.total_runs - second.total_runs;
        MatchResult {
            winner: Some(first.batting_team.clone()),
            margin,
            method: ResultMethod::Runs,
            summary: format!("{} won by {} runs", first.batting_team, margin),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn innings(number: u8, batting: &str, bowling: &str, runs: u32, wickets: u32, balls: u32) -> Innings {
        let mut i = Innings::new(number, batting.into(), bowling.into(), None);
        i.total_runs = runs;
        i.wickets = wickets;
        i.legal_balls = balls;
        i
    }

    #[test]
    fn defending_side_wins_by_runs() {
        // 180 defended, chase all out for 150
        let first = innings(1, "team-a", "team-b", 180, 6, 120);
        let mut second = innings(2, "team-b", "team-a", 150, 10, 112);
        second.target = Some(181);

        let result = compute_result(&first, &second);
        assert_eq!(result.winner.as_deref(), Some("team-a"));
        assert_eq!(result.margin, 30);
        assert_eq!(result.method, ResultMethod::Runs);
        assert_eq!(result.summary, "team-a won by 30 runs");
    }

    #[test]
    fn chasing_side_wins_by_wickets_in_hand() {
        let first = innings(1, "team-a", "team-b", 160, 8, 120);
        let mut second = innings(2, "team-b", "team-a", 161, 4, 110);
        second.target = Some(161);

        let result = compute_result(&first, &second);
        assert_eq!(result.winner.as_deref(), Some("team-b"));
        assert_eq!(result.margin, 6);
        assert_eq!(result.method, ResultMethod::Wickets);
    }

    #[test]
    fn level_scores_are_a_tie() {
        let first = innings(1, "team-a", "team-b", 145, 7, 120);
        let mut second = innings(2, "team-b", "team-a", 145, 9, 120);
        second.target = Some(146);

        let result = compute_result(&first, &second);
        assert_eq!(result.winner, None);
        assert_eq!(result.method, ResultMethod::Tie);
    }

    #[test]
    fn standings_accumulate_points_and_net_run_rate() {
        let first = innings(1, "team-a", "team-b", 180, 6, 120);
        let mut second = innings(2, "team-b", "team-a", 150, 10, 120);
        second.target = Some(181);
        let result = compute_result(&first, &second);

        let mut winner = TeamStanding::new("team-a".into());
        winner.apply_match(&first, &second, &result);
        assert_eq!(winner.played, 1);
        assert_eq!(winner.won, 1);
        assert_eq!(winner.points, 2);
        assert_eq!(winner.net_run_rate, 1.5);

        let mut loser = TeamStanding::new("team-b".into());
        loser.apply_match(&second, &first, &result);
        assert_eq!(loser.lost, 1);
        assert_eq!(loser.points, 0);
        assert_eq!(loser.net_run_rate, -1.5);
    }

    #[test]
    fn tie_awards_one_point_each() {
        let first = innings(1, "team-a", "team-b", 145, 7, 120);
        let mut second = innings(2, "team-b", "team-a", 145, 9, 120);
        second.target = Some(146);
        let result = compute_result(&first, &second);

        let mut a = TeamStanding::new("team-a".into());
        a.apply_match(&first, &second, &result);
        assert_eq!(a.points, 1);
        assert_eq!(a.tied, 1);
    }
}
