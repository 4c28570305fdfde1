use cricscore::model::Extra;
use cricscore::scoring::BallOutcome;
use cricscore::{BallEvent, WicketKind};

use super::setup::TestSetup;

// ============================================================================
// Scoring Actions
// ============================================================================

impl TestSetup {
    /// A plain delivery off the bat by the default opening pair.
    pub async fn bat(&self, runs: u32) -> BallOutcome {
        self.scoring
            .record_ball(
                &self.match_id,
                BallEvent::runs("bowler-1", "bat-1", "bat-2", runs),
            )
            .await
            .unwrap()
    }

    pub async fn extra(&self, extra: Extra, runs: u32) -> BallOutcome {
        self.scoring
            .record_ball(
                &self.match_id,
                BallEvent::runs("bowler-1", "bat-1", "bat-2", runs).with_extra(extra),
            )
            .await
            .unwrap()
    }

    /// A wicket falling to the named striker; the kind defaults to bowled.
    pub async fn wicket(&self, striker: &str, partner: &str, kind: WicketKind) -> BallOutcome {
        self.scoring
            .record_ball(
                &self.match_id,
                BallEvent::runs("bowler-1", striker, partner, 0).with_wicket(kind),
            )
            .await
            .unwrap()
    }

    /// Script an innings total in sixes, then dot balls for the remainder.
    pub async fn score_runs(&self, total: u32) {
        let mut scored = 0;
        while scored + 6 <= total {
            self.bat(6).await;
            scored += 6;
        }
        if scored < total {
            self.bat(total - scored).await;
        }
    }

    /// Bowl the batting side out, one distinct batter per ball.
    pub async fn all_out(&self) {
        for i in 0..10 {
            let striker = format!("bat-{}", i + 1);
            let partner = format!("bat-{}", i + 2);
            let outcome = self.wicket(&striker, &partner, WicketKind::Bowled).await;
            if outcome.innings_complete {
                break;
            }
        }
    }

    pub async fn end_innings(&self) {
        self.scoring.end_innings(&self.match_id).await.unwrap();
    }
}
