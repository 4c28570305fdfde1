use serde::{Deserialize, Serialize};

use crate::model::{Extra, ShotTag, WicketKind};

/// A wicket on a delivery. The dismissed player defaults to the striker when
/// not given (run-outs can take the non-striker).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WicketEvent {
    pub kind: WicketKind,
    pub player_id: Option<String>,
    pub fielder_id: Option<String>,
}

/// One scorer-submitted delivery. Striker and bowler are explicit per-ball
/// inputs; the engine does not auto-rotate strike or enforce bowler changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BallEvent {
    pub bowler_id: String,
    pub striker_id: String,
    pub non_striker_id: String,
    /// Raw runs taken, 0-6. Off the bat for a fair delivery; runs ran as
    /// extras for wides, no-balls, byes and leg-byes.
    pub runs: u32,
    #[serde(default)]
    pub extra: Option<Extra>,
    #[serde(default)]
    pub wicket: Option<WicketEvent>,
    #[serde(default)]
    pub shot: Option<ShotTag>,
}

impl BallEvent {
    /// A plain scoring delivery with `runs` off the bat.
    pub fn runs(bowler_id: &str, striker_id: &str, non_striker_id: &str, runs: u32) -> Self {
        Self {
            bowler_id: bowler_id.to_string(),
            striker_id: striker_id.to_string(),
            non_striker_id: non_striker_id.to_string(),
            runs,
            extra: None,
            wicket: None,
            shot: None,
        }
    }

    pub fn with_extra(mut self, extra: Extra) -> Self {
        self.extra = Some(extra);
        self
    }

    pub fn with_wicket(mut self, kind: WicketKind) -> Self {
        self.wicket = Some(WicketEvent {
            kind,
            player_id: None,
            fielder_id: None,
        });
        self
    }

    pub fn with_dismissed(mut self, kind: WicketKind, player_id: &str, fielder_id: Option<&str>) -> Self {
        self.wicket = Some(WicketEvent {
            kind,
            player_id: Some(player_id.to_string()),
            fielder_id: fielder_id.map(|f| f.to_string()),
        });
        self
    }
}
