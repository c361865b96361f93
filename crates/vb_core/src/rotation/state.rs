use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::Result;
use crate::models::{Formation, PlayerKey, Score, Slot, TeamSide, WallTime};

/// On-court arrangement of both teams and the side holding serve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RotationState {
    pub formations: [Formation; 2],
    /// `None` between a period start and its serve declaration, and after a
    /// period end.
    pub serving: Option<TeamSide>,
}

impl RotationState {
    pub fn formation(&self, side: TeamSide) -> &Formation {
        &self.formations[side.index()]
    }

    /// Slot-1 player of the serving team.
    pub fn server(&self) -> Option<PlayerKey> {
        self.serving.map(|side| self.formation(side).server())
    }

    pub fn is_serving(&self, side: TeamSide) -> bool {
        self.serving == Some(side)
    }
}

/// Effect of one event on the rotation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Transition {
    /// New period; `reset` flags the teams whose designated lineup replaced
    /// their previous formation.
    PeriodOpened { period: u8, reset: [bool; 2] },
    ServeDeclared { team: TeamSide },
    ServeRetained { team: TeamSide },
    /// `team` won the rally on the opponent's serve and rotated.
    SideOut { team: TeamSide },
    Substituted {
        team: TeamSide,
        slot: Slot,
        player_out: PlayerKey,
        player_in: PlayerKey,
    },
    Timeout { team: TeamSide },
    PeriodClosed,
    MatchClosed,
}

/// State of the match right after one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Index of the event in `Match::events()`.
    pub index: usize,
    pub event_id: String,
    pub period: u8,
    pub at: WallTime,
    pub transition: Transition,
    pub state: RotationState,
    /// Score of the period after the event.
    pub score: Score,
}

/// Full forward replay: the initial state plus one checkpoint per event.
/// Never modified once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Replay {
    pub(crate) initial: RotationState,
    pub(crate) checkpoints: Vec<Checkpoint>,
    pub(crate) first_serve_index: Option<usize>,
}

impl Replay {
    pub fn initial(&self) -> &RotationState {
        &self.initial
    }

    pub fn checkpoints(&self) -> &[Checkpoint] {
        &self.checkpoints
    }

    pub fn len(&self) -> usize {
        self.checkpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checkpoints.is_empty()
    }

    /// Checkpoint index of the match's first serve declaration.
    pub fn first_serve_index(&self) -> Option<usize> {
        self.first_serve_index
    }

    /// State in effect when event `index` happened.
    pub fn state_before(&self, index: usize) -> &RotationState {
        match index.checked_sub(1).and_then(|i| self.checkpoints.get(i)) {
            Some(cp) => &cp.state,
            None => &self.initial,
        }
    }

    pub fn final_state(&self) -> &RotationState {
        self.checkpoints.last().map_or(&self.initial, |cp| &cp.state)
    }

    /// `(state before, checkpoint)` for every event in log order.
    pub fn steps(&self) -> impl Iterator<Item = (&RotationState, &Checkpoint)> + '_ {
        let befores = std::iter::once(&self.initial).chain(self.checkpoints.iter().map(|cp| &cp.state));
        befores.zip(self.checkpoints.iter())
    }

    /// SHA-256 (hex) of the serialized checkpoint sequence.
    pub fn fingerprint(&self) -> Result<String> {
        let bytes = serde_json::to_vec(&self.checkpoints)?;
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        Ok(format!("{:x}", hasher.finalize()))
    }
}
