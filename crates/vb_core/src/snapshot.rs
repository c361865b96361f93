//! Point-in-time court snapshots for visualization.
//!
//! A snapshot is a pure read of a checkpoint: both teams' six positions in
//! display order plus the serving side and player.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::PeriodCarryOver;
use crate::error::{EngineError, Result};
use crate::models::{Match, PlayerId, Score, Slot, TeamSide, WallTime};
use crate::rotation::{self, Checkpoint, Replay, RotationState};

/// Batches at or below this size are answered sequentially.
const PARALLEL_THRESHOLD: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourtPosition {
    pub slot: Slot,
    pub player_id: PlayerId,
    pub name: String,
    pub shirt: String,
    pub captain: bool,
    pub is_server: bool,
    pub front_row: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamCourt {
    pub side: TeamSide,
    pub team_id: String,
    pub team_name: String,
    pub serving: bool,
    /// Front row 4-3-2 followed by back row 5-6-1.
    pub positions: Vec<CourtPosition>,
}

impl TeamCourt {
    pub fn at(&self, slot: Slot) -> Option<&CourtPosition> {
        self.positions.iter().find(|p| p.slot == slot)
    }

    pub fn front_row(&self) -> &[CourtPosition] {
        &self.positions[..3]
    }

    pub fn back_row(&self) -> &[CourtPosition] {
        &self.positions[3..]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourtSnapshot {
    pub at: WallTime,
    pub event_id: String,
    pub period: u8,
    pub score: Score,
    pub serving: Option<TeamSide>,
    pub server: Option<PlayerId>,
    pub teams: [TeamCourt; 2],
}

impl CourtSnapshot {
    pub fn from_checkpoint(m: &Match, cp: &Checkpoint) -> Self {
        let state = &cp.state;
        Self {
            at: cp.at,
            event_id: cp.event_id.clone(),
            period: cp.period,
            score: cp.score,
            serving: state.serving,
            server: state.server().map(|key| m.player(key).id.clone()),
            teams: [team_court(m, state, TeamSide::A), team_court(m, state, TeamSide::B)],
        }
    }

    pub fn team(&self, side: TeamSide) -> &TeamCourt {
        &self.teams[side.index()]
    }

    pub fn player_at(&self, side: TeamSide, slot: Slot) -> Option<&PlayerId> {
        self.team(side).at(slot).map(|p| &p.player_id)
    }

    /// Every position on court, both teams.
    pub fn positions(&self) -> impl Iterator<Item = &CourtPosition> {
        self.teams.iter().flat_map(|t| t.positions.iter())
    }
}

fn team_court(m: &Match, state: &RotationState, side: TeamSide) -> TeamCourt {
    let team = m.team(side);
    let formation = state.formation(side);
    let serving = state.is_serving(side);
    let positions = Slot::DISPLAY_ROWS
        .iter()
        .flatten()
        .map(|&slot| {
            let player = m.player(formation.at(slot));
            CourtPosition {
                slot,
                player_id: player.id.clone(),
                name: player.name.clone(),
                shirt: player.shirt.clone(),
                captain: player.captain,
                is_server: serving && slot == Slot::SERVER,
                front_row: slot.is_front_row(),
            }
        })
        .collect();

    TeamCourt {
        side,
        team_id: team.id.clone(),
        team_name: team.name.clone(),
        serving,
        positions,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotQuery {
    /// Latest event at or before this wall time.
    At(WallTime),
    Event(String),
}

/// Snapshot on a fresh replay with default policies.
pub fn snapshot(m: &Match, query: &SnapshotQuery) -> Result<CourtSnapshot> {
    Timeline::new(m, PeriodCarryOver::default())?.snapshot(query)
}

/// Replay kept around for repeated snapshot queries.
#[derive(Debug, Clone)]
pub struct Timeline<'m> {
    m: &'m Match,
    replay: Replay,
}

impl<'m> Timeline<'m> {
    pub fn new(m: &'m Match, carry_over: PeriodCarryOver) -> Result<Self> {
        Ok(Self { m, replay: rotation::replay(m, carry_over)? })
    }

    /// Reuse a replay built earlier for `m`. Fails when the replay does not
    /// have one checkpoint per event of `m`.
    pub fn from_replay(m: &'m Match, replay: Replay) -> Result<Self> {
        if replay.len() != m.events().len() {
            return Err(EngineError::feed(format!(
                "replay has {} checkpoints but the match has {} events",
                replay.len(),
                m.events().len()
            )));
        }
        Ok(Self { m, replay })
    }

    pub fn replay(&self) -> &Replay {
        &self.replay
    }

    fn first_serve(&self) -> Option<&Checkpoint> {
        self.replay.first_serve_index().map(|i| &self.replay.checkpoints()[i])
    }

    /// Court after the latest event at or before `t`.
    pub fn at(&self, t: WallTime) -> Result<CourtSnapshot> {
        let first = match self.first_serve() {
            Some(first) if first.at <= t => first,
            first => {
                return Err(EngineError::OutOfRangeTimestamp {
                    requested: t,
                    first_serve: first.map(|cp| cp.at),
                })
            }
        };
        let checkpoints = self.replay.checkpoints();
        let upto = checkpoints.partition_point(|cp| cp.at <= t);
        let cp = checkpoints.get(upto.wrapping_sub(1)).unwrap_or(first);
        Ok(CourtSnapshot::from_checkpoint(self.m, cp))
    }

    /// Court right after the event `event_id`.
    pub fn at_event(&self, event_id: &str) -> Result<CourtSnapshot> {
        let index = self
            .m
            .event_index(event_id)
            .ok_or_else(|| EngineError::UnknownEvent { event_id: event_id.to_string() })?;
        let cp = self
            .replay
            .checkpoints()
            .get(index)
            .ok_or_else(|| EngineError::UnknownEvent { event_id: event_id.to_string() })?;
        match self.replay.first_serve_index() {
            Some(first) if first <= index => Ok(CourtSnapshot::from_checkpoint(self.m, cp)),
            first => Err(EngineError::OutOfRangeTimestamp {
                requested: cp.at,
                first_serve: first.map(|i| self.replay.checkpoints()[i].at),
            }),
        }
    }

    pub fn snapshot(&self, query: &SnapshotQuery) -> Result<CourtSnapshot> {
        match query {
            SnapshotQuery::At(t) => self.at(*t),
            SnapshotQuery::Event(id) => self.at_event(id),
        }
    }

    /// One snapshot per requested time, in request order.
    pub fn snapshots(&self, times: &[WallTime]) -> Vec<Result<CourtSnapshot>> {
        if times.len() > PARALLEL_THRESHOLD {
            times.par_iter().map(|t| self.at(*t)).collect()
        } else {
            times.iter().map(|t| self.at(*t)).collect()
        }
    }
}
