//! Rotational performance: point differential per player and slot.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::config::{PeriodCarryOver, SlotAttribution};
use crate::error::Result;
use crate::models::{Match, PlayerId, PlayerKey, Slot, TeamSide};
use crate::rotation::{self, Replay, RotationState, Transition};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PlayerRotationStat {
    pub points_for: u32,
    pub points_against: u32,
}

impl PlayerRotationStat {
    pub fn differential(&self) -> i32 {
        self.points_for as i32 - self.points_against as i32
    }
}

/// One line of the "Rotational Performance (Point Differential)" table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RotationRow {
    pub player_id: PlayerId,
    pub name: String,
    pub shirt: String,
    pub slots: BTreeMap<Slot, PlayerRotationStat>,
}

impl RotationRow {
    pub fn points_for(&self) -> u32 {
        self.slots.values().map(|s| s.points_for).sum()
    }

    pub fn points_against(&self) -> u32 {
        self.slots.values().map(|s| s.points_against).sum()
    }

    pub fn differential(&self) -> i32 {
        self.slots.values().map(PlayerRotationStat::differential).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RotationalPerformance {
    pub attribution: SlotAttribution,
    /// Rows per side, in roster order. Players never credited are absent.
    teams: [Vec<RotationRow>; 2],
}

impl RotationalPerformance {
    /// Default policies on a fresh replay.
    pub fn for_match(m: &Match) -> Result<Self> {
        let replay = rotation::replay(m, PeriodCarryOver::default())?;
        Ok(Self::compute(m, &replay, SlotAttribution::default()))
    }

    /// Credit every point using the state immediately preceding it.
    pub fn compute(m: &Match, replay: &Replay, attribution: SlotAttribution) -> Self {
        let mut acc: BTreeMap<PlayerKey, BTreeMap<Slot, PlayerRotationStat>> = BTreeMap::new();

        for (before, cp) in replay.steps() {
            let scorer = match cp.transition {
                Transition::ServeRetained { team } | Transition::SideOut { team } => team,
                _ => continue,
            };
            for (side, slot, key) in credited(before, attribution) {
                let stat = acc.entry(key).or_default().entry(slot).or_default();
                if side == scorer {
                    stat.points_for += 1;
                } else {
                    stat.points_against += 1;
                }
            }
        }

        let mut teams: [Vec<RotationRow>; 2] = [Vec::new(), Vec::new()];
        for (key, slots) in acc {
            let player = m.player(key);
            teams[player.side.index()].push(RotationRow {
                player_id: player.id.clone(),
                name: player.name.clone(),
                shirt: player.shirt.clone(),
                slots,
            });
        }
        Self { attribution, teams }
    }

    /// `player id → slot → differential` for both teams.
    pub fn differentials(&self) -> BTreeMap<PlayerId, BTreeMap<Slot, i32>> {
        self.teams
            .iter()
            .flatten()
            .map(|row| {
                let per_slot = row.slots.iter().map(|(slot, s)| (*slot, s.differential())).collect();
                (row.player_id.clone(), per_slot)
            })
            .collect()
    }

    pub fn rows(&self, side: TeamSide) -> &[RotationRow] {
        &self.teams[side.index()]
    }

    /// Sum of all differentials of one team.
    pub fn team_total(&self, side: TeamSide) -> i32 {
        self.rows(side).iter().map(RotationRow::differential).sum()
    }

    pub fn get(&self, player_id: &str, slot: Slot) -> Option<PlayerRotationStat> {
        self.teams
            .iter()
            .flatten()
            .find(|row| row.player_id.as_str() == player_id)
            .and_then(|row| row.slots.get(&slot).copied())
    }
}

fn credited(state: &RotationState, attribution: SlotAttribution) -> Vec<(TeamSide, Slot, PlayerKey)> {
    match attribution {
        SlotAttribution::RotationLeaders => TeamSide::BOTH
            .into_iter()
            .map(|side| (side, Slot::SERVER, state.formation(side).server()))
            .collect(),
        SlotAttribution::ServerOnly => state
            .serving
            .map(|side| (side, Slot::SERVER, state.formation(side).server()))
            .into_iter()
            .collect(),
        SlotAttribution::AllSlots => TeamSide::BOTH
            .into_iter()
            .flat_map(|side| state.formation(side).iter().map(move |(slot, key)| (side, slot, key)))
            .collect(),
    }
}
