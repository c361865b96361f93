//! Forward replay of the typed event log.
//!
//! The machine owns the only mutable [`RotationState`]. Every event either
//! produces a [`Transition`] or fails the replay; a failed replay yields no
//! checkpoints at all.

use super::state::{Checkpoint, Replay, RotationState, Transition};
use crate::config::PeriodCarryOver;
use crate::error::{EngineError, Result};
use crate::models::{EventKind, Match, MatchEvent, PlayerKey, Score, Slot, TeamSide};

pub struct RotationMachine<'m> {
    m: &'m Match,
    carry_over: PeriodCarryOver,
    state: RotationState,
    period: u8,
    started: bool,
    declared: bool,
    score: Score,
    reset: [bool; 2],
}

impl<'m> RotationMachine<'m> {
    /// Machine positioned before the first event: starting lineups on court,
    /// period 1, nobody serving.
    pub fn new(m: &'m Match, carry_over: PeriodCarryOver) -> Self {
        Self {
            m,
            carry_over,
            state: RotationState {
                formations: [m.starting_lineup(TeamSide::A), m.starting_lineup(TeamSide::B)],
                serving: None,
            },
            period: 1,
            started: false,
            declared: false,
            score: Score::default(),
            reset: [false; 2],
        }
    }

    pub fn state(&self) -> &RotationState {
        &self.state
    }

    pub fn period(&self) -> u8 {
        self.period
    }

    pub fn score(&self) -> Score {
        self.score
    }

    /// Advance the state by one event.
    pub fn apply(&mut self, event: &MatchEvent) -> Result<Transition> {
        if event.period < self.period {
            return Err(EngineError::event(
                &event.id,
                "period",
                format!("period {} after period {} already started", event.period, self.period),
            ));
        }
        if event.period > self.period {
            self.open_period(event.period);
        }

        let transition = match &event.kind {
            EventKind::PeriodStart => {
                if self.started {
                    return Err(EngineError::event(
                        &event.id,
                        "code",
                        format!("period {} started twice", self.period),
                    ));
                }
                self.started = true;
                Transition::PeriodOpened { period: self.period, reset: self.reset }
            }
            EventKind::ServingTeamDeclared { team } => {
                if self.declared {
                    return Err(EngineError::event(
                        &event.id,
                        "team_id",
                        format!("serving team declared twice in period {}", self.period),
                    ));
                }
                self.declared = true;
                self.state.serving = Some(*team);
                Transition::ServeDeclared { team: *team }
            }
            EventKind::Point { scorer, score, .. } => {
                let Some(serving) = self.state.serving else {
                    let reason = if self.declared {
                        format!("point after period {} ended", self.period)
                    } else {
                        format!("point before the serving team of period {} was declared", self.period)
                    };
                    return Err(EngineError::event(&event.id, "code", reason));
                };
                self.score = *score;
                if serving == *scorer {
                    Transition::ServeRetained { team: *scorer }
                } else {
                    let rotated = self.state.formation(*scorer).rotated();
                    self.state.formations[scorer.index()] = rotated;
                    self.state.serving = Some(*scorer);
                    Transition::SideOut { team: *scorer }
                }
            }
            EventKind::Substitution { team, player_out, player_in } => {
                let slot = self.substitution_slot(event, *team, *player_out, *player_in)?;
                self.state.formations[team.index()].replace(slot, *player_in);
                Transition::Substituted {
                    team: *team,
                    slot,
                    player_out: *player_out,
                    player_in: *player_in,
                }
            }
            EventKind::Timeout { team } => Transition::Timeout { team: *team },
            EventKind::PeriodEnd => {
                self.state.serving = None;
                Transition::PeriodClosed
            }
            EventKind::MatchEnd => {
                self.state.serving = None;
                Transition::MatchClosed
            }
        };

        Ok(transition)
    }

    fn open_period(&mut self, period: u8) {
        self.period = period;
        self.started = false;
        self.declared = false;
        self.score = Score::default();
        self.state.serving = None;
        self.reset = [false; 2];

        if self.carry_over == PeriodCarryOver::ResetToDesignated {
            for side in TeamSide::BOTH {
                if let Some(formation) = self.m.designated_lineup(period, side) {
                    self.state.formations[side.index()] = formation;
                    self.reset[side.index()] = true;
                }
            }
        }
        log::debug!("Period {} opened (designated lineup applied: {:?})", period, self.reset);
    }

    fn substitution_slot(
        &self,
        event: &MatchEvent,
        team: TeamSide,
        player_out: PlayerKey,
        player_in: PlayerKey,
    ) -> Result<Slot> {
        let formation = self.state.formation(team);
        let slot = formation.slot_of(player_out).ok_or_else(|| {
            EngineError::event(
                &event.id,
                "player_2_id",
                format!("player '{}' is not on court", self.m.player(player_out).id),
            )
        })?;
        if formation.contains(player_in) {
            return Err(EngineError::event(
                &event.id,
                "player_id",
                format!("player '{}' is already on court", self.m.player(player_in).id),
            ));
        }
        Ok(slot)
    }
}

/// Replay the whole match. Either every event applies cleanly or the error of
/// the first failing event is returned.
pub fn replay(m: &Match, carry_over: PeriodCarryOver) -> Result<Replay> {
    let mut machine = RotationMachine::new(m, carry_over);
    let initial = *machine.state();
    let mut checkpoints = Vec::with_capacity(m.events().len());
    let mut first_serve_index = None;

    for (index, event) in m.events().iter().enumerate() {
        let transition = machine.apply(event)?;
        if first_serve_index.is_none() && matches!(transition, Transition::ServeDeclared { .. }) {
            first_serve_index = Some(index);
        }
        checkpoints.push(Checkpoint {
            index,
            event_id: event.id.clone(),
            period: machine.period(),
            at: event.at,
            transition,
            state: *machine.state(),
            score: machine.score(),
        });
    }

    log::debug!(
        "Replayed {} events ({} side-outs)",
        checkpoints.len(),
        checkpoints
            .iter()
            .filter(|cp| matches!(cp.transition, Transition::SideOut { .. }))
            .count()
    );
    Ok(Replay { initial, checkpoints, first_serve_index })
}
