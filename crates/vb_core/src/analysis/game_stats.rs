//! Per-match box score: team totals and per-player counters.

use serde::Serialize;
use std::collections::BTreeSet;

use crate::config::PeriodCarryOver;
use crate::error::Result;
use crate::models::{EventKind, Match, PlayerId, PlayerKey, Score, TeamSide};
use crate::rotation::{self, Replay, Transition};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PeriodScore {
    pub period: u8,
    pub score: Score,
    /// Closed by a period-end or match-end event.
    pub finished: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamStats {
    pub side: TeamSide,
    pub team_id: String,
    pub name: String,
    pub points: u32,
    pub timeouts: u32,
    pub substitutions: u32,
    /// Points won without a credited scorer (opponent errors).
    pub implied_opponent_errors: u32,
    /// Points conceded without a credited scorer.
    pub implied_errors_made: u32,
    /// Finished periods only.
    pub periods_won: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerGameStats {
    pub player_id: PlayerId,
    pub name: String,
    pub shirt: String,
    pub side: TeamSide,
    pub captain: bool,
    pub points: u32,
    /// Turns at the service line: the first server of each period, the
    /// server again after every point kept on serve and the new server
    /// after every side-out.
    pub serves: u32,
    /// Periods started on court and never substituted out of.
    pub sets_played_fully: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameStats {
    pub match_id: Option<String>,
    pub date: Option<String>,
    pub teams: [TeamStats; 2],
    pub period_scores: Vec<PeriodScore>,
    /// Roster order.
    pub players: Vec<PlayerGameStats>,
}

impl GameStats {
    pub fn for_match(m: &Match) -> Result<Self> {
        let replay = rotation::replay(m, PeriodCarryOver::default())?;
        Ok(Self::compute(m, &replay))
    }

    pub fn compute(m: &Match, replay: &Replay) -> Self {
        let mut teams = TeamSide::BOTH.map(|side| {
            let team = m.team(side);
            TeamStats {
                side,
                team_id: team.id.clone(),
                name: team.name.clone(),
                points: 0,
                timeouts: 0,
                substitutions: 0,
                implied_opponent_errors: 0,
                implied_errors_made: 0,
                periods_won: 0,
            }
        });
        let mut players: Vec<PlayerGameStats> = m
            .players()
            .iter()
            .map(|p| PlayerGameStats {
                player_id: p.id.clone(),
                name: p.name.clone(),
                shirt: p.shirt.clone(),
                side: p.side,
                captain: p.captain,
                points: 0,
                serves: 0,
                sets_played_fully: 0,
            })
            .collect();
        let mut period_scores: Vec<PeriodScore> = Vec::new();

        // Players on court at the current period's first serve, minus those
        // substituted out since.
        let mut full_period: BTreeSet<PlayerKey> = BTreeSet::new();
        let mut tracking = false;
        let mut current_period = 0u8;

        let settle = |full_period: &mut BTreeSet<PlayerKey>, players: &mut Vec<PlayerGameStats>| {
            for key in std::mem::take(full_period) {
                players[key.index()].sets_played_fully += 1;
            }
        };

        for cp in replay.checkpoints() {
            if cp.period != current_period {
                if tracking {
                    settle(&mut full_period, &mut players);
                    tracking = false;
                }
                current_period = cp.period;
            }

            match cp.transition {
                Transition::ServeDeclared { .. } => {
                    credit_serve(&mut players, cp.state.server());
                    full_period = cp
                        .state
                        .formations
                        .iter()
                        .flat_map(|f| f.iter().map(|(_, key)| key))
                        .collect();
                    tracking = true;
                }
                Transition::ServeRetained { team } | Transition::SideOut { team } => {
                    teams[team.index()].points += 1;
                    credit_serve(&mut players, cp.state.server());
                    match scorer_player(m, cp.index) {
                        Some(key) => players[key.index()].points += 1,
                        None => {
                            teams[team.index()].implied_opponent_errors += 1;
                            teams[team.opponent().index()].implied_errors_made += 1;
                        }
                    }
                    match period_scores.last_mut() {
                        Some(last) if last.period == cp.period => last.score = cp.score,
                        _ => period_scores.push(PeriodScore { period: cp.period, score: cp.score, finished: false }),
                    }
                }
                Transition::Substituted { team, player_out, .. } => {
                    teams[team.index()].substitutions += 1;
                    full_period.remove(&player_out);
                }
                Transition::Timeout { team } => teams[team.index()].timeouts += 1,
                Transition::PeriodClosed | Transition::MatchClosed => {
                    if let Some(last) = period_scores.last_mut().filter(|last| last.period == cp.period) {
                        last.finished = true;
                    }
                }
                Transition::PeriodOpened { .. } => {}
            }
        }
        if tracking {
            settle(&mut full_period, &mut players);
        }

        for ps in period_scores.iter().filter(|ps| ps.finished) {
            if let Some(winner) = ps.score.leader() {
                teams[winner.index()].periods_won += 1;
            }
        }

        Self {
            match_id: m.match_id().map(str::to_string),
            date: m.date().map(str::to_string),
            teams,
            period_scores,
            players,
        }
    }

    pub fn team(&self, side: TeamSide) -> &TeamStats {
        &self.teams[side.index()]
    }

    pub fn player(&self, player_id: &str) -> Option<&PlayerGameStats> {
        self.players.iter().find(|p| p.player_id.as_str() == player_id)
    }
}

fn credit_serve(players: &mut [PlayerGameStats], server: Option<PlayerKey>) {
    if let Some(server) = server {
        players[server.index()].serves += 1;
    }
}

fn scorer_player(m: &Match, index: usize) -> Option<PlayerKey> {
    match m.events()[index].kind {
        EventKind::Point { scorer_player, .. } => scorer_player,
        _ => None,
    }
}
