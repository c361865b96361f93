//! Serving streaks: runs of points won by one server without a side-out.

use serde::Serialize;

use crate::config::{PeriodCarryOver, StreakConfig};
use crate::error::Result;
use crate::models::{format_mmss, Match, PlayerId, PlayerKey, Score, TeamSide, WallTime};
use crate::rotation::{self, Checkpoint, Replay, Transition};
use crate::snapshot::CourtSnapshot;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServingStreak {
    pub player_id: PlayerId,
    pub name: String,
    pub shirt: String,
    pub side: TeamSide,
    pub period: u8,
    pub length: u16,
    pub start_time: WallTime,
    pub end_time: WallTime,
    /// `MM:SS` from the first to the last point.
    pub duration: String,
    pub start_event_id: String,
    pub end_event_id: String,
    /// Score after the last point of the streak.
    pub end_score: Score,
    /// Court as the first point of the streak was served.
    pub snapshot: CourtSnapshot,
}

impl ServingStreak {
    pub fn duration_seconds(&self) -> u32 {
        self.end_time.since(self.start_time)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct ServingStreaks {
    streaks: Vec<ServingStreak>,
}

/// Streak being built while scanning the checkpoints.
struct OpenStreak<'r> {
    server: PlayerKey,
    side: TeamSide,
    length: u16,
    start: &'r Checkpoint,
    end: &'r Checkpoint,
    court: &'r Checkpoint,
}

impl ServingStreaks {
    /// Default policies on a fresh replay.
    pub fn for_match(m: &Match) -> Result<Self> {
        let replay = rotation::replay(m, PeriodCarryOver::default())?;
        Ok(Self::compute(m, &replay, &StreakConfig::default()))
    }

    pub fn compute(m: &Match, replay: &Replay, config: &StreakConfig) -> Self {
        let checkpoints = replay.checkpoints();
        let mut streaks = Vec::new();
        let mut open: Option<OpenStreak<'_>> = None;

        let min_length = config.min_length.max(1);
        let close = |open: &mut Option<OpenStreak<'_>>, streaks: &mut Vec<ServingStreak>| {
            if let Some(s) = open.take().filter(|s| s.length >= min_length) {
                streaks.push(finish(m, s));
            }
        };

        for (before, cp) in replay.steps() {
            match cp.transition {
                Transition::ServeRetained { team } => {
                    let server = before.formation(team).server();
                    let extends = open.as_ref().is_some_and(|s| s.server == server && s.side == team);
                    if extends {
                        if let Some(s) = open.as_mut() {
                            s.length += 1;
                            s.end = cp;
                        }
                    } else {
                        close(&mut open, &mut streaks);
                        // Court as served: the checkpoint preceding this point.
                        let court = cp.index.checked_sub(1).map_or(cp, |i| &checkpoints[i]);
                        open = Some(OpenStreak { server, side: team, length: 1, start: cp, end: cp, court });
                    }
                }
                Transition::SideOut { team } => {
                    close(&mut open, &mut streaks);
                    if config.count_side_out_point {
                        let server = cp.state.formation(team).server();
                        open = Some(OpenStreak { server, side: team, length: 1, start: cp, end: cp, court: cp });
                    }
                }
                Transition::Substituted { .. } => {
                    let still_serving = open
                        .as_ref()
                        .is_some_and(|s| cp.state.serving == Some(s.side) && cp.state.server() == Some(s.server));
                    if !still_serving {
                        close(&mut open, &mut streaks);
                    }
                }
                Transition::Timeout { .. } => {}
                Transition::PeriodOpened { .. }
                | Transition::ServeDeclared { .. }
                | Transition::PeriodClosed
                | Transition::MatchClosed => close(&mut open, &mut streaks),
            }
        }
        close(&mut open, &mut streaks);

        log::debug!("Detected {} serving streaks", streaks.len());
        Self { streaks }
    }

    pub fn as_slice(&self) -> &[ServingStreak] {
        &self.streaks
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ServingStreak> {
        self.streaks.iter()
    }

    pub fn len(&self) -> usize {
        self.streaks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.streaks.is_empty()
    }

    /// Longest streak; the earliest one wins ties.
    pub fn longest(&self) -> Option<&ServingStreak> {
        self.streaks.iter().fold(None, |best, s| match best {
            Some(b) if b.length >= s.length => Some(b),
            _ => Some(s),
        })
    }

    /// Streaks sorted by length, longest first; ties keep match order.
    pub fn by_length_desc(&self) -> Vec<&ServingStreak> {
        let mut sorted: Vec<&ServingStreak> = self.streaks.iter().collect();
        sorted.sort_by(|a, b| b.length.cmp(&a.length));
        sorted
    }
}

fn finish(m: &Match, s: OpenStreak<'_>) -> ServingStreak {
    let player = m.player(s.server);
    ServingStreak {
        player_id: player.id.clone(),
        name: player.name.clone(),
        shirt: player.shirt.clone(),
        side: s.side,
        period: s.start.period,
        length: s.length,
        start_time: s.start.at,
        end_time: s.end.at,
        duration: format_mmss(Some(i64::from(s.end.at.since(s.start.at)))),
        start_event_id: s.start.event_id.clone(),
        end_event_id: s.end.event_id.clone(),
        end_score: s.end.score,
        snapshot: CourtSnapshot::from_checkpoint(m, s.court),
    }
}

impl<'a> IntoIterator for &'a ServingStreaks {
    type Item = &'a ServingStreak;
    type IntoIter = std::slice::Iter<'a, ServingStreak>;

    fn into_iter(self) -> Self::IntoIter {
        self.streaks.iter()
    }
}
