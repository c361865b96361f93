//! Validated, immutable match built once from the raw feed.
//!
//! All string decoding happens here: ids, the `{"1": slot}` position maps,
//! "A-B" scores and wall times. Downstream code only sees typed values.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use super::events::{EventKind, MatchEvent, Score};
use super::lineup::Formation;
use super::player::{Player, PlayerId, PlayerKey, Slot};
use super::team::{Team, TeamSide};
use super::time::WallTime;
use crate::error::{EngineError, Result};
use crate::feed::{EventCode, FlexString, RawEvent, RawLineupEntry, RawMatch};

/// Scorer id the feed uses for "no credited player".
const NO_SCORER_ID: &str = "1";

#[derive(Debug, Clone, Serialize)]
pub struct Match {
    match_id: Option<String>,
    date: Option<String>,
    teams: [Team; 2],
    players: Vec<Player>,
    starting: [Formation; 2],
    #[serde(skip)]
    index: HashMap<PlayerId, PlayerKey>,
    /// Period → designated formation per side.
    lineups: BTreeMap<u8, [Option<Formation>; 2]>,
    events: Vec<MatchEvent>,
}

impl Match {
    /// Parse and validate a feed document.
    pub fn from_json(json: &str) -> Result<Self> {
        Self::load(&RawMatch::from_json(json)?)
    }

    /// Validate a raw feed and build the typed match. Fails on the first
    /// violated invariant; nothing is repaired.
    pub fn load(raw: &RawMatch) -> Result<Self> {
        let teams = load_teams(raw)?;
        let (players, index) = load_players(raw, &teams)?;
        let lineups = load_lineups(&players, &teams)?;
        let starting = match lineups.get(&1) {
            Some([Some(a), Some(b)]) => [*a, *b],
            _ => return Err(EngineError::feed("starting lineups are missing")),
        };

        let mut m = Match {
            match_id: raw.match_id.as_ref().and_then(|id| id.non_empty()).map(str::to_string),
            date: raw.date.clone(),
            teams,
            players,
            starting,
            index,
            lineups,
            events: Vec::new(),
        };
        m.events = m.load_events(raw)?;

        log::info!(
            "Loaded match {} ({} vs {}): {} players, {} events",
            m.match_id.as_deref().unwrap_or("-"),
            m.teams[0].name,
            m.teams[1].name,
            m.players.len(),
            m.events.len()
        );
        Ok(m)
    }

    pub fn match_id(&self) -> Option<&str> {
        self.match_id.as_deref()
    }

    pub fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }

    pub fn team(&self, side: TeamSide) -> &Team {
        &self.teams[side.index()]
    }

    pub fn teams(&self) -> &[Team; 2] {
        &self.teams
    }

    pub fn side_of_team_id(&self, team_id: &str) -> Option<TeamSide> {
        TeamSide::BOTH.into_iter().find(|side| self.team(*side).id == team_id)
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, key: PlayerKey) -> &Player {
        &self.players[key.index()]
    }

    pub fn player_key(&self, id: &str) -> Option<PlayerKey> {
        self.index.get(&PlayerId::from(id)).copied()
    }

    /// Period-1 lineup; always complete for a loaded match.
    pub fn starting_lineup(&self, side: TeamSide) -> Formation {
        self.starting[side.index()]
    }

    pub fn designated_lineup(&self, period: u8, side: TeamSide) -> Option<Formation> {
        self.lineups.get(&period).and_then(|l| l[side.index()])
    }

    /// Chronologically ordered event log.
    pub fn events(&self) -> &[MatchEvent] {
        &self.events
    }

    pub fn event_index(&self, event_id: &str) -> Option<usize> {
        self.events.iter().position(|e| e.id == event_id)
    }

    /// The first serve declaration of the match, i.e. its effective start.
    pub fn first_serve(&self) -> Option<&MatchEvent> {
        self.events
            .iter()
            .find(|e| matches!(e.kind, EventKind::ServingTeamDeclared { .. }))
    }

    // ========================================================================
    // Event decoding
    // ========================================================================

    fn load_events(&self, raw: &RawMatch) -> Result<Vec<MatchEvent>> {
        let use_sub_list = !raw.substitution_events.is_empty();
        let mut drafts = Vec::with_capacity(raw.events.len() + raw.substitution_events.len());

        let main = raw.events.iter().map(|e| (e, false));
        let subs = raw.substitution_events.iter().map(|e| (e, true));
        for (seq, (event, from_sub_list)) in main.chain(subs).enumerate() {
            let code = if from_sub_list {
                Some(EventCode::Substitution)
            } else {
                event.code.as_deref().and_then(EventCode::from_feed)
            };
            let Some(code) = code else {
                log::debug!(
                    "Skipping event {} with uninterpreted code {:?}",
                    event_label(event, seq),
                    event.code
                );
                continue;
            };
            if code == EventCode::Substitution && !from_sub_list && use_sub_list {
                // Dedicated substitution log takes precedence.
                continue;
            }
            drafts.push(self.decode_event(event, seq, code)?);
        }

        drafts.sort_by_key(|d| (d.period, d.at, d.body.rank(), d.seq));
        check_chronology(&drafts)?;
        resolve_points(drafts)
    }

    fn decode_event(&self, raw: &RawEvent, seq: usize, code: EventCode) -> Result<DraftEvent> {
        let id = event_label(raw, seq);

        let period = raw
            .period
            .as_ref()
            .and_then(|p| p.non_empty())
            .ok_or_else(|| EngineError::event(&id, "period", "missing period"))?;
        let period = match period.parse::<u8>() {
            Ok(p) if p >= 1 => p,
            _ => {
                return Err(EngineError::event(&id, "period", format!("invalid period '{}'", period)))
            }
        };

        let wall_time = raw
            .wall_time
            .as_deref()
            .ok_or_else(|| EngineError::event(&id, "wall_time", "missing wall_time"))?;
        let at = WallTime::parse(wall_time).ok_or_else(|| {
            EngineError::event(&id, "wall_time", format!("cannot parse wall time '{}'", wall_time))
        })?;

        let body = match code {
            EventCode::PeriodStart => DraftBody::Ready(EventKind::PeriodStart),
            EventCode::PeriodEnd => DraftBody::Ready(EventKind::PeriodEnd),
            EventCode::MatchEnd => DraftBody::Ready(EventKind::MatchEnd),
            EventCode::ServingTeam => DraftBody::Ready(EventKind::ServingTeamDeclared {
                team: self.required_team(raw, &id)?,
            }),
            EventCode::Timeout => DraftBody::Ready(EventKind::Timeout {
                team: self.required_team(raw, &id)?,
            }),
            EventCode::Substitution => {
                let team = self.required_team(raw, &id)?;
                let player_in = self.team_player(raw.player_id.as_ref(), team, &id, "player_id")?;
                let player_out = self.team_player(raw.player_2_id.as_ref(), team, &id, "player_2_id")?;
                if player_in == player_out {
                    return Err(EngineError::event(&id, "player_id", "player substituted for themselves"));
                }
                DraftBody::Ready(EventKind::Substitution { team, player_out, player_in })
            }
            EventCode::Point => {
                let team = match raw.team_id.as_ref().and_then(|t| t.non_empty()) {
                    Some(t) => Some(self.side_of_team_id(t).ok_or_else(|| {
                        EngineError::event(&id, "team_id", format!("unknown team '{}'", t))
                    })?),
                    None => None,
                };
                let score = match raw.description.as_deref().map(str::trim) {
                    Some(desc) if !desc.is_empty() => Some(Score::parse(desc).ok_or_else(|| {
                        EngineError::event(&id, "description", format!("cannot parse score from '{}'", desc))
                    })?),
                    _ => None,
                };
                let scorer_player = match raw.player_id.as_ref().and_then(|p| p.non_empty()) {
                    None | Some(NO_SCORER_ID) => None,
                    Some(pid) => Some(self.player_key(pid).ok_or_else(|| {
                        EngineError::event(&id, "player_id", format!("unknown player '{}'", pid))
                    })?),
                };
                DraftBody::Point { team, score, scorer_player }
            }
        };

        Ok(DraftEvent { id, period, at, seq, body })
    }

    fn required_team(&self, raw: &RawEvent, id: &str) -> Result<TeamSide> {
        let team_id = raw
            .team_id
            .as_ref()
            .and_then(|t| t.non_empty())
            .ok_or_else(|| EngineError::event(id, "team_id", "missing team_id"))?;
        self.side_of_team_id(team_id)
            .ok_or_else(|| EngineError::event(id, "team_id", format!("unknown team '{}'", team_id)))
    }

    fn team_player(
        &self,
        raw_id: Option<&FlexString>,
        team: TeamSide,
        id: &str,
        field: &'static str,
    ) -> Result<PlayerKey> {
        let pid = raw_id
            .and_then(|p| p.non_empty())
            .ok_or_else(|| EngineError::event(id, field, "missing player id"))?;
        let key = self
            .player_key(pid)
            .ok_or_else(|| EngineError::event(id, field, format!("unknown player '{}'", pid)))?;
        if self.player(key).side != team {
            return Err(EngineError::event(
                id,
                field,
                format!("player '{}' does not play for {}", pid, self.team(team).name),
            ));
        }
        Ok(key)
    }
}

// ============================================================================
// Loading helpers
// ============================================================================

fn load_teams(raw: &RawMatch) -> Result<[Team; 2]> {
    let id_of = |id: &Option<FlexString>, label: &str| -> Result<String> {
        id.as_ref()
            .and_then(|id| id.non_empty())
            .map(str::to_string)
            .ok_or_else(|| EngineError::feed(format!("team {} id is missing", label)))
    };
    let a = id_of(&raw.team_a_id, "A")?;
    let b = id_of(&raw.team_b_id, "B")?;
    if a == b {
        return Err(EngineError::feed(format!("both teams share the id '{}'", a)));
    }
    Ok([
        Team { name: raw.team_a_name.clone().unwrap_or_else(|| a.clone()), id: a, side: TeamSide::A },
        Team { name: raw.team_b_name.clone().unwrap_or_else(|| b.clone()), id: b, side: TeamSide::B },
    ])
}

fn load_players(raw: &RawMatch, teams: &[Team; 2]) -> Result<(Vec<Player>, HashMap<PlayerId, PlayerKey>)> {
    let mut players = Vec::with_capacity(raw.lineups.len());
    let mut index = HashMap::with_capacity(raw.lineups.len());

    for (i, entry) in raw.lineups.iter().enumerate() {
        let id = entry
            .player_id
            .as_ref()
            .and_then(|p| p.non_empty())
            .ok_or_else(|| EngineError::feed(format!("lineup entry {} has no player_id", i)))?;
        let team_id = entry
            .team_id
            .as_ref()
            .and_then(|t| t.non_empty())
            .ok_or_else(|| EngineError::feed(format!("player '{}' has no team_id", id)))?;
        let side = teams
            .iter()
            .find(|t| t.id == team_id)
            .map(|t| t.side)
            .ok_or_else(|| {
                EngineError::feed(format!("player '{}' belongs to unknown team '{}'", id, team_id))
            })?;

        let key = PlayerKey(u16::try_from(i).map_err(|_| EngineError::feed("lineup is too large"))?);
        let player_id = PlayerId::from(id);
        if index.insert(player_id.clone(), key).is_some() {
            return Err(EngineError::feed(format!("player id '{}' appears twice in the lineup", id)));
        }

        players.push(Player {
            key,
            id: player_id,
            side,
            name: entry.player_name.clone().unwrap_or_default(),
            shirt: entry.shirt_number.as_ref().map(|s| s.0.clone()).unwrap_or_default(),
            captain: entry
                .captain
                .as_ref()
                .and_then(|c| c.non_empty())
                .is_some_and(|c| c.eq_ignore_ascii_case("C")),
            designated: designated_slots(entry, id)?,
        });
    }

    Ok((players, index))
}

fn designated_slots(entry: &RawLineupEntry, player_id: &str) -> Result<BTreeMap<u8, Slot>> {
    let mut designated = BTreeMap::new();
    for (period_key, value) in &entry.playing_position {
        let period = match period_key.trim().parse::<u8>() {
            Ok(p) if p >= 1 => p,
            _ => {
                return Err(EngineError::feed(format!(
                    "player '{}' has invalid position period key '{}'",
                    player_id, period_key
                )))
            }
        };
        let Some(value) = value.as_ref().and_then(|v| v.non_empty()) else {
            continue;
        };
        let n: u8 = value.parse().map_err(|_| {
            EngineError::feed(format!(
                "player '{}' has non-numeric position '{}' for period {}",
                player_id, value, period
            ))
        })?;
        match Slot::new(n) {
            Some(slot) => {
                designated.insert(period, slot);
            }
            None => log::debug!(
                "Player {} position {} for period {} is outside the rotation",
                player_id,
                n,
                period
            ),
        }
    }
    Ok(designated)
}

fn load_lineups(players: &[Player], teams: &[Team; 2]) -> Result<BTreeMap<u8, [Option<Formation>; 2]>> {
    // period -> side -> slot -> occupant
    let mut raw_slots: BTreeMap<u8, [[Option<PlayerKey>; 6]; 2]> = BTreeMap::new();
    raw_slots.entry(1).or_insert([[None; 6]; 2]);

    for player in players {
        for (&period, &slot) in &player.designated {
            let team_slots = &mut raw_slots.entry(period).or_insert([[None; 6]; 2])[player.side.index()];
            if let Some(existing) = team_slots[slot.index()] {
                return Err(EngineError::feed(format!(
                    "team {} has two players in slot {} for period {} ('{}' and '{}')",
                    teams[player.side.index()].name,
                    slot,
                    period,
                    players[existing.index()].id,
                    player.id
                )));
            }
            team_slots[slot.index()] = Some(player.key);
        }
    }

    let mut lineups = BTreeMap::new();
    for (period, sides) in raw_slots {
        let mut formations = [None, None];
        for side in TeamSide::BOTH {
            let slots = sides[side.index()];
            let filled = slots.iter().filter(|s| s.is_some()).count();
            if filled == 0 && period > 1 {
                continue;
            }
            if filled < 6 {
                let missing = Slot::ALL
                    .into_iter()
                    .find(|s| slots[s.index()].is_none())
                    .map_or(0, |s| s.get());
                let what = if period == 1 { "starting lineup" } else { "designated lineup" };
                return Err(EngineError::feed(format!(
                    "team {} {} for period {} has {} players; slot {} is empty",
                    teams[side.index()].name,
                    what,
                    period,
                    filled,
                    missing
                )));
            }
            let mut keys = [PlayerKey(0); 6];
            for (i, slot) in slots.iter().enumerate() {
                if let Some(key) = slot {
                    keys[i] = *key;
                }
            }
            formations[side.index()] = Some(Formation::new(keys));
        }
        lineups.insert(period, formations);
    }
    Ok(lineups)
}

fn event_label(raw: &RawEvent, seq: usize) -> String {
    raw.event_id
        .as_ref()
        .and_then(|id| id.non_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("#{}", seq))
}

// ============================================================================
// Drafts: decoded events whose point scorer is not yet resolved
// ============================================================================

struct DraftEvent {
    id: String,
    period: u8,
    at: WallTime,
    seq: usize,
    body: DraftBody,
}

enum DraftBody {
    Ready(EventKind),
    Point {
        team: Option<TeamSide>,
        score: Option<Score>,
        scorer_player: Option<PlayerKey>,
    },
}

impl DraftBody {
    fn rank(&self) -> u8 {
        match self {
            DraftBody::Ready(kind) => kind.same_instant_rank(),
            DraftBody::Point { .. } => 3,
        }
    }
}

fn check_chronology(drafts: &[DraftEvent]) -> Result<()> {
    for pair in drafts.windows(2) {
        if pair[1].at < pair[0].at {
            return Err(EngineError::feed(format!(
                "event {} (period {}, {}) is earlier than event {} (period {}, {})",
                pair[1].id, pair[1].period, pair[1].at, pair[0].id, pair[0].period, pair[0].at
            )));
        }
    }
    Ok(())
}

/// Derive each point's scoring team from the score progression of its period.
fn resolve_points(drafts: Vec<DraftEvent>) -> Result<Vec<MatchEvent>> {
    let mut events = Vec::with_capacity(drafts.len());
    let mut period = 0u8;
    let mut previous = Score::default();

    for draft in drafts {
        if draft.period != period {
            period = draft.period;
            previous = Score::default();
        }
        let kind = match draft.body {
            DraftBody::Ready(kind) => kind,
            DraftBody::Point { team, score, scorer_player } => {
                let (scorer, score) = match (score, team) {
                    (Some(score), team) => {
                        let scorer = score.advanced_from(previous).ok_or_else(|| {
                            EngineError::event(
                                &draft.id,
                                "description",
                                format!("score {} does not follow {}", score, previous),
                            )
                        })?;
                        if let Some(team) = team {
                            if team != scorer {
                                return Err(EngineError::event(
                                    &draft.id,
                                    "team_id",
                                    format!("team {} disagrees with score {} after {}", team.symbol(), score, previous),
                                ));
                            }
                        }
                        (scorer, score)
                    }
                    (None, Some(team)) => (team, previous.with_point(team)),
                    (None, None) => {
                        return Err(EngineError::event(
                            &draft.id,
                            "description",
                            "point has neither a score nor a team",
                        ))
                    }
                };
                previous = score;
                EventKind::Point { scorer, score, scorer_player }
            }
        };
        events.push(MatchEvent { id: draft.id, period: draft.period, at: draft.at, seq: draft.seq, kind });
    }
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::test_fixtures::{alpha_bravo_feed, lineup_entry, point, raw_event};
    use serde_json::json;

    #[test]
    fn test_load_alpha_bravo() {
        let m = Match::load(&alpha_bravo_feed()).unwrap();
        assert_eq!(m.team(TeamSide::A).name, "Team Alpha");
        assert_eq!(m.side_of_team_id("B"), Some(TeamSide::B));
        assert_eq!(m.players().len(), 14);

        let start = m.starting_lineup(TeamSide::A);
        assert_eq!(m.player(start.server()).id.as_str(), "A1");
        assert_eq!(m.player(start.at(Slot::new(6).unwrap())).id.as_str(), "A6");

        let scorers: Vec<TeamSide> = m
            .events()
            .iter()
            .filter_map(|e| match e.kind {
                EventKind::Point { scorer, .. } => Some(scorer),
                _ => None,
            })
            .collect();
        assert_eq!(scorers, vec![TeamSide::A, TeamSide::A, TeamSide::B, TeamSide::B, TeamSide::A]);
        assert_eq!(m.first_serve().unwrap().id, "e2");
    }

    #[test]
    fn test_missing_sixth_starter_is_malformed_feed() {
        let mut feed = alpha_bravo_feed();
        feed.lineups.retain(|p| p.player_id.as_ref().map(|id| id.as_str()) != Some("B6"));

        let err = Match::load(&feed).unwrap_err();
        match err {
            EngineError::MalformedFeed { reason } => {
                assert!(reason.contains("Team Bravo"), "{reason}");
                assert!(reason.contains("slot 6"), "{reason}");
            }
            other => panic!("expected MalformedFeed, got {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_slot_is_malformed_feed() {
        let mut feed = alpha_bravo_feed();
        feed.lineups.push(lineup_entry("A8", "A", "Extra", "8", json!({ "1": 3 })));
        assert!(matches!(Match::load(&feed), Err(EngineError::MalformedFeed { .. })));
    }

    #[test]
    fn test_missing_team_is_malformed_feed() {
        let mut feed = alpha_bravo_feed();
        feed.team_b_id = None;
        let err = Match::load(&feed).unwrap_err();
        assert_eq!(err, EngineError::feed("team B id is missing"));
    }

    #[test]
    fn test_duplicate_player_id_is_malformed_feed() {
        let mut feed = alpha_bravo_feed();
        feed.lineups.push(lineup_entry("A1", "A", "Clone", "99", json!({})));
        assert!(matches!(Match::load(&feed), Err(EngineError::MalformedFeed { .. })));
    }

    #[test]
    fn test_partial_designated_lineup_is_rejected() {
        let mut feed = alpha_bravo_feed();
        feed.lineups[0].playing_position.insert("2".into(), Some("1".into()));
        let err = Match::load(&feed).unwrap_err();
        assert!(err.to_string().contains("designated lineup for period 2"), "{err}");
    }

    #[test]
    fn test_out_of_rotation_position_is_ignored() {
        let mut feed = alpha_bravo_feed();
        feed.lineups.push(lineup_entry("A9", "A", "Libero", "9", json!({ "1": 7 })));
        let m = Match::load(&feed).unwrap();
        let key = m.player_key("A9").unwrap();
        assert_eq!(m.player(key).starting_slot(), None);
    }

    #[test]
    fn test_unknown_team_on_event_is_malformed_event() {
        let mut feed = alpha_bravo_feed();
        feed.events.push(raw_event("t1", "aikalisa", "1", Some("Z"), None, "10:02:00"));
        let err = Match::load(&feed).unwrap_err();
        assert_eq!(err.event_id(), Some("t1"));
        assert!(matches!(err, EngineError::MalformedEvent { field: "team_id", .. }));
    }

    #[test]
    fn test_unparseable_score_is_malformed_event() {
        let mut feed = alpha_bravo_feed();
        feed.events.push(point("p9", "1", "x-y", None, "10:05:00"));
        let err = Match::load(&feed).unwrap_err();
        assert!(matches!(err, EngineError::MalformedEvent { field: "description", .. }), "{err}");
    }

    #[test]
    fn test_skipped_score_is_malformed_event() {
        let mut feed = alpha_bravo_feed();
        feed.events.push(point("p9", "1", "5-2", None, "10:05:00"));
        let err = Match::load(&feed).unwrap_err();
        assert_eq!(err.event_id(), Some("p9"));
        assert!(err.to_string().contains("does not follow 3-2"), "{err}");
    }

    #[test]
    fn test_team_conflicting_with_score_is_malformed_event() {
        let mut feed = alpha_bravo_feed();
        feed.events.push(point("p9", "1", "3-3", Some("A"), "10:05:00"));
        let err = Match::load(&feed).unwrap_err();
        assert!(matches!(err, EngineError::MalformedEvent { field: "team_id", .. }));
    }

    #[test]
    fn test_point_without_description_uses_team() {
        let mut feed = alpha_bravo_feed();
        let mut ev = point("p9", "1", "", Some("B"), "10:05:00");
        ev.description = None;
        feed.events.push(ev);
        let m = Match::load(&feed).unwrap();
        let last = m.events().last().unwrap();
        assert_eq!(
            last.kind,
            EventKind::Point { scorer: TeamSide::B, score: Score::new(3, 3), scorer_player: None }
        );
    }

    #[test]
    fn test_unknown_scorer_is_malformed_event() {
        let mut feed = alpha_bravo_feed();
        let mut ev = point("p9", "1", "3-3", None, "10:05:00");
        ev.player_id = Some("ghost".into());
        feed.events.push(ev);
        assert!(matches!(
            Match::load(&feed),
            Err(EngineError::MalformedEvent { field: "player_id", .. })
        ));
    }

    #[test]
    fn test_scorer_sentinel_means_no_player() {
        let mut feed = alpha_bravo_feed();
        let mut ev = point("p9", "1", "3-3", None, "10:05:00");
        ev.player_id = Some("1".into());
        feed.events.push(ev);
        let m = Match::load(&feed).unwrap();
        assert!(matches!(m.events().last().unwrap().kind, EventKind::Point { scorer_player: None, .. }));
    }

    #[test]
    fn test_events_are_sorted_by_time() {
        let mut feed = alpha_bravo_feed();
        feed.events.reverse();
        let m = Match::load(&feed).unwrap();
        let ids: Vec<&str> = m.events().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["e1", "e2", "p1", "p2", "p3", "p4", "p5"]);
    }

    #[test]
    fn test_non_chronological_periods_rejected() {
        let mut feed = alpha_bravo_feed();
        feed.events.push(raw_event("e9", "aloitajakso", "2", None, None, "09:00:00"));
        assert!(matches!(Match::load(&feed), Err(EngineError::MalformedFeed { .. })));
    }

    #[test]
    fn test_substitution_list_takes_precedence_over_inline_codes() {
        let mut feed = alpha_bravo_feed();
        // Inline code referencing an unknown player would fail if it were used.
        feed.events.push(raw_event("v1", "vaihto", "1", Some("A"), Some(("ghost", "A2")), "10:00:15"));
        feed.substitution_events.push(raw_event("s1", "", "1", Some("A"), Some(("A7", "A2")), "10:00:15"));

        let m = Match::load(&feed).unwrap();
        let subs: Vec<&str> = m
            .events()
            .iter()
            .filter(|e| matches!(e.kind, EventKind::Substitution { .. }))
            .map(|e| e.id.as_str())
            .collect();
        assert_eq!(subs, vec!["s1"]);
    }

    #[test]
    fn test_unknown_codes_are_skipped() {
        let mut feed = alpha_bravo_feed();
        feed.events.push(raw_event("x1", "hyokkays", "1", None, None, "bogus"));
        let m = Match::load(&feed).unwrap();
        assert!(m.event_index("x1").is_none());
    }

    #[test]
    fn test_bad_wall_time_is_malformed_event() {
        let mut feed = alpha_bravo_feed();
        feed.events.push(raw_event("t1", "aikalisa", "1", Some("A"), None, "10:61:00"));
        assert!(matches!(
            Match::load(&feed),
            Err(EngineError::MalformedEvent { field: "wall_time", .. })
        ));
    }
}
