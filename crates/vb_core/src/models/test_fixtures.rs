//! Feed builders shared by unit tests across the crate.

use serde_json::{json, Value};

use crate::feed::{RawEvent, RawLineupEntry, RawMatch};
use crate::models::TeamSide;

pub fn lineup_entry(id: &str, team: &str, name: &str, shirt: &str, positions: Value) -> RawLineupEntry {
    serde_json::from_value(json!({
        "player_id": id,
        "team_id": team,
        "player_name": name,
        "shirt_number": shirt,
        "playing_position": positions,
    }))
    .unwrap()
}

/// Generic event. `players` is `(incoming, outgoing)` for substitutions.
pub fn raw_event(
    id: &str,
    code: &str,
    period: &str,
    team: Option<&str>,
    players: Option<(&str, &str)>,
    wall_time: &str,
) -> RawEvent {
    RawEvent {
        event_id: Some(id.into()),
        code: Some(code.to_string()),
        period: Some(period.into()),
        team_id: team.map(Into::into),
        description: None,
        player_id: players.map(|(p_in, _)| p_in.into()),
        player_2_id: players.map(|(_, p_out)| p_out.into()),
        wall_time: Some(wall_time.to_string()),
    }
}

pub fn point(id: &str, period: &str, score: &str, team: Option<&str>, wall_time: &str) -> RawEvent {
    RawEvent {
        description: Some(score.to_string()),
        ..raw_event(id, "piste", period, team, None, wall_time)
    }
}

/// Roster of two teams with players `A1..A6` / `B1..B6` starting in slots
/// 1-6 and one bench player per team (`A7`, `B7`).
pub fn two_team_roster() -> RawMatch {
    let mut lineups = Vec::new();
    for (team, name) in [("A", "Alpha"), ("B", "Bravo")] {
        for n in 1..=6 {
            let mut entry = lineup_entry(
                &format!("{team}{n}"),
                team,
                &format!("{name} {n}"),
                &n.to_string(),
                json!({ "1": n }),
            );
            if n == 1 {
                entry.captain = Some("C".into());
            }
            lineups.push(entry);
        }
        lineups.push(lineup_entry(&format!("{team}7"), team, &format!("{name} 7"), "7", json!({})));
    }

    RawMatch {
        match_id: Some("m-1".into()),
        date: Some("2024-03-02".to_string()),
        team_a_id: Some("A".into()),
        team_a_name: Some("Team Alpha".to_string()),
        team_b_id: Some("B".into()),
        team_b_name: Some("Team Bravo".to_string()),
        lineups,
        events: Vec::new(),
        substitution_events: Vec::new(),
    }
}

/// Alpha serves first; points go A, A, B, B, A (1-0, 2-0, 2-1, 2-2, 3-2).
pub fn alpha_bravo_feed() -> RawMatch {
    let mut feed = two_team_roster();
    feed.events = vec![
        raw_event("e1", "aloitajakso", "1", None, None, "10:00:00"),
        raw_event("e2", "aloittavajoukkue", "1", Some("A"), None, "10:00:00"),
        point("p1", "1", "1-0", None, "10:00:30"),
        point("p2", "1", "2-0", None, "10:01:00"),
        point("p3", "1", "2-1", None, "10:01:30"),
        point("p4", "1", "2-2", None, "10:02:00"),
        point("p5", "1", "3-2", None, "10:02:30"),
    ];
    feed
}

/// Feed whose periods are given as `(first server, rally winners)`. Every
/// rally takes ten seconds; periods are separated by five minutes.
pub fn rally_feed(periods: &[(TeamSide, Vec<TeamSide>)]) -> RawMatch {
    let mut feed = two_team_roster();
    let mut clock: u32 = 10 * 3600;
    let mut seq = 0usize;
    let mut next_id = |prefix: &str| {
        seq += 1;
        format!("{prefix}{seq}")
    };
    let hms = |t: u32| format!("{:02}:{:02}:{:02}", t / 3600, (t % 3600) / 60, t % 60);

    for (i, (server, rallies)) in periods.iter().enumerate() {
        let period = (i + 1).to_string();
        feed.events.push(raw_event(&next_id("s"), "aloitajakso", &period, None, None, &hms(clock)));
        feed.events.push(raw_event(
            &next_id("d"),
            "aloittavajoukkue",
            &period,
            Some(server.symbol()),
            None,
            &hms(clock),
        ));
        let (mut a, mut b) = (0u16, 0u16);
        for winner in rallies {
            clock += 10;
            match winner {
                TeamSide::A => a += 1,
                TeamSide::B => b += 1,
            }
            feed.events.push(point(&next_id("p"), &period, &format!("{a}-{b}"), None, &hms(clock)));
        }
        clock += 1;
        feed.events.push(raw_event(&next_id("m"), "maali", &period, None, None, &hms(clock)));
        clock += 300;
    }
    feed
}
