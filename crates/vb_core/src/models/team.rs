use serde::{Deserialize, Serialize};

/// Which of the two feed teams (`team_A_*` / `team_B_*`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum TeamSide {
    #[default]
    A,
    B,
}

impl TeamSide {
    pub const BOTH: [TeamSide; 2] = [TeamSide::A, TeamSide::B];

    #[inline]
    pub const fn index(&self) -> usize {
        match self {
            TeamSide::A => 0,
            TeamSide::B => 1,
        }
    }

    #[inline]
    pub fn opponent(&self) -> Self {
        match self {
            TeamSide::A => TeamSide::B,
            TeamSide::B => TeamSide::A,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            TeamSide::A => "A",
            TeamSide::B => "B",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    /// Feed identifier.
    pub id: String,
    pub name: String,
    pub side: TeamSide,
}
