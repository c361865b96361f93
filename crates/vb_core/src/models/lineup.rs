use serde::{Deserialize, Serialize};

use super::player::{PlayerKey, Slot};

/// Six-slot on-court arrangement of one team (slot → player).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Formation([PlayerKey; 6]);

impl Formation {
    pub const fn new(slots: [PlayerKey; 6]) -> Self {
        Self(slots)
    }

    #[inline]
    pub fn at(&self, slot: Slot) -> PlayerKey {
        self.0[slot.index()]
    }

    /// Player in slot 1.
    #[inline]
    pub fn server(&self) -> PlayerKey {
        self.at(Slot::SERVER)
    }

    pub fn slot_of(&self, key: PlayerKey) -> Option<Slot> {
        Slot::ALL.into_iter().find(|slot| self.at(*slot) == key)
    }

    pub fn contains(&self, key: PlayerKey) -> bool {
        self.0.contains(&key)
    }

    /// One clockwise rotation: slot 2 moves to 1, 3 to 2, ..., 1 to 6.
    pub fn rotated(&self) -> Self {
        let mut next = self.0;
        next.rotate_left(1);
        Self(next)
    }

    pub(crate) fn replace(&mut self, slot: Slot, key: PlayerKey) {
        self.0[slot.index()] = key;
    }

    pub fn iter(&self) -> impl Iterator<Item = (Slot, PlayerKey)> + '_ {
        Slot::ALL.into_iter().map(move |slot| (slot, self.at(slot)))
    }
}
