use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Coarse time-of-week buckets used instead of real clock times.
///
/// The declaration order is load-bearing: fallback scoring breaks count
/// ties by the first-declared slot.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SlotTag {
    WeekdayEvening,
    WeekendAfternoon,
    WeekendEvening,
    WeekdayLate,
    WeekendLate,
}

impl SlotTag {
    /// All slots in fixed declaration order
    pub const ALL: [SlotTag; 5] = [
        SlotTag::WeekdayEvening,
        SlotTag::WeekendAfternoon,
        SlotTag::WeekendEvening,
        SlotTag::WeekdayLate,
        SlotTag::WeekendLate,
    ];

    /// Canonical display time for a slot
    pub fn display_time(&self) -> &'static str {
        match self {
            SlotTag::WeekdayEvening => "Friday, 8:00 PM EST",
            SlotTag::WeekendAfternoon => "Saturday, 2:00 PM EST",
            SlotTag::WeekendEvening => "Saturday, 7:00 PM EST",
            SlotTag::WeekdayLate => "Thursday, 10:30 PM EST",
            SlotTag::WeekendLate => "Saturday, 10:30 PM EST",
        }
    }

    /// Human-readable slot label, used in fallback rationales
    pub fn label(&self) -> &'static str {
        match self {
            SlotTag::WeekdayEvening => "weekday evenings",
            SlotTag::WeekendAfternoon => "weekend afternoons",
            SlotTag::WeekendEvening => "weekend evenings",
            SlotTag::WeekdayLate => "late weekday nights",
            SlotTag::WeekendLate => "late weekend nights",
        }
    }
}

/// Timezone a friend reports; display-only, never used for arithmetic
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Timezone {
    #[default]
    Est,
    Pst,
    Cst,
    Mst,
    Gmt,
    Cet,
}

/// A friend's availability record for the watch-party planner.
///
/// Ephemeral: created when the planner opens, discarded when it closes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Friend {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub timezone: Timezone,
    #[serde(default)]
    pub availability: BTreeSet<SlotTag>,
}

impl Friend {
    /// Creates a blank friend record with the default timezone
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            name: String::new(),
            timezone: Timezone::default(),
            availability: BTreeSet::new(),
        }
    }

    /// A friend qualifies for scoring with a non-empty name and at least
    /// one selected slot tag.
    pub fn qualifies(&self) -> bool {
        !self.name.trim().is_empty() && !self.availability.is_empty()
    }
}

impl Default for Friend {
    fn default() -> Self {
        Self::new()
    }
}

/// A ranked watch-time suggestion derived from a roster snapshot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchTimeSuggestion {
    /// Display string, e.g. "Saturday, 7:00 PM EST"
    pub time: String,
    /// Integer percentage 0-100
    pub confidence: u8,
    /// Number of qualifying friends free in this slot
    pub participants: usize,
    pub reason: String,
}

/// Errors from roster edits
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RosterError {
    #[error("At least one friend is required for the planner")]
    LastFriend,
    #[error("No friend with id {0}")]
    UnknownFriend(Uuid),
}

/// Edits applied to the roster through a single dispatcher
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RosterAction {
    Add,
    Remove { id: Uuid },
    Rename { id: Uuid, name: String },
    SetTimezone { id: Uuid, timezone: Timezone },
    ToggleSlot { id: Uuid, slot: SlotTag },
}

/// Ordered collection of friend records backing the availability scorer.
///
/// Never empty: a new roster starts with one blank record and removal of
/// the last record is rejected.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Roster {
    friends: Vec<Friend>,
}

impl Roster {
    pub fn new() -> Self {
        Self {
            friends: vec![Friend::new()],
        }
    }

    pub fn friends(&self) -> &[Friend] {
        &self.friends
    }

    /// Applies a single edit to the roster.
    ///
    /// All mutations go through here so UI layers can stay unidirectional:
    /// dispatch an action, re-render from the new state.
    pub fn apply(&mut self, action: RosterAction) -> Result<(), RosterError> {
        match action {
            RosterAction::Add => {
                self.friends.push(Friend::new());
                Ok(())
            }
            RosterAction::Remove { id } => {
                if self.friends.len() == 1 {
                    return Err(RosterError::LastFriend);
                }
                let before = self.friends.len();
                self.friends.retain(|f| f.id != id);
                if self.friends.len() == before {
                    return Err(RosterError::UnknownFriend(id));
                }
                Ok(())
            }
            RosterAction::Rename { id, name } => {
                self.friend_mut(id)?.name = name;
                Ok(())
            }
            RosterAction::SetTimezone { id, timezone } => {
                self.friend_mut(id)?.timezone = timezone;
                Ok(())
            }
            RosterAction::ToggleSlot { id, slot } => {
                let friend = self.friend_mut(id)?;
                if !friend.availability.insert(slot) {
                    friend.availability.remove(&slot);
                }
                Ok(())
            }
        }
    }

    fn friend_mut(&mut self, id: Uuid) -> Result<&mut Friend, RosterError> {
        self.friends
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or(RosterError::UnknownFriend(id))
    }
}

impl Default for Roster {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_roster_has_one_blank_friend() {
        let roster = Roster::new();
        assert_eq!(roster.friends().len(), 1);
        assert!(!roster.friends()[0].qualifies());
        assert_eq!(roster.friends()[0].timezone, Timezone::Est);
    }

    #[test]
    fn test_remove_last_friend_rejected() {
        let mut roster = Roster::new();
        let id = roster.friends()[0].id;
        assert_eq!(
            roster.apply(RosterAction::Remove { id }),
            Err(RosterError::LastFriend)
        );
        assert_eq!(roster.friends().len(), 1);
    }

    #[test]
    fn test_add_then_remove() {
        let mut roster = Roster::new();
        roster.apply(RosterAction::Add).unwrap();
        assert_eq!(roster.friends().len(), 2);

        let id = roster.friends()[0].id;
        roster.apply(RosterAction::Remove { id }).unwrap();
        assert_eq!(roster.friends().len(), 1);
        assert_ne!(roster.friends()[0].id, id);
    }

    #[test]
    fn test_remove_unknown_friend() {
        let mut roster = Roster::new();
        roster.apply(RosterAction::Add).unwrap();
        let bogus = Uuid::new_v4();
        assert_eq!(
            roster.apply(RosterAction::Remove { id: bogus }),
            Err(RosterError::UnknownFriend(bogus))
        );
    }

    #[test]
    fn test_toggle_slot_is_idempotent_pair() {
        let mut roster = Roster::new();
        let id = roster.friends()[0].id;

        roster
            .apply(RosterAction::ToggleSlot {
                id,
                slot: SlotTag::WeekendEvening,
            })
            .unwrap();
        assert!(roster.friends()[0]
            .availability
            .contains(&SlotTag::WeekendEvening));

        roster
            .apply(RosterAction::ToggleSlot {
                id,
                slot: SlotTag::WeekendEvening,
            })
            .unwrap();
        assert!(roster.friends()[0].availability.is_empty());
    }

    #[test]
    fn test_rename_and_qualify() {
        let mut roster = Roster::new();
        let id = roster.friends()[0].id;

        roster
            .apply(RosterAction::Rename {
                id,
                name: "Ana".to_string(),
            })
            .unwrap();
        assert!(!roster.friends()[0].qualifies());

        roster
            .apply(RosterAction::ToggleSlot {
                id,
                slot: SlotTag::WeekdayLate,
            })
            .unwrap();
        assert!(roster.friends()[0].qualifies());
    }

    #[test]
    fn test_duplicate_names_allowed() {
        let mut roster = Roster::new();
        roster.apply(RosterAction::Add).unwrap();
        let ids: Vec<Uuid> = roster.friends().iter().map(|f| f.id).collect();
        for id in &ids {
            roster
                .apply(RosterAction::Rename {
                    id: *id,
                    name: "Sam".to_string(),
                })
                .unwrap();
        }
        assert_eq!(roster.friends().len(), 2);
    }

    #[test]
    fn test_slot_tag_serialization() {
        let json = serde_json::to_string(&SlotTag::WeekendEvening).unwrap();
        assert_eq!(json, "\"weekend_evening\"");
        let tz = serde_json::to_string(&Timezone::Pst).unwrap();
        assert_eq!(tz, "\"PST\"");
    }
}
