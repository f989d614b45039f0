//! Records as PocketBase returns them.
//!
//! Every field defaults so that a record with missing columns or
//! unexpanded relations still deserializes.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Team {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Hall {
    pub id: String,
    pub name: String,
    pub address: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Game {
    pub id: String,
    pub home_team: String,
    pub away_team: String,
    pub date: String,
    pub time: String,
    pub league: String,
    /// `home` or `away`, seen from the club's side.
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub game_type: String,
    pub status: String,
    pub home_score: u32,
    pub away_score: u32,
    pub kscw_team: String,
    pub hall: String,
    pub expand: GameExpand,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameExpand {
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub kscw_team: Option<Team>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub hall: Option<Hall>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Training {
    pub id: String,
    pub team: String,
    pub hall: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub cancelled: bool,
    pub notes: String,
    pub expand: TrainingExpand,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TrainingExpand {
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub team: Option<Team>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub hall: Option<Hall>,
}

/// A club event such as a tournament, assembly or party. It is shown on
/// its start day only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ClubEvent {
    pub id: String,
    pub title: String,
    pub description: String,
    pub event_type: String,
    pub start_date: String,
    pub start_time: String,
    pub end_time: String,
    pub all_day: bool,
    pub location: String,
    pub teams: Vec<String>,
    pub expand: ClubEventExpand,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ClubEventExpand {
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Vec::is_empty"))]
    pub teams: Vec<Team>,
}

/// A hall being unavailable over an inclusive range of days.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HallClosure {
    pub id: String,
    pub hall: String,
    pub start_date: String,
    pub end_date: String,
    pub reason: String,
    pub source: String,
    pub expand: HallExpand,
}

/// A booking of a club hall by someone else.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HallEvent {
    pub id: String,
    pub title: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub all_day: bool,
    pub location: String,
    pub hall: String,
    pub expand: HallExpand,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HallExpand {
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub hall: Option<Hall>,
}

/// Records of every source, as fetched for one view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Records {
    pub games: Vec<Game>,
    pub trainings: Vec<Training>,
    pub events: Vec<ClubEvent>,
    pub closures: Vec<HallClosure>,
    pub hall_events: Vec<HallEvent>,
}

impl Game {
    #[must_use]
    pub fn hall_name(&self) -> &str {
        self.expand.hall.as_ref().map_or("", |hall| hall.name.as_str())
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status == "completed"
    }
}

impl Training {
    #[must_use]
    pub fn team_name(&self) -> &str {
        self.expand.team.as_ref().map_or("", |team| team.name.as_str())
    }

    #[must_use]
    pub fn hall_name(&self) -> &str {
        self.expand.hall.as_ref().map_or("", |hall| hall.name.as_str())
    }
}

impl HallExpand {
    #[must_use]
    pub fn hall_name(&self) -> &str {
        self.hall.as_ref().map_or("", |hall| hall.name.as_str())
    }
}
