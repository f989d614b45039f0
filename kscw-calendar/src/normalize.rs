//! Conversion of upstream records into [`CalendarEntry`] values.
//!
//! Missing relations and optional fields fall back to empty strings. A
//! record without a usable date yields no entry.

use log::warn;

use crate::labels::Language;
use crate::parser::{parse_date, parse_time};
use crate::records::{ClubEvent, Game, HallEvent, Records, Training};
use crate::structs::{CalendarEntry, EntrySource, EntryType};

impl Game {
    #[must_use]
    pub fn to_entry(&self, language: Language) -> Option<CalendarEntry> {
        let Some(date) = parse_date(&self.date) else {
            warn!("Skipping game {} with unparsable date {:?}", self.id, self.date);
            return None;
        };

        let start_time = parse_time(&self.time);

        let mut description = Vec::new();
        if !self.league.is_empty() {
            description.push(self.league.clone());
        }
        if self.is_completed() {
            description.push(format!(
                "{}: {}:{}",
                language.result(),
                self.home_score,
                self.away_score
            ));
        }

        let team_names = self
            .expand
            .kscw_team
            .iter()
            .map(|team| team.name.clone())
            .filter(|name| !name.is_empty())
            .collect();

        Some(CalendarEntry {
            id: self.id.clone(),
            entry_type: EntryType::Game,
            title: format!("{} – {}", self.home_team, self.away_team),
            date,
            start_time,
            end_time: None,
            all_day: start_time.is_none(),
            location: self.hall_name().to_string(),
            team_names,
            description: description.join("\n"),
            source: EntrySource::Game(self.clone()),
            game_type: (!self.game_type.is_empty()).then(|| self.game_type.clone()),
        })
    }
}

impl Training {
    #[must_use]
    pub fn to_entry(&self, language: Language) -> Option<CalendarEntry> {
        let Some(date) = parse_date(&self.date) else {
            warn!("Skipping training {} with unparsable date {:?}", self.id, self.date);
            return None;
        };

        let start_time = parse_time(&self.start_time);
        let team = self.team_name();

        let description = match (self.cancelled, self.notes.is_empty()) {
            (true, true) => language.cancelled().to_string(),
            (true, false) => format!("{}\n{}", language.cancelled(), self.notes),
            (false, _) => self.notes.clone(),
        };

        Some(CalendarEntry {
            id: self.id.clone(),
            entry_type: EntryType::Training,
            title: language.training_title(team),
            date,
            start_time,
            end_time: parse_time(&self.end_time),
            all_day: start_time.is_none(),
            location: self.hall_name().to_string(),
            team_names: team_names_of([team]),
            description,
            source: EntrySource::Training(self.clone()),
            game_type: None,
        })
    }
}

impl ClubEvent {
    #[must_use]
    pub fn to_entry(&self) -> Option<CalendarEntry> {
        let Some(date) = parse_date(&self.start_date) else {
            warn!(
                "Skipping event {} with unparsable start date {:?}",
                self.id, self.start_date
            );
            return None;
        };

        let start_time = parse_time(&self.start_time).filter(|_| !self.all_day);

        Some(CalendarEntry {
            id: self.id.clone(),
            entry_type: EntryType::Event,
            title: self.title.clone(),
            date,
            start_time,
            end_time: parse_time(&self.end_time).filter(|_| !self.all_day),
            all_day: self.all_day || start_time.is_none(),
            location: self.location.clone(),
            team_names: team_names_of(self.expand.teams.iter().map(|team| team.name.as_str())),
            description: self.description.clone(),
            source: EntrySource::Event(self.clone()),
            game_type: None,
        })
    }
}

impl HallEvent {
    #[must_use]
    pub fn to_entry(&self) -> Option<CalendarEntry> {
        let Some(date) = parse_date(&self.date) else {
            warn!("Skipping hall event {} with unparsable date {:?}", self.id, self.date);
            return None;
        };

        let start_time = parse_time(&self.start_time).filter(|_| !self.all_day);
        let location = match self.expand.hall_name() {
            "" => self.location.clone(),
            hall => hall.to_string(),
        };

        Some(CalendarEntry {
            id: self.id.clone(),
            entry_type: EntryType::Hall,
            title: self.title.clone(),
            date,
            start_time,
            end_time: parse_time(&self.end_time).filter(|_| !self.all_day),
            all_day: self.all_day || start_time.is_none(),
            location,
            team_names: Vec::new(),
            description: String::new(),
            source: EntrySource::HallEvent(self.clone()),
            game_type: None,
        })
    }
}

fn team_names_of<'a, I: IntoIterator<Item = &'a str>>(names: I) -> Vec<String> {
    names
        .into_iter()
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

impl Records {
    /// Normalized entries for every record, one list per source, in the
    /// order games, trainings, events, closures, hall events.
    #[must_use]
    pub fn to_entries(&self, language: Language) -> Vec<Vec<CalendarEntry>> {
        vec![
            self.games.iter().filter_map(|game| game.to_entry(language)).collect(),
            self.trainings
                .iter()
                .filter_map(|training| training.to_entry(language))
                .collect(),
            self.events.iter().filter_map(ClubEvent::to_entry).collect(),
            self.closures
                .iter()
                .flat_map(|closure| closure.to_entries(language))
                .collect(),
            self.hall_events.iter().filter_map(HallEvent::to_entry).collect(),
        ]
    }
}
