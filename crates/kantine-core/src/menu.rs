//! Weekday menus: the five serving days and the dishes offered on each.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// A serving day. Cantinas are closed at weekends, so only Monday to Friday exist.
///
/// Declaration order is Monday → Friday; [`DayMenu`] relies on it for ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Mandag,
    Tirsdag,
    Onsdag,
    Torsdag,
    Fredag,
}

impl Weekday {
    pub const ALL: [Weekday; 5] = [
        Weekday::Mandag,
        Weekday::Tirsdag,
        Weekday::Onsdag,
        Weekday::Torsdag,
        Weekday::Fredag,
    ];

    /// Lower-case Norwegian day name, as used in menu text and JSON keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mandag => "mandag",
            Self::Tirsdag => "tirsdag",
            Self::Onsdag => "onsdag",
            Self::Torsdag => "torsdag",
            Self::Fredag => "fredag",
        }
    }

    /// Match a day name case-insensitively. Surrounding whitespace is not trimmed here.
    pub fn from_name(name: &str) -> Option<Self> {
        let lower = name.to_lowercase();
        Self::ALL.into_iter().find(|day| day.as_str() == lower)
    }

    /// Map a calendar weekday onto a serving day; `None` at weekends.
    pub fn from_chrono(day: chrono::Weekday) -> Option<Self> {
        match day {
            chrono::Weekday::Mon => Some(Self::Mandag),
            chrono::Weekday::Tue => Some(Self::Tirsdag),
            chrono::Weekday::Wed => Some(Self::Onsdag),
            chrono::Weekday::Thu => Some(Self::Torsdag),
            chrono::Weekday::Fri => Some(Self::Fredag),
            chrono::Weekday::Sat | chrono::Weekday::Sun => None,
        }
    }

    /// Day name with a leading capital, for display ("Tirsdag").
    pub fn title(&self) -> String {
        let name = self.as_str();
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a JSON document is not a valid weekday menu.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MenuShapeError {
    #[error("menu is not a JSON object")]
    NotAnObject,
    #[error("menu is missing day '{0}'")]
    MissingDay(Weekday),
    #[error("dishes for '{0}' are not a list")]
    NotAList(Weekday),
    #[error("a dish for '{0}' is not a string")]
    NotAString(Weekday),
}

/// Dishes per serving day.
///
/// Always holds all five days, in Monday → Friday order; a day without
/// dishes maps to an empty list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "serde_json::Value",
    into = "BTreeMap<Weekday, Vec<String>>"
)]
pub struct DayMenu {
    days: BTreeMap<Weekday, Vec<String>>,
}

impl Default for DayMenu {
    fn default() -> Self {
        Self::empty()
    }
}

impl DayMenu {
    /// A menu with every day present and no dishes.
    pub fn empty() -> Self {
        Self {
            days: Weekday::ALL.into_iter().map(|day| (day, Vec::new())).collect(),
        }
    }

    /// Dishes for one day, in source order.
    pub fn dishes(&self, day: Weekday) -> &[String] {
        self.days.get(&day).map(Vec::as_slice).unwrap_or_default()
    }

    /// Drop every dish recorded so far for `day`.
    pub fn reset(&mut self, day: Weekday) {
        self.days.insert(day, Vec::new());
    }

    /// Append a dish to the end of a day's list.
    pub fn push(&mut self, day: Weekday, dish: impl Into<String>) {
        self.days.entry(day).or_default().push(dish.into());
    }

    /// Iterate days in Monday → Friday order.
    pub fn iter(&self) -> impl Iterator<Item = (Weekday, &[String])> {
        self.days.iter().map(|(day, dishes)| (*day, dishes.as_slice()))
    }

    /// Total number of dishes across the week.
    pub fn dish_count(&self) -> usize {
        self.days.values().map(Vec::len).sum()
    }

    /// Validate and convert a JSON document of the form
    /// `{"mandag": [..], ..., "fredag": [..]}`.
    ///
    /// Keys other than the five days are ignored.
    pub fn from_json(value: &Value) -> Result<Self, MenuShapeError> {
        let object = value.as_object().ok_or(MenuShapeError::NotAnObject)?;
        let mut menu = Self::empty();
        for day in Weekday::ALL {
            let dishes = object
                .get(day.as_str())
                .ok_or(MenuShapeError::MissingDay(day))?
                .as_array()
                .ok_or(MenuShapeError::NotAList(day))?;
            for dish in dishes {
                let dish = dish.as_str().ok_or(MenuShapeError::NotAString(day))?;
                menu.push(day, dish);
            }
        }
        Ok(menu)
    }
}

impl TryFrom<Value> for DayMenu {
    type Error = MenuShapeError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_json(&value)
    }
}

impl From<DayMenu> for BTreeMap<Weekday, Vec<String>> {
    fn from(menu: DayMenu) -> Self {
        menu.days
    }
}

/// True when `value` has all five day keys, each a list of strings.
pub fn verify_menu_structure(value: &Value) -> bool {
    DayMenu::from_json(value).is_ok()
}
