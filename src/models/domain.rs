use chrono::Timelike;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Minutes in a day, the exclusive upper bound of [`TimeOfDay::minutes_since_midnight`]
pub const MINUTES_PER_DAY: u16 = 24 * 60;

/// Rejected caller input. Raised when a value is constructed, never later.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("Invalid time of day: {0}")]
    InvalidTime(String),

    #[error("Invalid price tier: {0}")]
    InvalidPriceTier(String),

    #[error("Minimum rating must be between 0.0 and 5.0, got {0}")]
    InvalidMinRating(f64),

    #[error("Cuisine filter must not be blank")]
    BlankCuisine,

    #[error("Invalid location: {0}")]
    InvalidLocation(String),
}

/// Time of day without a date component
///
/// Always holds an hour in 0-23 and a minute in 0-59. Serialized as "HH:MM".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay {
    hour: u8,
    minute: u8,
}

impl TimeOfDay {
    pub const MIDNIGHT: TimeOfDay = TimeOfDay { hour: 0, minute: 0 };

    pub fn new(hour: u8, minute: u8) -> Result<Self, InputError> {
        if hour > 23 {
            return Err(InputError::InvalidTime(format!("hour {} is outside 0-23", hour)));
        }
        if minute > 59 {
            return Err(InputError::InvalidTime(format!("minute {} is outside 0-59", minute)));
        }
        Ok(Self { hour, minute })
    }

    /// Build from minutes since midnight (0-1439)
    pub fn from_minutes(minutes: u16) -> Result<Self, InputError> {
        if minutes >= MINUTES_PER_DAY {
            return Err(InputError::InvalidTime(format!(
                "{} minutes is past the end of the day",
                minutes
            )));
        }
        Ok(Self {
            hour: (minutes / 60) as u8,
            minute: (minutes % 60) as u8,
        })
    }

    /// Take the hour and minute of any chrono time value
    pub fn from_time<T: Timelike>(time: &T) -> Self {
        // chrono guarantees hour < 24 and minute < 60
        Self {
            hour: time.hour() as u8,
            minute: time.minute() as u8,
        }
    }

    /// Parse "HH:MM" (a single-digit hour is accepted, minutes need two digits)
    pub fn parse_hhmm(s: &str) -> Result<Self, InputError> {
        let invalid = || InputError::InvalidTime(format!("expected HH:MM, got {:?}", s));

        let (hours, minutes) = s.trim().split_once(':').ok_or_else(invalid)?;
        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());

        if hours.is_empty() || hours.len() > 2 || minutes.len() != 2 {
            return Err(invalid());
        }
        if !all_digits(hours) || !all_digits(minutes) {
            return Err(invalid());
        }

        let hour = hours.parse::<u8>().map_err(|_| invalid())?;
        let minute = minutes.parse::<u8>().map_err(|_| invalid())?;

        Self::new(hour, minute)
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    /// Minutes elapsed since 00:00, in 0-1439
    #[inline]
    pub fn minutes_since_midnight(&self) -> u16 {
        self.hour as u16 * 60 + self.minute as u16
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for TimeOfDay {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_hhmm(s)
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = InputError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse_hhmm(&value)
    }
}

impl From<TimeOfDay> for String {
    fn from(value: TimeOfDay) -> Self {
        value.to_string()
    }
}

/// Geographic coordinate in degrees (WGS-84)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    #[serde(alias = "lat")]
    pub latitude: f64,
    #[serde(alias = "lng", alias = "lon")]
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Reject NaN and out-of-range values
    pub fn validate(&self) -> Result<(), InputError> {
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(InputError::InvalidLocation(format!(
                "latitude {} is outside -90..=90",
                self.latitude
            )));
        }
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(InputError::InvalidLocation(format!(
                "longitude {} is outside -180..=180",
                self.longitude
            )));
        }
        Ok(())
    }
}

/// Price tier, ordered from cheapest to most expensive
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PriceTier {
    #[serde(rename = "$")]
    Inexpensive,
    #[serde(rename = "$$")]
    Moderate,
    #[serde(rename = "$$$")]
    Expensive,
    #[serde(rename = "$$$$")]
    VeryExpensive,
}

impl PriceTier {
    pub const ALL: [PriceTier; 4] = [
        PriceTier::Inexpensive,
        PriceTier::Moderate,
        PriceTier::Expensive,
        PriceTier::VeryExpensive,
    ];

    pub fn symbol(&self) -> &'static str {
        match self {
            PriceTier::Inexpensive => "$",
            PriceTier::Moderate => "$$",
            PriceTier::Expensive => "$$$",
            PriceTier::VeryExpensive => "$$$$",
        }
    }
}

impl fmt::Display for PriceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for PriceTier {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PriceTier::ALL
            .into_iter()
            .find(|tier| tier.symbol() == s)
            .ok_or_else(|| InputError::InvalidPriceTier(s.to_string()))
    }
}

/// Restaurant record as returned by the candidate provider
///
/// Only `id`, `coordinate`, `cuisine`, `price_tier`, `rating` and the hours take
/// part in ranking. The remaining fields are carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub coordinate: Coordinate,
    pub cuisine: String,
    #[serde(rename = "priceRange", alias = "priceTier")]
    pub price_tier: PriceTier,
    pub rating: f64,
    #[serde(
        rename = "openingHours",
        alias = "openingTime",
        default,
        deserialize_with = "deserialize_optional_time"
    )]
    pub opening_time: Option<TimeOfDay>,
    #[serde(
        rename = "closingHours",
        alias = "closingTime",
        default,
        deserialize_with = "deserialize_optional_time"
    )]
    pub closing_time: Option<TimeOfDay>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl Restaurant {
    /// True when both opening and closing times are present
    pub fn has_known_hours(&self) -> bool {
        self.opening_time.is_some() && self.closing_time.is_some()
    }
}

/// Providers send "" for unknown hours; treat it the same as a missing field
fn deserialize_optional_time<'de, D>(deserializer: D) -> Result<Option<TimeOfDay>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => TimeOfDay::parse_hhmm(s)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

/// Caller-selected constraints for one ranking call
///
/// Absent fields impose no constraint; active ones combine with logical AND.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    #[serde(default)]
    pub cuisine: Option<String>,
    #[serde(rename = "priceRange", alias = "priceTier", default)]
    pub price_tier: Option<PriceTier>,
    #[serde(rename = "minRating", default)]
    pub min_rating: Option<f64>,
    #[serde(rename = "openNow", alias = "openNowOnly", default)]
    pub open_now_only: bool,
}

impl FilterCriteria {
    pub fn with_cuisine(mut self, cuisine: impl Into<String>) -> Self {
        self.cuisine = Some(cuisine.into());
        self
    }

    pub fn with_price_tier(mut self, tier: PriceTier) -> Self {
        self.price_tier = Some(tier);
        self
    }

    pub fn with_min_rating(mut self, min_rating: f64) -> Self {
        self.min_rating = Some(min_rating);
        self
    }

    pub fn open_now(mut self) -> Self {
        self.open_now_only = true;
        self
    }

    /// Check the criteria before they reach the ranking pipeline
    pub fn validate(&self) -> Result<(), InputError> {
        if let Some(cuisine) = &self.cuisine {
            if cuisine.trim().is_empty() {
                return Err(InputError::BlankCuisine);
            }
        }

        if let Some(min_rating) = self.min_rating {
            if !min_rating.is_finite() || !(0.0..=5.0).contains(&min_rating) {
                return Err(InputError::InvalidMinRating(min_rating));
            }
        }

        Ok(())
    }

    /// Number of constraints currently in effect
    pub fn active_count(&self) -> usize {
        [
            self.cuisine.is_some(),
            self.price_tier.is_some(),
            self.min_rating.is_some(),
            self.open_now_only,
        ]
        .into_iter()
        .filter(|active| *active)
        .count()
    }

    pub fn is_unconstrained(&self) -> bool {
        self.active_count() == 0
    }
}

/// Where a search is centered, before the provider resolves it to a coordinate
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    Address(String),
    Coordinates(Coordinate),
}

impl LocationQuery {
    pub fn validate(&self) -> Result<(), InputError> {
        match self {
            LocationQuery::Address(address) if address.trim().is_empty() => Err(
                InputError::InvalidLocation("address must not be blank".to_string()),
            ),
            LocationQuery::Address(_) => Ok(()),
            LocationQuery::Coordinates(coordinate) => coordinate.validate(),
        }
    }
}

impl fmt::Display for LocationQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationQuery::Address(address) => write!(f, "address:{}", address.trim()),
            LocationQuery::Coordinates(c) => write!(f, "coords:{:.6},{:.6}", c.latitude, c.longitude),
        }
    }
}

/// A restaurant that survived filtering, with its distance from the search origin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedRestaurant {
    #[serde(flatten)]
    pub restaurant: Restaurant,
    #[serde(rename = "distanceKm")]
    pub distance_km: f64,
}
