//! Illustration cues derived from the core signals.

use super::{Elevation, Intensity, TimeOfDay};
use serde::{Deserialize, Serialize};

/// Sport types whose high-intensity sessions get the illustrated style.
pub const HIGH_INTENSITY_ACTIVITIES: &[&str] = &[
    "Run",
    "TrailRun",
    "VirtualRun",
    "Ride",
    "VirtualRide",
    "MountainBikeRide",
    "GravelRide",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Calm,
    Intense,
    Routine,
    Playful,
    Focused,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    Cartoon,
    Minimal,
    Illustrated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Subject {
    Runner,
    Cyclist,
    #[serde(rename = "trail runner")]
    TrailRunner,
    Walker,
    Hiker,
    Swimmer,
    Athlete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Terrain {
    #[serde(rename = "mountainous terrain")]
    Mountainous,
    #[serde(rename = "rolling hills")]
    RollingHills,
    #[serde(rename = "flat terrain")]
    Flat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    #[serde(rename = "indoor training space")]
    Indoor,
    #[serde(rename = "outdoor training space")]
    Outdoor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Atmosphere {
    #[serde(rename = "soft morning light")]
    MorningLight,
    #[serde(rename = "bright daylight")]
    Daylight,
    #[serde(rename = "warm evening glow")]
    EveningGlow,
    #[serde(rename = "dark night atmosphere")]
    Night,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedSignals {
    pub mood: Mood,
    pub style: Style,
    pub subject: Subject,
    pub terrain: Terrain,
    pub environment: Environment,
    pub atmosphere: Atmosphere,
}

fn has_tag(tags: &[String], tag: &str) -> bool {
    tags.iter().any(|t| t == tag)
}

/// Tags win over intensity, in the order recovery, race, commute, with kid.
pub fn classify_mood(tags: &[String], intensity: Intensity) -> Mood {
    if has_tag(tags, "recovery") {
        Mood::Calm
    } else if has_tag(tags, "race") {
        Mood::Intense
    } else if has_tag(tags, "commute") {
        Mood::Routine
    } else if has_tag(tags, "with kid") {
        Mood::Playful
    } else {
        match intensity {
            Intensity::Low => Mood::Calm,
            Intensity::High => Mood::Intense,
            Intensity::Medium => Mood::Focused,
        }
    }
}

pub fn classify_style(
    tags: &[String],
    elevation: Elevation,
    intensity: Intensity,
    activity_type: &str,
) -> Style {
    if has_tag(tags, "recovery") || has_tag(tags, "easy") {
        Style::Minimal
    } else if elevation == Elevation::Mountainous
        || (intensity == Intensity::High && HIGH_INTENSITY_ACTIVITIES.contains(&activity_type))
    {
        Style::Illustrated
    } else {
        Style::Cartoon
    }
}

pub fn classify_subject(activity_type: &str) -> Subject {
    match activity_type {
        "Run" | "VirtualRun" => Subject::Runner,
        "Ride" | "VirtualRide" => Subject::Cyclist,
        "TrailRun" => Subject::TrailRunner,
        "Walk" => Subject::Walker,
        "Hike" => Subject::Hiker,
        "Swim" => Subject::Swimmer,
        _ => Subject::Athlete,
    }
}

pub fn classify_terrain(elevation: Elevation) -> Terrain {
    match elevation {
        Elevation::Mountainous => Terrain::Mountainous,
        Elevation::Rolling => Terrain::RollingHills,
        Elevation::Flat => Terrain::Flat,
    }
}

pub fn classify_environment(activity_type: &str) -> Environment {
    if activity_type.contains("Virtual") {
        Environment::Indoor
    } else {
        Environment::Outdoor
    }
}

pub fn classify_atmosphere(time_of_day: TimeOfDay) -> Atmosphere {
    match time_of_day {
        TimeOfDay::Morning => Atmosphere::MorningLight,
        TimeOfDay::Day => Atmosphere::Daylight,
        TimeOfDay::Evening => Atmosphere::EveningGlow,
        TimeOfDay::Night => Atmosphere::Night,
    }
}
