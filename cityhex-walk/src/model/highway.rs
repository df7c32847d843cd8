use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

/// values of the `highway` tag relevant to pedestrian routing. unrecognized
/// values are preserved in [`Highway::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Highway {
    Motorway,
    MotorwayLink,
    Trunk,
    TrunkLink,
    Primary,
    PrimaryLink,
    Secondary,
    SecondaryLink,
    Tertiary,
    TertiaryLink,
    Unclassified,
    Residential,
    LivingStreet,
    Service,
    Pedestrian,
    Track,
    Footway,
    Path,
    Steps,
    Cycleway,
    Bridleway,
    Other(String),
}

impl Highway {
    /// ways built for, or routinely shared with, people on foot.
    pub fn is_walk_like(&self) -> bool {
        use Highway as H;
        matches!(
            self,
            H::Footway
                | H::Path
                | H::Pedestrian
                | H::LivingStreet
                | H::Steps
                | H::Residential
                | H::Service
                | H::Track
                | H::Cycleway
                | H::Bridleway
        )
    }

    /// classified roads which usually have a sidewalk.
    pub fn is_minor_road(&self) -> bool {
        use Highway as H;
        matches!(
            self,
            H::Primary
                | H::PrimaryLink
                | H::Secondary
                | H::SecondaryLink
                | H::Tertiary
                | H::TertiaryLink
                | H::Unclassified
        )
    }

    pub fn is_motorway(&self) -> bool {
        matches!(self, Highway::Motorway | Highway::MotorwayLink)
    }
}

impl FromStr for Highway {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use Highway as H;
        let highway = match s.trim().to_lowercase().as_str() {
            "motorway" => H::Motorway,
            "motorway_link" => H::MotorwayLink,
            "trunk" => H::Trunk,
            "trunk_link" => H::TrunkLink,
            "primary" => H::Primary,
            "primary_link" => H::PrimaryLink,
            "secondary" => H::Secondary,
            "secondary_link" => H::SecondaryLink,
            "tertiary" => H::Tertiary,
            "tertiary_link" => H::TertiaryLink,
            "unclassified" => H::Unclassified,
            "residential" => H::Residential,
            "living_street" => H::LivingStreet,
            "service" => H::Service,
            "pedestrian" => H::Pedestrian,
            "track" => H::Track,
            "footway" => H::Footway,
            "path" => H::Path,
            "steps" => H::Steps,
            "cycleway" => H::Cycleway,
            "bridleway" => H::Bridleway,
            other => H::Other(other.to_string()),
        };
        Ok(highway)
    }
}

impl Display for Highway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use Highway as H;
        let s = match self {
            H::Motorway => "motorway",
            H::MotorwayLink => "motorway_link",
            H::Trunk => "trunk",
            H::TrunkLink => "trunk_link",
            H::Primary => "primary",
            H::PrimaryLink => "primary_link",
            H::Secondary => "secondary",
            H::SecondaryLink => "secondary_link",
            H::Tertiary => "tertiary",
            H::TertiaryLink => "tertiary_link",
            H::Unclassified => "unclassified",
            H::Residential => "residential",
            H::LivingStreet => "living_street",
            H::Service => "service",
            H::Pedestrian => "pedestrian",
            H::Track => "track",
            H::Footway => "footway",
            H::Path => "path",
            H::Steps => "steps",
            H::Cycleway => "cycleway",
            H::Bridleway => "bridleway",
            H::Other(s) => s.as_str(),
        };
        write!(f, "{s}")
    }
}

impl From<String> for Highway {
    fn from(value: String) -> Self {
        match Highway::from_str(&value) {
            Ok(h) => h,
            Err(never) => match never {},
        }
    }
}

impl From<Highway> for String {
    fn from(value: Highway) -> Self {
        value.to_string()
    }
}
