use std::{fmt, str::FromStr};

use rand::Rng;

use crate::Error;

/// A charitable focus area used to pick a charity search term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cause {
    LocalArea,
    MostEffectiveCharity,
    AnimalWelfare,
    MentalHealth,
    Cancer,
    Disability,
    Random,
}

impl Cause {
    /// Every cause with a deterministic search term. `Random` draws from this
    /// set, so it can never pick itself.
    pub const FIXED: [Cause; 6] = [
        Cause::LocalArea,
        Cause::MostEffectiveCharity,
        Cause::AnimalWelfare,
        Cause::MentalHealth,
        Cause::Cancer,
        Cause::Disability,
    ];

    /// Resolves a cause to a charity search term. `customer_area` is the
    /// region parsed from the account's home address, used by `LocalArea`.
    pub fn search_term(self, rng: &mut impl Rng, customer_area: &str) -> String {
        match self {
            Cause::LocalArea => customer_area.to_owned(),
            Cause::MostEffectiveCharity => "Malaria Consortium".to_owned(),
            Cause::AnimalWelfare => "animal".to_owned(),
            Cause::MentalHealth => "mental".to_owned(),
            Cause::Cancer => "cancer".to_owned(),
            Cause::Disability => "disability".to_owned(),
            Cause::Random => {
                let cause = Self::FIXED[rng.gen_range(0..Self::FIXED.len())];
                cause.search_term(rng, customer_area)
            }
        }
    }
}

impl fmt::Display for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Cause::LocalArea => "local area",
            Cause::MostEffectiveCharity => "most effective charity",
            Cause::AnimalWelfare => "animal welfare",
            Cause::MentalHealth => "mental health",
            Cause::Cancer => "cancer",
            Cause::Disability => "disability",
            Cause::Random => "random",
        };
        write!(f, "{name}")
    }
}

impl FromStr for Cause {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cause = match s.trim().to_ascii_lowercase().as_str() {
            "local area" | "local_area" => Cause::LocalArea,
            "most effective charity" | "most_effective_charity" => Cause::MostEffectiveCharity,
            "animal welfare" | "animal_welfare" => Cause::AnimalWelfare,
            "mental health" | "mental_health" => Cause::MentalHealth,
            "cancer" => Cause::Cancer,
            "disability" => Cause::Disability,
            "random" => Cause::Random,
            _ => return Err(Error::UnrecognizedCause(s.trim().to_owned())),
        };
        Ok(cause)
    }
}

// Deserialization goes through `FromStr` so a bad `cause` in config reports
// the unrecognised cause, not a generic enum-variant error.
impl<'de> serde::Deserialize<'de> for Cause {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(serde::de::Error::custom)
    }
}
