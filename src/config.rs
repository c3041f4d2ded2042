use rust_decimal::Decimal;
use url::Url;

use crate::cause::Cause;

#[derive(Clone, Debug, serde::Deserialize)]
pub struct Bank {
    pub api_token: String,
    #[serde(default)]
    pub base_url: Option<Url>,
    #[serde(default)]
    pub version: Option<String>,
}

#[derive(Clone, Debug, serde::Deserialize)]
pub struct Charity {
    pub api_key: String,
    #[serde(default)]
    pub endpoint: Option<Url>,
}

/// Knobs the original service hardcoded, exposed so runs can be made
/// deterministic.
#[derive(Clone, Debug, serde::Deserialize)]
#[serde(default)]
pub struct Donation {
    /// The single currency eligible for round-ups.
    pub currency: String,
    /// The cause used on the donation path.
    pub cause: Cause,
    /// Search term used on the advice path.
    pub advice_search_term: String,
    /// How many charities to fetch per lookup.
    pub charity_limit: u32,
    /// Fixed round-up limit; when unset one is drawn from the standard set.
    pub round_up_limit: Option<Decimal>,
}

impl Default for Donation {
    fn default() -> Self {
        Self {
            currency: "GBP".to_owned(),
            cause: Cause::Random,
            advice_search_term: "Frontline Debt Advice".to_owned(),
            charity_limit: 1,
            round_up_limit: None,
        }
    }
}

#[derive(Clone, Debug, serde::Deserialize)]
pub struct Config {
    pub bank: Bank,
    pub charity: Charity,
    #[serde(default)]
    pub donation: Donation,
}

#[cfg(test)]
mod test {
    use figment::{
        providers::{Format, Toml},
        Figment,
    };
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn minimal_config_fills_in_defaults() {
        let config = Figment::new()
            .merge(Toml::string(
                r#"
                [bank]
                api_token = "token"

                [charity]
                api_key = "key"
                "#,
            ))
            .extract::<Config>()
            .unwrap();

        assert_eq!(config.bank.base_url, None);
        assert_eq!(config.donation.currency, "GBP");
        assert_eq!(config.donation.cause, Cause::Random);
        assert_eq!(config.donation.advice_search_term, "Frontline Debt Advice");
        assert_eq!(config.donation.charity_limit, 1);
        assert_eq!(config.donation.round_up_limit, None);
    }

    #[test]
    fn unknown_cause_reports_the_unrecognised_value() {
        let err = Figment::new()
            .merge(Toml::string(
                r#"
                [bank]
                api_token = "token"

                [charity]
                api_key = "key"

                [donation]
                cause = "world peace"
                "#,
            ))
            .extract::<Config>()
            .unwrap_err();

        assert!(err
            .to_string()
            .contains("unrecognised charity cause `world peace`"));
    }

    #[test]
    fn donation_knobs_are_overridable() {
        let config = Figment::new()
            .merge(Toml::string(
                r#"
                [bank]
                api_token = "token"

                [charity]
                api_key = "key"

                [donation]
                cause = "animal_welfare"
                round_up_limit = 0.5
                charity_limit = 3
                "#,
            ))
            .extract::<Config>()
            .unwrap();

        assert_eq!(config.donation.cause, Cause::AnimalWelfare);
        assert_eq!(
            config.donation.round_up_limit,
            Some(Decimal::new(5, 1))
        );
        assert_eq!(config.donation.charity_limit, 3);
    }
}
