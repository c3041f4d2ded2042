pub mod api;
pub mod cause;
pub mod cli;
pub mod config;
pub mod error;
pub mod model;

use std::{fmt, str::FromStr};

use money2::{Currency, Money};
use rand::Rng;
use tracing::{debug, info};

use crate::api::{bank, charity};
pub use crate::{
    cause::Cause,
    config::Config,
    error::{Error, Result},
    model::{Account, Charity, CustomerKind, Transaction},
};

/// Round-up limits offered to donators, in pence. One is drawn uniformly per
/// run unless the config pins a fixed limit.
const ROUND_UP_LIMITS_PENCE: [i64; 12] = [1, 2, 5, 10, 20, 30, 40, 50, 60, 70, 80, 90];

/// Terminal state of a single run. Every path through the pipeline lands on
/// exactly one of these.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    DonationMade {
        amount: Money,
        search_term: String,
        charities: Vec<Charity>,
    },
    NoDonation {
        amount: Money,
        limit: Money,
    },
    Ineligible,
    AdviceGiven {
        charities: Vec<Charity>,
    },
}

/// The donation-path decision, separated from the orchestration so it can be
/// tested without any remote service.
#[derive(Debug, Clone, PartialEq)]
pub enum DonationDecision {
    Donate(Money),
    OverLimit { amount: Money, limit: Money },
    Ineligible,
}

pub fn decide(round_up: Option<Money>, limit: &Money) -> DonationDecision {
    match round_up {
        None => DonationDecision::Ineligible,
        Some(amount) if amount.amount < limit.amount => DonationDecision::Donate(amount),
        Some(amount) => DonationDecision::OverLimit {
            amount,
            limit: limit.clone(),
        },
    }
}

pub fn draw_round_up_limit(
    config: &Config,
    rng: &mut impl Rng,
    currency: Currency,
) -> Money {
    match config.donation.round_up_limit {
        Some(limit) => Money {
            amount: limit,
            currency,
        },
        None => {
            let pence = ROUND_UP_LIMITS_PENCE[rng.gen_range(0..ROUND_UP_LIMITS_PENCE.len())];
            Money::new(pence, 2, currency)
        }
    }
}

fn home_currency(config: &Config) -> Result<Currency> {
    Currency::from_str(&config.donation.currency).map_err(|e| {
        Error::Config(format!(
            "unsupported home currency `{}`: {e}",
            config.donation.currency
        ))
    })
}

fn bank_client(config: &Config) -> Result<bank::Client> {
    let api_token = bank::ApiToken::try_new(config.bank.api_token.clone())
        .map_err(|e| Error::Config(format!("bank api token: {e}")))?;

    let mut builder = bank::Client::builder().api_token(api_token);
    if let Some(base_url) = &config.bank.base_url {
        builder = builder.base_url(base_url.clone());
    }
    if let Some(version) = &config.bank.version {
        builder = builder.version(version.clone());
    }
    builder.build().map_err(|e| Error::Config(e.to_string()))
}

fn charity_client(config: &Config) -> Result<charity::Client> {
    let api_key = charity::ApiKey::try_new(config.charity.api_key.clone())
        .map_err(|e| Error::Config(format!("charity api key: {e}")))?;

    let mut builder = charity::Client::builder().api_key(api_key);
    if let Some(endpoint) = &config.charity.endpoint {
        builder = builder.endpoint(endpoint.clone());
    }
    builder.build().map_err(|e| Error::Config(e.to_string()))
}

pub async fn fetch_accounts(config: &Config) -> Result<Vec<Account>> {
    bank_client(config)?.get_accounts().await
}

pub async fn fetch_account(config: &Config, account_id: &str) -> Result<Account> {
    bank_client(config)?.get_account(account_id).await
}

pub async fn create_transaction(config: &Config, account_id: &str) -> Result<String> {
    bank_client(config)?.create_transaction(account_id).await
}

pub async fn fetch_transaction(
    config: &Config,
    account_id: &str,
    transaction_id: &str,
) -> Result<Transaction> {
    bank_client(config)?
        .get_transaction(account_id, transaction_id)
        .await
}

pub async fn find_charities(
    config: &Config,
    search_term: &str,
    limit: u32,
) -> Result<Vec<Charity>> {
    charity_client(config)?
        .find_charities()
        .search_term(search_term)
        .limit(limit)
        .send()
        .await
}

/// Runs the whole pipeline once: fetch account, create and fetch a
/// transaction, classify risk, then either the donation or the advice path.
/// Any upstream failure aborts the run.
pub async fn run_once(config: &Config, account_id: Option<&str>) -> Result<Outcome> {
    let bank = bank_client(config)?;
    let charity = charity_client(config)?;
    let home = home_currency(config)?;

    let account = match account_id {
        Some(account_id) => bank.get_account(account_id).await?,
        None => bank
            .get_accounts()
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::MalformedResponse {
                service: bank::SERVICE,
                detail: "account service returned no accounts".to_owned(),
            })?,
    };
    let kind = account.customer_kind();
    let customer_area = account.customer_area()?;
    info!(
        "account `{}` has risk score {}, customer is a {kind}",
        account.id, account.risk_score
    );

    let transaction_id = bank.create_transaction(&account.id).await?;
    let transaction = bank.get_transaction(&account.id, &transaction_id).await?;
    debug!("fetched transaction {transaction:?}");

    match kind {
        CustomerKind::Advisee => {
            let charities = charity
                .find_charities()
                .search_term(config.donation.advice_search_term.clone())
                .limit(config.donation.charity_limit)
                .send()
                .await?;
            Ok(Outcome::AdviceGiven { charities })
        }
        CustomerKind::Donator => {
            let mut rng = rand::thread_rng();
            let limit = draw_round_up_limit(config, &mut rng, home);
            info!("round-up limit for this run is {limit}");

            match decide(transaction.round_up(home), &limit) {
                DonationDecision::Ineligible => {
                    info!(
                        "transaction `{}` is not eligible: status {:?}, currency {}",
                        transaction.id, transaction.status, transaction.currency
                    );
                    Ok(Outcome::Ineligible)
                }
                DonationDecision::OverLimit { amount, limit } => {
                    Ok(Outcome::NoDonation { amount, limit })
                }
                DonationDecision::Donate(amount) => {
                    let search_term = config
                        .donation
                        .cause
                        .search_term(&mut rng, &customer_area);
                    info!("chosen charitable cause search term is `{search_term}`");

                    let charities = charity
                        .find_charities()
                        .search_term(search_term.clone())
                        .limit(config.donation.charity_limit)
                        .send()
                        .await?;
                    Ok(Outcome::DonationMade {
                        amount,
                        search_term,
                        charities,
                    })
                }
            }
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::DonationMade {
                amount,
                search_term,
                charities,
            } => {
                writeln!(f, "Donating {amount} to the `{search_term}` cause.")?;
                if charities.is_empty() {
                    write!(f, "No charity matched the search term.")
                } else {
                    for charity in charities {
                        writeln!(f, "\n{charity}")?;
                    }
                    Ok(())
                }
            }
            Outcome::NoDonation { amount, limit } => write!(
                f,
                "No donation made: possible donation {amount} is over the round-up limit {limit}."
            ),
            Outcome::Ineligible => write!(
                f,
                "No donation made: the transaction is not settled or not in the home currency."
            ),
            Outcome::AdviceGiven { charities } => {
                writeln!(f, "Debt advice services that may help:")?;
                for charity in charities {
                    writeln!(f, "\n{charity}")?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod test {
    use figment::{
        providers::{Format, Toml},
        Figment,
    };
    use money2::Currency;
    use pretty_assertions::assert_eq;
    use rand::{rngs::StdRng, SeedableRng};
    use rust_decimal::{prelude::ToPrimitive, Decimal};

    use super::*;
    use crate::model::TransactionStatus;

    fn config(donation: &str) -> Config {
        Figment::new()
            .merge(Toml::string(&format!(
                r#"
                [bank]
                api_token = "token"

                [charity]
                api_key = "key"

                [donation]
                {donation}
                "#
            )))
            .extract::<Config>()
            .unwrap()
    }

    fn settled_gbp(amount: &str) -> Transaction {
        Transaction {
            id: "9e219e46-a0be-4bf0-a970-50ee5f2f0813".to_owned(),
            status: TransactionStatus::Successful,
            currency: "GBP".to_owned(),
            amount: amount.parse::<Decimal>().unwrap(),
        }
    }

    #[test]
    fn donation_proceeds_below_the_limit() {
        // Amount 4.35 leaves a 0.65 round-up, under a 0.70 limit.
        let round_up = settled_gbp("4.35").round_up(Currency::Gbp);
        let limit = Money::new(70, 2, Currency::Gbp);

        assert_eq!(
            decide(round_up, &limit),
            DonationDecision::Donate(Money::new(65, 2, Currency::Gbp))
        );
    }

    #[test]
    fn donation_is_withheld_at_or_over_the_limit() {
        let round_up = settled_gbp("4.35").round_up(Currency::Gbp);
        let limit = Money::new(50, 2, Currency::Gbp);

        assert_eq!(
            decide(round_up, &limit),
            DonationDecision::OverLimit {
                amount: Money::new(65, 2, Currency::Gbp),
                limit: Money::new(50, 2, Currency::Gbp),
            }
        );

        // The comparison is strict, so an exact match withholds too.
        let limit = Money::new(65, 2, Currency::Gbp);
        assert!(matches!(
            decide(settled_gbp("4.35").round_up(Currency::Gbp), &limit),
            DonationDecision::OverLimit { .. }
        ));
    }

    #[test]
    fn ineligible_transaction_never_donates() {
        let transaction = Transaction {
            currency: "USD".to_owned(),
            ..settled_gbp("4.35")
        };
        let limit = Money::new(90, 2, Currency::Gbp);

        assert_eq!(
            decide(transaction.round_up(Currency::Gbp), &limit),
            DonationDecision::Ineligible
        );
    }

    #[test]
    fn zero_round_up_still_donates() {
        let round_up = settled_gbp("12.00").round_up(Currency::Gbp);
        let limit = Money::new(1, 2, Currency::Gbp);

        assert_eq!(
            decide(round_up, &limit),
            DonationDecision::Donate(Money::new(0, 2, Currency::Gbp))
        );
    }

    #[test]
    fn drawn_limit_comes_from_the_fixed_set() {
        let config = config("");
        for seed in 0..32 {
            let mut rng = StdRng::seed_from_u64(seed);
            let limit = draw_round_up_limit(&config, &mut rng, Currency::Gbp);
            let pence = (limit.amount * Decimal::ONE_HUNDRED).round();
            assert!(
                ROUND_UP_LIMITS_PENCE.contains(&pence.to_i64().unwrap()),
                "unexpected limit {limit}"
            );
        }
    }

    #[test]
    fn configured_limit_overrides_the_draw() {
        let config = config("round_up_limit = 0.5");
        let mut rng = StdRng::seed_from_u64(0);
        let limit = draw_round_up_limit(&config, &mut rng, Currency::Gbp);
        assert_eq!(limit, Money::new(50, 2, Currency::Gbp));
    }
}
