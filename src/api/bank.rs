use nutype::nutype;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::{
    model::{Account, Transaction, TransactionStatus},
    Error, Result,
};

pub const SERVICE: &str = "bank api";

mod payload {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, PartialEq, Deserialize)]
    pub struct Accounts {
        #[serde(rename = "Accounts")]
        pub accounts: Vec<AccountResource>,
    }

    #[derive(Debug, Clone, PartialEq, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct AccountResource {
        pub account_id: String,
        pub risk_score: i64,
        pub home_address: String,
    }

    #[derive(Debug, Clone, PartialEq, Deserialize)]
    pub struct CreatedTransactions {
        #[serde(rename = "Transactions")]
        pub transactions: Vec<CreatedTransaction>,
    }

    #[derive(Debug, Clone, PartialEq, Deserialize)]
    pub struct CreatedTransaction {
        #[serde(rename = "transactionUUID")]
        pub transaction_uuid: String,
    }

    #[derive(Debug, Clone, PartialEq, Deserialize)]
    pub struct TransactionResource {
        pub status: String,
        pub currency: String,
        pub amount: rust_decimal::Decimal,
    }

    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub struct CreateTransactions {
        pub quantity: String,
    }
}

#[nutype(derive(Debug, Clone, AsRef, TryFrom), validate(not_empty))]
pub struct ApiToken(String);

/// Client for the account/transaction REST service. Auth is a bearer token
/// plus a `version` header on every request.
#[derive(Debug, Clone, derive_builder::Builder)]
#[builder(pattern = "owned", setter(into))]
pub struct Client {
    api_token: ApiToken,
    #[builder(default = "Client::default_base_url()")]
    base_url: Url,
    #[builder(default = "String::from(\"1.0\")")]
    version: String,
    #[builder(setter(skip), default = "reqwest::Client::new()")]
    http_client: reqwest::Client,
}

impl Client {
    const DEFAULT_BASE_URL: &'static str =
        "https://sandbox.capitalone.co.uk/developer-services-platform-pr/api/data/";

    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    fn default_base_url() -> Url {
        // Statically known to parse.
        Url::parse(Self::DEFAULT_BASE_URL).unwrap()
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    pub async fn get_accounts(&self) -> Result<Vec<Account>> {
        let body = self
            .send(self.http_client.get(self.endpoint("accounts")?))
            .await?;
        let accounts = parse::<payload::Accounts>(&body)?;
        Ok(accounts.accounts.into_iter().map(Account::from).collect())
    }

    pub async fn get_account(&self, account_id: &str) -> Result<Account> {
        let body = self
            .send(
                self.http_client
                    .get(self.endpoint(&format!("accounts/{account_id}"))?),
            )
            .await?;
        let accounts = parse::<payload::Accounts>(&body)?;
        accounts
            .accounts
            .into_iter()
            .next()
            .map(Account::from)
            .ok_or_else(|| Error::MalformedResponse {
                service: SERVICE,
                detail: format!("no account returned for `{account_id}`"),
            })
    }

    /// Creates one sandbox transaction on the account and returns its id.
    pub async fn create_transaction(&self, account_id: &str) -> Result<String> {
        let body = self
            .send(
                self.http_client
                    .post(self.endpoint(&format!("transactions/accounts/{account_id}/create"))?)
                    .json(&payload::CreateTransactions {
                        quantity: "1".to_owned(),
                    }),
            )
            .await?;
        let created = parse::<payload::CreatedTransactions>(&body)?;
        created
            .transactions
            .into_iter()
            .next()
            .map(|transaction| transaction.transaction_uuid)
            .ok_or_else(|| Error::MalformedResponse {
                service: SERVICE,
                detail: "no transactions were created".to_owned(),
            })
    }

    pub async fn get_transaction(
        &self,
        account_id: &str,
        transaction_id: &str,
    ) -> Result<Transaction> {
        let body = self
            .send(self.http_client.get(self.endpoint(&format!(
                "transactions/accounts/{account_id}/transactions/{transaction_id}"
            ))?))
            .await?;
        let resource = parse::<payload::TransactionResource>(&body)?;
        Ok(to_transaction(transaction_id, resource))
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<String> {
        let response = request
            .bearer_auth(self.api_token.as_ref())
            .header("version", &self.version)
            .send()
            .await?;

        let status = response.status();
        debug!("{SERVICE} responded with {status}");
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(Error::Auth {
                service: SERVICE,
                status,
            });
        }

        Ok(response.error_for_status()?.text().await?)
    }
}

fn parse<T: DeserializeOwned>(body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| Error::MalformedResponse {
        service: SERVICE,
        detail: e.to_string(),
    })
}

impl From<payload::AccountResource> for Account {
    fn from(value: payload::AccountResource) -> Self {
        Account {
            id: value.account_id,
            risk_score: value.risk_score,
            home_address: value.home_address,
        }
    }
}

fn to_transaction(transaction_id: &str, value: payload::TransactionResource) -> Transaction {
    Transaction {
        id: transaction_id.to_owned(),
        status: TransactionStatus::from(value.status.as_str()),
        currency: value.currency,
        amount: value.amount,
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    use super::*;

    #[test]
    fn parses_accounts() {
        let body = r#"
        {
          "Accounts": [
            {
              "accountId": "12345678",
              "firstname": "Janet",
              "riskScore": 40,
              "homeAddress": "123 Main St, Springfield, UK",
              "balance": 1000.0
            },
            {
              "accountId": "87654321",
              "firstname": "Bethany",
              "riskScore": 88,
              "homeAddress": "10 High St, Shelbyville, UK",
              "balance": -20.0
            }
          ]
        }"#;

        let accounts = parse::<payload::Accounts>(body).unwrap();
        let accounts = accounts
            .accounts
            .into_iter()
            .map(Account::from)
            .collect::<Vec<_>>();

        assert_eq!(
            accounts,
            vec![
                Account {
                    id: "12345678".to_owned(),
                    risk_score: 40,
                    home_address: "123 Main St, Springfield, UK".to_owned(),
                },
                Account {
                    id: "87654321".to_owned(),
                    risk_score: 88,
                    home_address: "10 High St, Shelbyville, UK".to_owned(),
                },
            ]
        );
    }

    #[test]
    fn missing_risk_score_is_malformed() {
        let body = r#"
        {
          "Accounts": [
            {
              "accountId": "12345678",
              "homeAddress": "123 Main St, Springfield, UK"
            }
          ]
        }"#;

        let err = parse::<payload::Accounts>(body).unwrap_err();
        assert!(matches!(err, Error::MalformedResponse { .. }));
    }

    #[test]
    fn parses_created_transaction_id() {
        let body = r#"
        {
          "Transactions": [
            { "transactionUUID": "9e219e46-a0be-4bf0-a970-50ee5f2f0813" }
          ]
        }"#;

        let created = parse::<payload::CreatedTransactions>(body).unwrap();
        assert_eq!(
            created.transactions[0].transaction_uuid,
            "9e219e46-a0be-4bf0-a970-50ee5f2f0813"
        );
    }

    #[test]
    fn parses_transaction() {
        let body = r#"
        {
          "transactionUUID": "9e219e46-a0be-4bf0-a970-50ee5f2f0813",
          "status": "Successful",
          "currency": "GBP",
          "amount": 4.35,
          "merchant": { "name": "Corner Shop" }
        }"#;

        let resource = parse::<payload::TransactionResource>(body).unwrap();
        let transaction = to_transaction("9e219e46-a0be-4bf0-a970-50ee5f2f0813", resource);

        assert_eq!(
            transaction,
            Transaction {
                id: "9e219e46-a0be-4bf0-a970-50ee5f2f0813".to_owned(),
                status: TransactionStatus::Successful,
                currency: "GBP".to_owned(),
                amount: Decimal::from_str("4.35").unwrap(),
            }
        );
    }

    #[test]
    fn unknown_status_is_kept_raw() {
        let body = r#"{ "status": "Declined", "currency": "GBP", "amount": 1.0 }"#;

        let resource = parse::<payload::TransactionResource>(body).unwrap();
        let transaction = to_transaction("tx", resource);
        assert_eq!(
            transaction.status,
            TransactionStatus::Other("Declined".to_owned())
        );
    }
}
