use nutype::nutype;
use reqwest::{header::AUTHORIZATION, StatusCode};
use tracing::debug;
use url::Url;

use crate::{model::Charity, Error, Result};

pub const SERVICE: &str = "charity search api";

mod payload {
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Deserialize)]
    pub struct Response {
        #[serde(default)]
        pub data: Option<Data>,
        #[serde(default)]
        pub errors: Option<Vec<GraphQlError>>,
    }

    #[derive(Debug, Clone, PartialEq, Deserialize)]
    pub struct GraphQlError {
        pub message: String,
    }

    #[derive(Debug, Clone, PartialEq, Deserialize)]
    pub struct Data {
        #[serde(rename = "CHC")]
        pub chc: Chc,
    }

    #[derive(Debug, Clone, PartialEq, Deserialize)]
    pub struct Chc {
        #[serde(rename = "getCharities")]
        pub get_charities: GetCharities,
    }

    #[derive(Debug, Clone, PartialEq, Deserialize)]
    pub struct GetCharities {
        pub count: u64,
        pub list: Vec<CharityResource>,
    }

    #[derive(Debug, Clone, PartialEq, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CharityResource {
        pub org_ids: Vec<OrgId>,
        pub names: Vec<Name>,
        #[serde(default)]
        pub activities: Option<String>,
        #[serde(default)]
        pub geo: Option<Geo>,
    }

    #[derive(Debug, Clone, PartialEq, Deserialize)]
    pub struct OrgId {
        pub id: String,
    }

    #[derive(Debug, Clone, PartialEq, Deserialize)]
    pub struct Name {
        pub value: String,
    }

    #[derive(Debug, Clone, PartialEq, Deserialize)]
    pub struct Geo {
        #[serde(default)]
        pub region: Option<String>,
    }
}

#[nutype(derive(Debug, Clone, AsRef, TryFrom), validate(not_empty))]
pub struct ApiKey(String);

/// Client for the charity-search GraphQL service. The query travels inline on
/// a GET request, matching the service's public API portal.
#[derive(Debug, Clone, derive_builder::Builder)]
#[builder(pattern = "owned", setter(into))]
pub struct Client {
    api_key: ApiKey,
    #[builder(default = "Client::default_endpoint()")]
    endpoint: Url,
    #[builder(setter(skip), default = "reqwest::Client::new()")]
    http_client: reqwest::Client,
}

#[derive(Debug, Clone, derive_builder::Builder)]
#[builder(pattern = "owned", setter(into), build_fn(private))]
pub struct FindCharitiesParams<'a> {
    #[builder(private)]
    client: &'a Client,
    search_term: String,
    /// Upper bound on the number of charities returned, in upstream relevance
    /// order.
    #[builder(default = "1")]
    limit: u32,
}

impl Client {
    const DEFAULT_ENDPOINT: &'static str = "https://charitybase.uk/api/graphql";

    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    fn default_endpoint() -> Url {
        // Statically known to parse.
        Url::parse(Self::DEFAULT_ENDPOINT).unwrap()
    }

    pub fn find_charities(&self) -> FindCharitiesParamsBuilder<'_> {
        FindCharitiesParamsBuilder::default().client(self)
    }
}

impl<'a> FindCharitiesParamsBuilder<'a> {
    pub async fn send(self) -> Result<Vec<Charity>> {
        let params = self.build().map_err(|e| Error::Config(e.to_string()))?;
        let search_term = params.search_term.trim();
        if search_term.is_empty() {
            return Err(Error::EmptySearchTerm);
        }

        let query = search_query(search_term, params.limit);
        debug!("searching charities with `{query}`");

        let response = params
            .client
            .http_client
            .get(params.client.endpoint.clone())
            .header(
                AUTHORIZATION,
                format!("Apikey {}", params.client.api_key.as_ref()),
            )
            .query(&[("query", query.as_str())])
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

        let body = response.error_for_status()?.text().await?;
        parse_charities(&body)
    }
}

fn search_query(search_term: &str, limit: u32) -> String {
    format!(
        "{{CHC{{getCharities(filters:{{search:\"{search_term}\"}})\
         {{count list(limit: {limit}){{orgIds{{id}} names{{value}} activities geo{{region}}}}}}}}}}"
    )
}

fn parse_charities(body: &str) -> Result<Vec<Charity>> {
    let response =
        serde_json::from_str::<payload::Response>(body).map_err(|e| Error::MalformedResponse {
            service: SERVICE,
            detail: e.to_string(),
        })?;

    let data = match response.data {
        Some(data) => data,
        None => {
            let detail = match response.errors {
                Some(errors) => errors
                    .into_iter()
                    .map(|e| e.message)
                    .collect::<Vec<_>>()
                    .join("; "),
                None => "response carries neither `data` nor `errors`".to_owned(),
            };
            return Err(Error::MalformedResponse {
                service: SERVICE,
                detail,
            });
        }
    };

    data.chc
        .get_charities
        .list
        .into_iter()
        .map(to_charity)
        .collect()
}

fn to_charity(value: payload::CharityResource) -> Result<Charity> {
    let id = value
        .org_ids
        .into_iter()
        .next()
        .map(|org_id| org_id.id)
        .ok_or_else(|| Error::MalformedResponse {
            service: SERVICE,
            detail: "charity item has no `orgIds` entry".to_owned(),
        })?;
    let name = value
        .names
        .into_iter()
        .next()
        .map(|name| name.value)
        .ok_or_else(|| Error::MalformedResponse {
            service: SERVICE,
            detail: "charity item has no `names` entry".to_owned(),
        })?;

    Ok(Charity {
        id,
        name,
        activities: value.activities,
        region: value.geo.and_then(|geo| geo.region),
    })
}
