//! Company profile as submitted by the form
//!
//! `CompanyInfo` mirrors the inbound JSON: every field optional, values may
//! arrive as strings or numbers. `CompanyProfile::try_from` is the one place
//! that checks the required fields are present.

use serde::{Deserialize, Deserializer, de::Error as _};
use serde_json::Value;

use super::ValidationError;

/// Raw `companyInfo` object from the request body
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyInfo {
    // Basic information
    #[serde(default, deserialize_with = "optional_text")]
    pub gics_group: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub company_name: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub years_in_business: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub location: Option<String>,

    // Financial & scale
    #[serde(default, deserialize_with = "optional_text")]
    pub team_size: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub capital: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub annual_revenue: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub num_clients: Option<String>,

    // Market position
    #[serde(default, deserialize_with = "optional_text")]
    pub products: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub target_market: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub competitors: Option<String>,

    // Impact & culture
    #[serde(default, deserialize_with = "optional_text")]
    pub social_impact: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub values: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub challenges: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub goals: Option<String>,

    #[serde(default, deserialize_with = "optional_text")]
    pub additional_info: Option<String>,
}

/// Validated profile handed to the prompt builder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyProfile {
    pub gics_group: String,
    pub company_name: Option<String>,
    pub years_in_business: Option<String>,
    pub location: Option<String>,

    pub team_size: String,
    pub capital: String,
    pub annual_revenue: Option<String>,
    pub num_clients: String,

    pub products: Option<String>,
    pub target_market: Option<String>,
    pub competitors: Option<String>,

    pub social_impact: String,
    pub values: Option<String>,
    pub challenges: Option<String>,
    pub goals: Option<String>,

    pub additional_info: Option<String>,
}

impl TryFrom<CompanyInfo> for CompanyProfile {
    type Error = ValidationError;

    fn try_from(info: CompanyInfo) -> Result<Self, Self::Error> {
        let mut missing = Vec::new();
        let mut required = |value: Option<String>, name: &'static str| {
            let value = present(value);
            if value.is_none() {
                missing.push(name);
            }
            value.unwrap_or_default()
        };

        let gics_group = required(info.gics_group, "gicsGroup");
        let team_size = required(info.team_size, "teamSize");
        let capital = required(info.capital, "capital");
        let num_clients = required(info.num_clients, "numClients");
        let social_impact = required(info.social_impact, "socialImpact");

        if !missing.is_empty() {
            return Err(ValidationError::MissingFields(missing));
        }

        Ok(Self {
            gics_group,
            company_name: present(info.company_name),
            years_in_business: present(info.years_in_business),
            location: present(info.location),
            team_size,
            capital,
            annual_revenue: present(info.annual_revenue),
            num_clients,
            products: present(info.products),
            target_market: present(info.target_market),
            competitors: present(info.competitors),
            social_impact,
            values: present(info.values),
            challenges: present(info.challenges),
            goals: present(info.goals),
            additional_info: present(info.additional_info),
        })
    }
}

/// Blank input counts as absent; anything else is kept as sent
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Accept a JSON string or number as text; `null` and missing keys are `None`
fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "expected a string or number, found {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
