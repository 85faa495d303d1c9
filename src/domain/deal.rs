use crate::domain::record::{Grouped, Identified, RecordKey, Regroupable, Searchable, Sortable};
use crate::domain::sorting::SortValue;
use crate::error::GridError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use uuid::Uuid;

/// Unique identifier for a deal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DealId(Uuid);

impl DealId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for DealId {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for DealId {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| GridError::InvalidRecordId(s.to_string()))
    }
}

impl fmt::Display for DealId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Pipeline stage of a deal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DealStage {
    EarlyStage,
    Qualified,
    Proposal,
    Negotiation,
    Won,
    Lost,
}

impl DealStage {
    /// Group key used on the pipeline board
    pub fn key(&self) -> &'static str {
        match self {
            Self::EarlyStage => "early-stage",
            Self::Qualified => "qualified",
            Self::Proposal => "proposal",
            Self::Negotiation => "negotiation",
            Self::Won => "won",
            Self::Lost => "lost",
        }
    }
}

impl FromStr for DealStage {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "early-stage" => Ok(Self::EarlyStage),
            "qualified" => Ok(Self::Qualified),
            "proposal" => Ok(Self::Proposal),
            "negotiation" => Ok(Self::Negotiation),
            "won" => Ok(Self::Won),
            "lost" => Ok(Self::Lost),
            _ => Err(GridError::InvalidStage(s.to_string())),
        }
    }
}

impl fmt::Display for DealStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EarlyStage => write!(f, "Early Stage"),
            Self::Qualified => write!(f, "Qualified"),
            Self::Proposal => write!(f, "Proposal"),
            Self::Negotiation => write!(f, "Negotiation"),
            Self::Won => write!(f, "Won"),
            Self::Lost => write!(f, "Lost"),
        }
    }
}

/// A sales opportunity tracked on the pipeline board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deal {
    pub id: DealId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    pub stage: DealStage,
    #[serde(default)]
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Deal {
    /// Creates a new early-stage deal
    pub fn new(name: impl Into<String>, amount: f64) -> Self {
        let now = Utc::now();
        Self {
            id: DealId::new(),
            name: name.into(),
            company: None,
            stage: DealStage::EarlyStage,
            amount,
            description: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_stage(mut self, stage: DealStage) -> Self {
        self.stage = stage;
        self
    }

    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }

    /// Moves the deal to another stage
    pub fn set_stage(&mut self, stage: DealStage) {
        self.stage = stage;
        self.updated_at = Utc::now();
    }

    pub fn set_description(&mut self, description: String) {
        self.description = Some(description);
        self.updated_at = Utc::now();
    }
}

impl Identified for Deal {
    fn id(&self) -> Option<RecordKey> {
        Some(RecordKey::new(self.id.to_string()))
    }
}

impl Grouped for Deal {
    fn group_key(&self) -> Option<String> {
        Some(self.stage.key().to_string())
    }

    fn amount(&self) -> Option<f64> {
        Some(self.amount)
    }
}

impl Regroupable for Deal {
    fn set_group_key(&mut self, key: &str) {
        match key.parse::<DealStage>() {
            Ok(stage) => self.set_stage(stage),
            Err(_) => tracing::warn!(deal = %self.id, key, "ignoring unknown deal stage"),
        }
    }
}

impl Sortable for Deal {
    fn sort_value(&self, key: &str) -> SortValue {
        match key {
            "name" => SortValue::from(self.name.as_str()),
            "company" => self.company.as_deref().into(),
            "stage" => SortValue::from(self.stage.key()),
            "amount" => SortValue::Number(self.amount),
            "created_at" => SortValue::Date(self.created_at),
            "updated_at" => SortValue::Date(self.updated_at),
            _ => SortValue::Null,
        }
    }
}

impl Searchable for Deal {
    fn matches(&self, needle: &str) -> bool {
        let contains = |text: &str| text.to_lowercase().contains(needle);
        contains(&self.name)
            || self.company.as_deref().map(contains).unwrap_or(false)
            || self.description.as_deref().map(contains).unwrap_or(false)
    }
}
