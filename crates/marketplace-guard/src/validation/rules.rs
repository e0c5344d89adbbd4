use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::domain::ThreatKind;
use super::password::PasswordPolicy;
use super::patterns::PatternKind;
use crate::config::ValidationSettings;

/// Raised when a rule, pattern, or threat table cannot back an engine.
#[derive(Debug, thiserror::Error)]
pub enum RuleConfigError {
    #[error("pattern '{name}' does not compile: {source}")]
    Pattern {
        name: String,
        #[source]
        source: regex::Error,
    },
    #[error("threat pattern for {kind} does not compile: {source}")]
    Threat {
        kind: ThreatKind,
        #[source]
        source: regex::Error,
    },
    #[error("pattern table is missing an entry for {0:?}")]
    MissingPattern(PatternKind),
    #[error("{entity} requires '{field}' but no rule describes it")]
    UnknownRequiredField { entity: EntityKind, field: String },
    #[error("{entity}.{field} has a lower bound above its upper bound")]
    InvertedBounds { entity: EntityKind, field: String },
    #[error("{entity}.{field} is a choice field with no allowed values")]
    EmptyChoice { entity: EntityKind, field: String },
    #[error("invalid rule setting: {0}")]
    InvalidSetting(String),
}

/// Entity kinds the engine knows how to validate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    User,
    Job,
    Application,
    Company,
}

impl EntityKind {
    pub const ALL: [EntityKind; 4] = [
        EntityKind::User,
        EntityKind::Job,
        EntityKind::Application,
        EntityKind::Company,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            EntityKind::User => "user",
            EntityKind::Job => "job",
            EntityKind::Application => "application",
            EntityKind::Company => "company",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "user" => Ok(EntityKind::User),
            "job" => Ok(EntityKind::Job),
            "application" => Ok(EntityKind::Application),
            "company" => Ok(EntityKind::Company),
            other => Err(format!("unknown entity type '{other}'")),
        }
    }
}

/// How a field's value is interpreted beyond plain length bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FieldFormat {
    #[default]
    Text,
    Choice,
    Email,
    Phone,
    PostalCode,
    TaxId,
    CompanyId,
    StreetAddress,
    Url,
    Number,
    /// Calendar year bounded above by the current year.
    Year,
    /// RFC 3339 timestamp or `YYYY-MM-DD` date.
    Date,
    Password,
}

impl FieldFormat {
    pub const fn pattern_kind(self) -> Option<PatternKind> {
        match self {
            FieldFormat::Email => Some(PatternKind::Email),
            FieldFormat::Phone => Some(PatternKind::Phone),
            FieldFormat::PostalCode => Some(PatternKind::PostalCode),
            FieldFormat::TaxId => Some(PatternKind::TaxId),
            FieldFormat::CompanyId => Some(PatternKind::CompanyId),
            FieldFormat::StreetAddress => Some(PatternKind::StreetAddress),
            _ => None,
        }
    }

    /// Values the sanitizer must never rewrite.
    pub const fn is_verbatim(self) -> bool {
        matches!(self, FieldFormat::Password)
    }
}

/// Constraint attached to one input key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldRule {
    pub name: String,
    #[serde(default)]
    pub format: FieldFormat,
    #[serde(default)]
    pub min_length: Option<usize>,
    #[serde(default)]
    pub max_length: Option<usize>,
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    #[serde(default)]
    pub allowed: Vec<String>,
    #[serde(default)]
    pub allow_html: bool,
}

impl FieldRule {
    fn base(name: &str, format: FieldFormat) -> Self {
        Self {
            name: name.to_string(),
            format,
            min_length: None,
            max_length: None,
            min: None,
            max: None,
            allowed: Vec::new(),
            allow_html: false,
        }
    }

    pub fn text(name: &str, min_length: usize, max_length: usize) -> Self {
        Self::base(name, FieldFormat::Text).lengths(Some(min_length), Some(max_length))
    }

    pub fn formatted(name: &str, format: FieldFormat) -> Self {
        Self::base(name, format)
    }

    pub fn number(name: &str, min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
            ..Self::base(name, FieldFormat::Number)
        }
    }

    pub fn choice(name: &str, allowed: &[&str]) -> Self {
        Self {
            allowed: allowed.iter().map(|value| value.to_string()).collect(),
            ..Self::base(name, FieldFormat::Choice)
        }
    }

    pub fn lengths(mut self, min_length: Option<usize>, max_length: Option<usize>) -> Self {
        self.min_length = min_length;
        self.max_length = max_length;
        self
    }

    pub fn with_html(mut self) -> Self {
        self.allow_html = true;
        self
    }

    fn bounds_inverted(&self) -> bool {
        let lengths = matches!((self.min_length, self.max_length), (Some(lo), Some(hi)) if lo > hi);
        let numbers = matches!((self.min, self.max), (Some(lo), Some(hi)) if lo > hi);
        lengths || numbers
    }
}

/// Ordered rule set for one entity. Field order is the order errors are reported in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRules {
    pub required: Vec<String>,
    pub fields: Vec<FieldRule>,
}

impl EntityRules {
    fn new(required: &[&str], fields: Vec<FieldRule>) -> Self {
        Self {
            required: required.iter().map(|name| name.to_string()).collect(),
            fields,
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldRule> {
        self.fields.iter().find(|rule| rule.name == name)
    }

    fn verify(&self, entity: EntityKind) -> Result<(), RuleConfigError> {
        for name in &self.required {
            if self.field(name).is_none() {
                return Err(RuleConfigError::UnknownRequiredField {
                    entity,
                    field: name.clone(),
                });
            }
        }

        for rule in &self.fields {
            if rule.bounds_inverted() {
                return Err(RuleConfigError::InvertedBounds {
                    entity,
                    field: rule.name.clone(),
                });
            }
            if rule.format == FieldFormat::Choice && rule.allowed.is_empty() {
                return Err(RuleConfigError::EmptyChoice {
                    entity,
                    field: rule.name.clone(),
                });
            }
        }

        Ok(())
    }
}

pub const DEFAULT_MAX_TEXT_LENGTH: usize = 500;
pub const DEFAULT_MAX_DEADLINE_DAYS: i64 = 90;
pub const EARLIEST_FOUNDED_YEAR: f64 = 1800.0;

pub const USER_TYPES: [&str; 3] = ["job_seeker", "employer", "admin"];
pub const JOB_TYPES: [&str; 6] = [
    "full-time",
    "part-time",
    "contract",
    "temporary",
    "internship",
    "casual",
];
pub const DISPOSABLE_EMAIL_DOMAINS: [&str; 5] = [
    "10minutemail.com",
    "tempmail.org",
    "guerrillamail.com",
    "mailinator.com",
    "throwaway.email",
];

/// Read-only rule table backing every entity validator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessRules {
    pub user: EntityRules,
    pub job: EntityRules,
    pub application: EntityRules,
    pub company: EntityRules,
    pub disposable_email_domains: Vec<String>,
    pub max_deadline_days: i64,
    pub default_max_length: usize,
    pub password: PasswordPolicy,
}

impl BusinessRules {
    pub fn standard() -> Self {
        let user = EntityRules::new(
            &["firstName", "lastName", "email", "userType"],
            vec![
                FieldRule::text("firstName", 2, 50),
                FieldRule::text("lastName", 2, 50),
                FieldRule::formatted("email", FieldFormat::Email).lengths(None, Some(254)),
                FieldRule::formatted("phone", FieldFormat::Phone).lengths(None, Some(20)),
                FieldRule::text("bio", 0, 500),
                FieldRule::number("age", 16.0, 120.0),
                FieldRule::choice("userType", &USER_TYPES),
                FieldRule::formatted("password", FieldFormat::Password).lengths(None, Some(128)),
            ],
        );

        let job = EntityRules::new(
            &["title", "company", "description", "location", "type"],
            vec![
                FieldRule::text("title", 5, 100),
                FieldRule::text("company", 2, 100),
                FieldRule::text("description", 50, 5000).with_html(),
                FieldRule::text("location", 2, 100),
                FieldRule::choice("type", &JOB_TYPES),
                FieldRule::number("salaryMin", 0.0, 1_000_000.0),
                FieldRule::number("salaryMax", 0.0, 1_000_000.0),
                FieldRule::formatted("applicationDeadline", FieldFormat::Date),
            ],
        );

        let application = EntityRules::new(
            &["jobId", "candidateName", "candidateEmail"],
            vec![
                FieldRule::text("jobId", 1, 64),
                FieldRule::text("candidateName", 2, 100),
                FieldRule::formatted("candidateEmail", FieldFormat::Email)
                    .lengths(None, Some(254)),
                FieldRule::formatted("candidatePhone", FieldFormat::Phone).lengths(None, Some(20)),
                FieldRule::text("coverLetter", 50, 2000),
                FieldRule::text("experience", 0, 2000),
            ],
        );

        let company = EntityRules::new(
            &["name", "industry"],
            vec![
                FieldRule::text("name", 2, 100),
                FieldRule::text("industry", 2, 50),
                FieldRule::text("description", 0, 2000),
                FieldRule::formatted("website", FieldFormat::Url).lengths(None, Some(2048)),
                FieldRule::formatted("email", FieldFormat::Email).lengths(None, Some(254)),
                FieldRule::formatted("phone", FieldFormat::Phone).lengths(None, Some(20)),
                FieldRule::formatted("address", FieldFormat::StreetAddress),
                FieldRule::formatted("postalCode", FieldFormat::PostalCode),
                FieldRule::formatted("companyNumber", FieldFormat::CompanyId),
                FieldRule::formatted("taxNumber", FieldFormat::TaxId),
                FieldRule::number("employeeCount", 1.0, 100_000.0),
                FieldRule {
                    min: Some(EARLIEST_FOUNDED_YEAR),
                    ..FieldRule::formatted("foundedYear", FieldFormat::Year)
                },
            ],
        );

        Self {
            user,
            job,
            application,
            company,
            disposable_email_domains: DISPOSABLE_EMAIL_DOMAINS
                .iter()
                .map(|domain| domain.to_string())
                .collect(),
            max_deadline_days: DEFAULT_MAX_DEADLINE_DAYS,
            default_max_length: DEFAULT_MAX_TEXT_LENGTH,
            password: PasswordPolicy::default(),
        }
    }

    /// Standard table with the deployment overrides applied.
    pub fn from_settings(settings: &ValidationSettings) -> Self {
        let mut rules = Self::standard();
        rules.max_deadline_days = settings.max_deadline_days;
        rules.default_max_length = settings.max_text_length;
        if let Some(domains) = &settings.disposable_domains {
            rules.disposable_email_domains = domains.clone();
        }
        rules
    }

    pub fn entity(&self, kind: EntityKind) -> &EntityRules {
        match kind {
            EntityKind::User => &self.user,
            EntityKind::Job => &self.job,
            EntityKind::Application => &self.application,
            EntityKind::Company => &self.company,
        }
    }

    /// Sanitizer clamp for a field; text without an explicit bound uses the default.
    pub fn max_length_for(&self, rule: &FieldRule) -> usize {
        rule.max_length.unwrap_or(self.default_max_length)
    }

    pub fn is_disposable_domain(&self, domain: &str) -> bool {
        self.disposable_email_domains
            .iter()
            .any(|listed| listed.eq_ignore_ascii_case(domain))
    }

    pub fn verify(&self) -> Result<(), RuleConfigError> {
        for kind in EntityKind::ALL {
            self.entity(kind).verify(kind)?;
        }

        if self.max_deadline_days <= 0 {
            return Err(RuleConfigError::InvalidSetting(
                "max_deadline_days must be positive".to_string(),
            ));
        }
        if self.default_max_length == 0 {
            return Err(RuleConfigError::InvalidSetting(
                "default_max_length must be positive".to_string(),
            ));
        }
        if self.password.min_length == 0 {
            return Err(RuleConfigError::InvalidSetting(
                "password min_length must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for BusinessRules {
    fn default() -> Self {
        Self::standard()
    }
}
