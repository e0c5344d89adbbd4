//! Typed views over the loosely typed records the engine validates.
//!
//! Callers that already hold structured data can build one of these instead of a raw
//! JSON map. Keys that are not modelled land in `extra`; validation never checks them
//! and only cleans their string values.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::domain::Record;

/// Named fields are written over `extra`, and absent ones are left out.
struct RecordBuilder(Record);

impl RecordBuilder {
    fn over(extra: Record) -> Self {
        Self(extra)
    }

    fn put<V: Into<Value>>(mut self, key: &str, value: Option<V>) -> Self {
        if let Some(value) = value {
            self.0.insert(key.to_string(), value.into());
        }
        self
    }

    fn build(self) -> Record {
        self.0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserForm {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(flatten, default)]
    pub extra: Record,
}

impl UserForm {
    pub fn into_record(self) -> Record {
        RecordBuilder::over(self.extra)
            .put("firstName", self.first_name)
            .put("lastName", self.last_name)
            .put("email", self.email)
            .put("phone", self.phone)
            .put("bio", self.bio)
            .put("age", self.age)
            .put("userType", self.user_type)
            .put("password", self.password)
            .build()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobForm {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub job_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary_min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary_max: Option<f64>,
    /// RFC 3339 timestamp or `YYYY-MM-DD`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_deadline: Option<String>,
    #[serde(flatten, default)]
    pub extra: Record,
}

impl JobForm {
    pub fn into_record(self) -> Record {
        RecordBuilder::over(self.extra)
            .put("title", self.title)
            .put("company", self.company)
            .put("description", self.description)
            .put("location", self.location)
            .put("type", self.job_type)
            .put("salaryMin", self.salary_min)
            .put("salaryMax", self.salary_max)
            .put("applicationDeadline", self.application_deadline)
            .build()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationForm {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidate_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidate_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidate_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_letter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,
    #[serde(flatten, default)]
    pub extra: Record,
}

impl ApplicationForm {
    pub fn into_record(self) -> Record {
        RecordBuilder::over(self.extra)
            .put("jobId", self.job_id)
            .put("candidateName", self.candidate_name)
            .put("candidateEmail", self.candidate_email)
            .put("candidatePhone", self.candidate_phone)
            .put("coverLetter", self.cover_letter)
            .put("experience", self.experience)
            .build()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyForm {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub founded_year: Option<i32>,
    #[serde(flatten, default)]
    pub extra: Record,
}

impl CompanyForm {
    pub fn into_record(self) -> Record {
        RecordBuilder::over(self.extra)
            .put("name", self.name)
            .put("industry", self.industry)
            .put("description", self.description)
            .put("website", self.website)
            .put("email", self.email)
            .put("phone", self.phone)
            .put("address", self.address)
            .put("postalCode", self.postal_code)
            .put("companyNumber", self.company_number)
            .put("taxNumber", self.tax_number)
            .put("employeeCount", self.employee_count)
            .put("foundedYear", self.founded_year)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn job_form_uses_wire_names() {
        let record = JobForm {
            title: Some("Rust Engineer".to_string()),
            job_type: Some("contract".to_string()),
            salary_min: Some(95000.0),
            ..JobForm::default()
        }
        .into_record();

        assert_eq!(record["type"], json!("contract"));
        assert_eq!(record["salaryMin"], json!(95000.0));
        assert!(!record.contains_key("salaryMax"));
    }

    #[test]
    fn unmodelled_keys_survive_the_round_trip() {
        let form: CompanyForm = serde_json::from_value(json!({
            "name": "Kauri Labs",
            "industry": "Software",
            "linkedin": "kauri-labs"
        }))
        .expect("company form parses");

        assert_eq!(form.name.as_deref(), Some("Kauri Labs"));
        let record = form.into_record();
        assert_eq!(record["linkedin"], json!("kauri-labs"));
    }

    #[test]
    fn record_keys_match_the_serialized_form() {
        let company = CompanyForm {
            name: Some("Kauri Labs".to_string()),
            industry: Some("Software".to_string()),
            description: Some("Payments tooling.".to_string()),
            website: Some("https://kauri.example.nz".to_string()),
            email: Some("hello@kauri.example.nz".to_string()),
            phone: Some("09 555 0100".to_string()),
            address: Some("12 Queen Street".to_string()),
            postal_code: Some("1010".to_string()),
            company_number: Some("1234567".to_string()),
            tax_number: Some("123-456-789".to_string()),
            employee_count: Some(40),
            founded_year: Some(2015),
            extra: Record::new(),
        };
        let serialized = serde_json::to_value(&company).expect("form serializes");
        assert_eq!(serialized, Value::Object(company.into_record()));
    }

    #[test]
    fn named_fields_win_over_extra_keys() {
        let mut extra = Record::new();
        extra.insert("email".to_string(), json!("shadow@example.com"));
        extra.insert("referrer".to_string(), json!("meetup"));

        let record = UserForm {
            email: Some("ann.lee@example.com".to_string()),
            extra,
            ..UserForm::default()
        }
        .into_record();

        assert_eq!(record["email"], json!("ann.lee@example.com"));
        assert_eq!(record["referrer"], json!("meetup"));
        assert!(!record.contains_key("firstName"));
    }
}
