use super::QueryParams;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{DefaultOnNull, NoneAsEmptyString, serde_as};

/// A project volunteer
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Volunteer {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub is_academic: bool,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub course: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub ra: Option<String>,
    pub entry_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_active: bool,
    /// Identifiers of the workshops this volunteer joined
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub workshops: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Volunteer {
    /// Course and RA only carry meaning for academic volunteers
    pub fn academic_info(&self) -> Option<(Option<&str>, Option<&str>)> {
        self.is_academic
            .then(|| (self.course.as_deref(), self.ra.as_deref()))
    }

    /// Exit date is only present on inactive volunteers
    pub fn is_consistent(&self) -> bool {
        !(self.is_active && self.exit_date.is_some())
    }

    pub fn workshop_count(&self) -> usize {
        self.workshops.len()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateVolunteerRequest {
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default)]
    pub is_academic: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ra: Option<String>,
    pub entry_date: DateTime<Utc>,
}

impl CreateVolunteerRequest {
    /// Drop fields that carry no meaning for this volunteer before sending.
    ///
    /// Course and RA are ignored for non-academic volunteers; blank optional
    /// text becomes absent.
    pub fn normalized(mut self) -> Self {
        self.phone = non_blank(self.phone);
        if self.is_academic {
            self.course = non_blank(self.course);
            self.ra = non_blank(self.ra);
        } else {
            self.course = None;
            self.ra = None;
        }
        self
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateVolunteerRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_academic: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ra: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_date: Option<DateTime<Utc>>,
}

impl UpdateVolunteerRequest {
    pub fn normalized(mut self) -> Self {
        if self.is_academic == Some(false) {
            self.course = None;
            self.ra = None;
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InactivateVolunteerRequest {
    pub exit_date: DateTime<Utc>,
}

/// Server-side filters for `GET /volunteers`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VolunteerFilter {
    pub name: Option<String>,
    pub is_active: Option<bool>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl VolunteerFilter {
    pub fn to_query(&self) -> QueryParams {
        let mut params = QueryParams::new();
        if let Some(name) = self.name.as_deref().filter(|n| !n.is_empty()) {
            params.push(("name", name.to_string()));
        }
        if let Some(is_active) = self.is_active {
            params.push(("is_active", is_active.to_string()));
        }
        if let Some(page) = self.page.filter(|p| *p > 0) {
            params.push(("page", page.to_string()));
        }
        if let Some(limit) = self.limit.filter(|l| *l > 0) {
            params.push(("limit", limit.to_string()));
        }
        params
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
