use super::QueryParams;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{DefaultOnNull, NoneAsEmptyString, serde_as};

/// A workshop ("oficina") run by the project.
///
/// Volunteers are referenced by identifier only; the association is managed
/// through the join endpoints, never by embedding.
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Workshop {
    pub id: String,
    pub name: String,
    pub date: NaiveDate,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub description: Option<String>,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub volunteers: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Workshop {
    pub fn has_volunteer(&self, volunteer_id: &str) -> bool {
        self.volunteers.iter().any(|id| id == volunteer_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateWorkshopRequest {
    pub name: String,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateWorkshopRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl UpdateWorkshopRequest {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Server-side filters for `GET /workshops`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkshopFilter {
    pub name: Option<String>,
    pub month: Option<u32>,
    pub year: Option<i32>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl WorkshopFilter {
    pub fn to_query(&self) -> QueryParams {
        let mut params = QueryParams::new();
        if let Some(name) = self.name.as_deref().filter(|n| !n.is_empty()) {
            params.push(("name", name.to_string()));
        }
        if let Some(month) = self.month {
            params.push(("month", month.to_string()));
        }
        if let Some(year) = self.year {
            params.push(("year", year.to_string()));
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

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_workshop_date_is_plain_calendar_date() {
        let workshop: Workshop = serde_json::from_value(json!({
            "id": "w1",
            "name": "Scratch Básico",
            "date": "2024-05-10",
            "volunteers": ["v1", "v2"],
            "created_at": "2024-04-01T10:00:00Z",
            "updated_at": "2024-04-01T10:00:00Z"
        }))
        .unwrap();

        assert_eq!(workshop.date, NaiveDate::from_ymd_opt(2024, 5, 10).unwrap());
        assert_eq!(workshop.description, None);
        assert!(workshop.has_volunteer("v2"));
        assert!(!workshop.has_volunteer("v3"));

        let request = CreateWorkshopRequest {
            name: workshop.name.clone(),
            date: workshop.date,
            description: None,
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"name": "Scratch Básico", "date": "2024-05-10"})
        );
    }

    #[test]
    fn test_filter_renders_month_and_year() {
        let filter = WorkshopFilter {
            month: Some(3),
            year: Some(2024),
            ..Default::default()
        };
        assert_eq!(
            filter.to_query(),
            vec![("month", "3".to_string()), ("year", "2024".to_string())]
        );
    }
}
