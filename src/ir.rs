use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationType {
    Father,
    Mother,
    Son,
    Daughter,
    Brother,
    Sister,
    Spouse,
}

impl RelationType {
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "father" => Some(Self::Father),
            "mother" => Some(Self::Mother),
            "son" => Some(Self::Son),
            "daughter" => Some(Self::Daughter),
            "brother" => Some(Self::Brother),
            "sister" => Some(Self::Sister),
            "spouse" => Some(Self::Spouse),
            _ => None,
        }
    }

    /// Sex implied by the tag, if any. `spouse` carries none.
    pub fn implied_sex(self) -> Option<Sex> {
        match self {
            Self::Father | Self::Son | Self::Brother => Some(Sex::Male),
            Self::Mother | Self::Daughter | Self::Sister => Some(Sex::Female),
            Self::Spouse => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub death_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_place: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub residence_place: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sex: Option<Sex>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Person {
    pub fn new(id: &str, user_id: &str) -> Self {
        Self {
            id: id.to_string(),
            user_id: user_id.to_string(),
            ..Default::default()
        }
    }

    pub fn with_sex(mut self, sex: Sex) -> Self {
        self.sex = Some(sex);
        self
    }

    pub fn with_birth_date(mut self, date: &str) -> Self {
        self.birth_date = Some(date.to_string());
        self
    }

    pub fn with_name(mut self, first: &str, last: &str) -> Self {
        self.first_name = Some(first.to_string());
        self.last_name = Some(last.to_string());
        self
    }

    pub fn birth_day(&self) -> Option<NaiveDate> {
        self.birth_date.as_deref().and_then(parse_calendar_date)
    }

    pub fn death_day(&self) -> Option<NaiveDate> {
        self.death_date.as_deref().and_then(parse_calendar_date)
    }

    /// First, middle and last name joined; the id when no name is known.
    pub fn display_name(&self) -> String {
        let parts: Vec<&str> = [&self.first_name, &self.middle_name, &self.last_name]
            .into_iter()
            .filter_map(|part| part.as_deref())
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect();
        if parts.is_empty() {
            self.id.clone()
        } else {
            parts.join(" ")
        }
    }
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(date) = trimmed.parse::<NaiveDate>() {
        return Some(date);
    }
    DateTime::parse_from_rfc3339(trimmed)
        .ok()
        .map(|stamp| stamp.date_naive())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub from_person_id: String,
    pub to_person_id: String,
    #[serde(rename = "type")]
    pub kind: RelationType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by_id: Option<String>,
}

impl Relation {
    pub fn new(from: &str, to: &str, kind: RelationType) -> Self {
        Self {
            id: None,
            from_person_id: from.to_string(),
            to_person_id: to.to_string(),
            kind,
            created_by_id: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListResponse<T> {
    pub items: Vec<T>,
    #[serde(default)]
    pub total: usize,
}

impl<T> ListResponse<T> {
    pub fn from_items(items: Vec<T>) -> Self {
        let total = items.len();
        Self { items, total }
    }
}

impl<T> Default for ListResponse<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
        }
    }
}

/// Everything the layout needs from the data-access side.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FamilyData {
    pub persons: Vec<Person>,
    pub relations: Vec<Relation>,
    pub current_user_id: Option<String>,
}

impl FamilyData {
    pub fn person(&self, id: &str) -> Option<&Person> {
        self.persons.iter().find(|person| person.id == id)
    }

    pub fn root_person_for_user(&self, user_id: &str) -> Option<&str> {
        root_person_for_user(&self.persons, user_id)
    }
}

/// The first person owned by `user_id`.
pub fn root_person_for_user<'a>(persons: &'a [Person], user_id: &str) -> Option<&'a str> {
    persons
        .iter()
        .find(|person| person.user_id == user_id)
        .map(|person| person.id.as_str())
}
