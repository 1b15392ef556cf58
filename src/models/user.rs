use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::de::{lenient_string, lenient_vec, string_or_list};
use super::SectionDocument;

pub const WEEK_DAYS: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

/// Documento da collection "appuser" (estudantes, mentores, empresas)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppUser {
    #[serde(default, deserialize_with = "lenient_string")]
    pub legalname: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub mobile: Option<String>,
    #[serde(rename = "Gender", alias = "gender", default, deserialize_with = "lenient_string")]
    pub gender: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub profile: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub role: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub about: Option<String>,
    #[serde(rename = "mentorExpertise", default, deserialize_with = "string_or_list")]
    pub mentor_expertise: Vec<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub organisationcollege: Option<String>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub certificatesdetails: Vec<Certificate>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub projectdetails: Vec<Project>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub achievementsdetails: Vec<Achievement>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub responsibilitydetails: Vec<Responsibility>,
    #[serde(rename = "mentorAvailability", default)]
    pub mentor_availability: Availability,
}

impl SectionDocument for AppUser {
    const COLLECTION: &'static str = "appuser";
    const MERGES_TOP_LEVEL: bool = true;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Certificate {
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub certificatename: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub issuedby: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub issuedate: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub certificateurl: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Project {
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub projectname: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub projecturl: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub startdate: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub enddate: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Achievement {
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Responsibility {
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
}

/// day → slot → selected, e.g. `{"monday": {"09:00-10:00": true}}`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Availability(pub BTreeMap<String, BTreeMap<String, bool>>);

impl Availability {
    pub fn selected_slot_count(&self) -> usize {
        self.0
            .values()
            .map(|slots| slots.values().filter(|selected| **selected).count())
            .sum()
    }

    /// Days with at least one selected slot, in week order
    pub fn active_days(&self) -> Vec<String> {
        WEEK_DAYS
            .iter()
            .filter(|day| {
                self.0
                    .get(**day)
                    .map_or(false, |slots| slots.values().any(|s| *s))
            })
            .map(|day| day.to_string())
            .collect()
    }

    /// Day keys lowercased; the UI sends "Monday" or "monday" depending on the form.
    pub fn normalized(self) -> Self {
        let mut out: BTreeMap<String, BTreeMap<String, bool>> = BTreeMap::new();
        for (day, slots) in self.0 {
            out.entry(day.trim().to_lowercase()).or_default().extend(slots);
        }
        Availability(out)
    }
}

impl<'de> Deserialize<'de> for Availability {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        let mut days = BTreeMap::new();

        if let Some(Value::Object(map)) = value {
            for (day, slots) in map {
                let Value::Object(slots) = slots else { continue };
                let parsed: BTreeMap<String, bool> = slots
                    .into_iter()
                    .map(|(slot, selected)| {
                        let on = match selected {
                            Value::Bool(b) => b,
                            Value::String(s) => s.eq_ignore_ascii_case("true"),
                            Value::Number(n) => n.as_i64() == Some(1),
                            _ => false,
                        };
                        (slot, on)
                    })
                    .collect();
                days.insert(day, parsed);
            }
        }

        Ok(Availability(days).normalized())
    }
}
