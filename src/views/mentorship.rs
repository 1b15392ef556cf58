use serde::Serialize;

use super::*;
use crate::models::{parse_timestamp, AppUser, Mentorship, Record};

/// Name of the `$lookup` field that carries the mentor's user document
pub const MENTOR_JOIN: &str = "mentor";

#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MentorshipCard {
    pub id: String,
    pub title: String,
    pub mentor_name: String,
    pub mentor_image: String,
    pub focus_area: String,
    pub deadline: String,
    pub duration: String,
    pub description: String,
    #[serde(skip)]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl From<&Record<Mentorship>> for MentorshipCard {
    fn from(record: &Record<Mentorship>) -> Self {
        let m = &record.body;
        let mentor = record.joined::<AppUser>(MENTOR_JOIN);

        MentorshipCard {
            id: record.id.clone(),
            title: or_fallback(&m.title, UNTITLED_MENTORSHIP),
            mentor_name: mentor
                .as_ref()
                .and_then(|u| u.body.legalname.clone())
                .unwrap_or_else(|| UNKNOWN_MENTOR.to_string()),
            mentor_image: mentor
                .as_ref()
                .and_then(|u| u.body.profile.clone())
                .unwrap_or_else(|| PLACEHOLDER_PROFILE_IMAGE.to_string()),
            focus_area: or_fallback(&m.focus_area, NOT_SPECIFIED),
            deadline: or_fallback(&m.deadline, NOT_SPECIFIED),
            duration: or_fallback(&m.duration, NOT_SPECIFIED),
            description: or_fallback(&m.description, NOT_SPECIFIED),
            created_at: record.created_at.or_else(|| {
                m.created_at
                    .as_ref()
                    .and_then(|s| parse_timestamp(&serde_json::Value::String(s.clone())))
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unknown_mentor_fallback() {
        let record: Record<Mentorship> = Record::from_raw(json!({
            "_id": "ms1",
            "sectionData": { "mentorship": { "title": "Systems 101" } }
        }));
        let card = MentorshipCard::from(&record);
        assert_eq!(card.title, "Systems 101");
        assert_eq!(card.mentor_name, UNKNOWN_MENTOR);
        assert_eq!(card.focus_area, NOT_SPECIFIED);
        assert_eq!(card.deadline, NOT_SPECIFIED);
    }

    #[test]
    fn test_mentor_from_lookup() {
        let record: Record<Mentorship> = Record::from_raw(json!({
            "_id": "ms2",
            "sectionData": { "mentorship": { "focus_area": "Career" } },
            "mentor": [{ "_id": "m1", "sectionData": { "appuser": { "legalname": "Ravi" } } }]
        }));
        let card = MentorshipCard::from(&record);
        assert_eq!(card.mentor_name, "Ravi");
        assert_eq!(card.title, UNTITLED_MENTORSHIP);
    }
}
