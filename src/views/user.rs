use serde::Serialize;
use std::collections::BTreeMap;

use super::*;
use crate::models::{Achievement, AppUser, Certificate, Project, Record, Responsibility};
use crate::utils::generate_slug;

#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileView {
    pub id: String,
    pub legal_name: String,
    pub email: String,
    pub mobile: String,
    pub gender: String,
    pub profile_image: String,
    pub about: String,
    pub role: String,
    /// Institute id the user is linked to
    pub organisation: String,
    pub certificates: Vec<Certificate>,
    pub projects: Vec<Project>,
    pub achievements: Vec<Achievement>,
    pub responsibilities: Vec<Responsibility>,
    /// day -> selected slots
    pub availability: BTreeMap<String, Vec<String>>,
}

impl From<&Record<AppUser>> for UserProfileView {
    fn from(record: &Record<AppUser>) -> Self {
        let user = &record.body;
        UserProfileView {
            id: record.id.clone(),
            legal_name: or_fallback(&user.legalname, UNNAMED_USER),
            email: or_fallback(&user.email, NOT_SPECIFIED),
            mobile: or_fallback(&user.mobile, NOT_SPECIFIED),
            gender: or_fallback(&user.gender, NOT_SPECIFIED),
            profile_image: or_fallback(&user.profile, PLACEHOLDER_PROFILE_IMAGE),
            about: or_fallback(&user.about, NOT_SPECIFIED),
            role: or_fallback(&user.role, NOT_SPECIFIED),
            organisation: or_fallback(&user.organisationcollege, NOT_SPECIFIED),
            certificates: user.certificatesdetails.clone(),
            projects: user.projectdetails.clone(),
            achievements: user.achievementsdetails.clone(),
            responsibilities: user.responsibilitydetails.clone(),
            availability: selected_slots(user),
        }
    }
}

fn selected_slots(user: &AppUser) -> BTreeMap<String, Vec<String>> {
    user.mentor_availability
        .0
        .iter()
        .filter_map(|(day, slots)| {
            let selected: Vec<String> = slots
                .iter()
                .filter(|(_, on)| **on)
                .map(|(slot, _)| slot.clone())
                .collect();
            (!selected.is_empty()).then(|| (day.clone(), selected))
        })
        .collect()
}

/// Card shown on the mentor listing
#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MentorCard {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub expertise: String,
    pub profile_image: String,
    pub available_days: Vec<String>,
}

impl From<&Record<AppUser>> for MentorCard {
    fn from(record: &Record<AppUser>) -> Self {
        let user = &record.body;
        let name = or_fallback(&user.legalname, UNNAMED_MENTOR);
        MentorCard {
            id: record.id.clone(),
            slug: mentor_slug(record),
            name,
            expertise: join_or_fallback(&user.mentor_expertise, NOT_SPECIFIED),
            profile_image: or_fallback(&user.profile, PLACEHOLDER_PROFILE_IMAGE),
            available_days: user.mentor_availability.active_days(),
        }
    }
}

/// Slug from the legal name; nameless mentors fall back to their id.
pub fn mentor_slug(record: &Record<AppUser>) -> String {
    let from_name = record
        .body
        .legalname
        .as_deref()
        .map(generate_slug)
        .unwrap_or_default();
    if from_name.is_empty() {
        record.id.clone()
    } else {
        from_name
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MentorProfileView {
    #[serde(flatten)]
    pub card: MentorCard,
    pub about: String,
    pub certificates: Vec<Certificate>,
    pub projects: Vec<Project>,
    pub achievements: Vec<Achievement>,
    pub availability: BTreeMap<String, Vec<String>>,
}

impl From<&Record<AppUser>> for MentorProfileView {
    fn from(record: &Record<AppUser>) -> Self {
        MentorProfileView {
            card: MentorCard::from(record),
            about: or_fallback(&record.body.about, NOT_SPECIFIED),
            certificates: record.body.certificatesdetails.clone(),
            projects: record.body.projectdetails.clone(),
            achievements: record.body.achievementsdetails.clone(),
            availability: selected_slots(&record.body),
        }
    }
}
