// Perfil do usuário (collection appuser): leitura, seções editáveis,
// listas de detalhes (certificados, projetos...) e foto.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::gateway::{DataGateway, FetchQuery};
use crate::models::{
    Achievement, AppUser, Availability, Certificate, Project, Record, Responsibility,
    SectionDocument,
};
use crate::services::lifecycle::{FormSubmission, LoadOutcome};
use crate::services::patch::{id_filter, EntityField, Patch, UserField};
use crate::services::upload::UploadRequest;
use crate::services::validation;
use crate::session::store::CompletionStatus;
use crate::session::{ProfileSection, Session, SessionStore};
use crate::utils::AppError;
use crate::views::UserProfileView;

pub const PROFILE_MODULE: &str = "profile";

#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PersonalDetailsForm {
    pub legalname: String,
    pub email: String,
    pub mobile: String,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub about: Option<String>,
    #[serde(default)]
    pub mentor_expertise: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct AvailabilityForm {
    #[schema(value_type = Object)]
    pub availability: Availability,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ProfileResponse {
    pub profile: UserProfileView,
    #[schema(value_type = Object)]
    pub completion: CompletionStatus,
}

/// One entry of a detail list, typed by its section
#[derive(Debug, Clone, PartialEq)]
pub enum DetailEntry {
    Certificate(Certificate),
    Project(Project),
    Achievement(Achievement),
    Responsibility(Responsibility),
}

impl DetailEntry {
    pub fn parse(section: ProfileSection, raw: Value) -> Result<Self, AppError> {
        let invalid = |e: serde_json::Error| AppError::InvalidRequest(format!("invalid entry: {}", e));
        Ok(match section {
            ProfileSection::Certificates => DetailEntry::Certificate(serde_json::from_value(raw).map_err(invalid)?),
            ProfileSection::Projects => DetailEntry::Project(serde_json::from_value(raw).map_err(invalid)?),
            ProfileSection::Achievements => DetailEntry::Achievement(serde_json::from_value(raw).map_err(invalid)?),
            ProfileSection::Responsibilities => {
                DetailEntry::Responsibility(serde_json::from_value(raw).map_err(invalid)?)
            }
            other => return Err(not_a_list(other)),
        })
    }

    pub fn validate(&self) -> Result<(), AppError> {
        match self {
            DetailEntry::Certificate(c) => validation::validate_certificate(c),
            DetailEntry::Project(p) => validation::validate_project(p),
            DetailEntry::Achievement(a) => validation::validate_achievement(a),
            DetailEntry::Responsibility(r) => validation::validate_responsibility(r),
        }
    }

    fn to_value(&self) -> Result<Value, AppError> {
        let encoded = match self {
            DetailEntry::Certificate(c) => serde_json::to_value(c),
            DetailEntry::Project(p) => serde_json::to_value(p),
            DetailEntry::Achievement(a) => serde_json::to_value(a),
            DetailEntry::Responsibility(r) => serde_json::to_value(r),
        };
        encoded.map_err(|e| AppError::InvalidRequest(format!("cannot encode entry: {}", e)))
    }

    fn push_into(&self, patch: Patch<UserField>, field: UserField) -> Patch<UserField> {
        match self {
            DetailEntry::Certificate(c) => patch.push(field, c),
            DetailEntry::Project(p) => patch.push(field, p),
            DetailEntry::Achievement(a) => patch.push(field, a),
            DetailEntry::Responsibility(r) => patch.push(field, r),
        }
    }
}

fn not_a_list(section: ProfileSection) -> AppError {
    AppError::InvalidRequest(format!("section {:?} is not a detail list", section))
}

fn detail_field(section: ProfileSection) -> Result<UserField, AppError> {
    match section {
        ProfileSection::Certificates => Ok(UserField::Certificates),
        ProfileSection::Projects => Ok(UserField::Projects),
        ProfileSection::Achievements => Ok(UserField::Achievements),
        ProfileSection::Responsibilities => Ok(UserField::Responsibilities),
        other => Err(not_a_list(other)),
    }
}

/// Stored entries of a detail list, exactly as the document holds them
fn stored_entries(record: &Record<AppUser>, field: UserField) -> Vec<Value> {
    record
        .raw_field(field.key())
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}

/// Positions in `stored` of the entries the profile view shows
fn visible_positions(section: ProfileSection, stored: &[Value]) -> Vec<usize> {
    stored
        .iter()
        .enumerate()
        .filter(|(_, entry)| DetailEntry::parse(section, (*entry).clone()).is_ok())
        .map(|(position, _)| position)
        .collect()
}

/// Completion flags derived from a freshly fetched document
pub fn completion_from(user: &AppUser) -> CompletionStatus {
    let filled = |v: &Option<String>| v.as_deref().map_or(false, |s| !s.trim().is_empty());

    let mut status = CompletionStatus::new();
    status.insert(
        ProfileSection::Personal,
        filled(&user.legalname) && filled(&user.email) && filled(&user.mobile),
    );
    status.insert(
        ProfileSection::Availability,
        user.mentor_availability.selected_slot_count() > 0,
    );
    status.insert(ProfileSection::Certificates, !user.certificatesdetails.is_empty());
    status.insert(ProfileSection::Projects, !user.projectdetails.is_empty());
    status.insert(ProfileSection::Achievements, !user.achievementsdetails.is_empty());
    status.insert(ProfileSection::Responsibilities, !user.responsibilitydetails.is_empty());
    status
}

async fn fetch_user(gateway: &dyn DataGateway, user_id: &str) -> Result<Record<AppUser>, AppError> {
    let query = FetchQuery::new(AppUser::COLLECTION)
        .filter(id_filter(user_id))
        .limit(1);
    let doc = gateway
        .fetch_section_data(&query)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| AppError::NotFound(format!("user {}", user_id)))?;
    Ok(Record::from_raw(doc))
}

/// Fetching is authoritative for the completion flags.
pub async fn get_profile(
    gateway: &dyn DataGateway,
    store: &SessionStore,
    session: &Session,
) -> Result<ProfileResponse, AppError> {
    let generation = store.generation(&session.user_id);
    let mut loaded = None;
    let outcome = store
        .view_scope(&session.user_id)
        .run(async {
            loaded = Some(fetch_user(gateway, &session.user_id).await.map(|record| {
                store.overwrite_completion(&session.user_id, generation, completion_from(&record.body));
                record
            }));
        })
        .await;

    match (outcome, loaded) {
        (LoadOutcome::Committed(()), Some(result)) => {
            let record = result?;
            Ok(ProfileResponse {
                profile: UserProfileView::from(&record),
                completion: store.completion(&session.user_id),
            })
        }
        _ => Err(AppError::Unauthorized(
            "Session ended while the profile was loading".to_string(),
        )),
    }
}

pub fn completion(store: &SessionStore, session: &Session) -> CompletionStatus {
    store.completion(&session.user_id)
}

pub async fn update_personal_details(
    gateway: &dyn DataGateway,
    store: &SessionStore,
    session: &Session,
    form: &PersonalDetailsForm,
) -> Result<(), AppError> {
    FormSubmission::new(gateway, store, session, ProfileSection::Personal)
        .submit(
            || validation::validate_personal_details(form),
            || {
                Patch::new()
                    .set(UserField::LegalName, form.legalname.trim())
                    .set(UserField::Email, form.email.trim())
                    .set(UserField::Mobile, form.mobile.trim())
                    .set_if_some(UserField::Gender, form.gender.as_deref())
                    .set_if_some(UserField::About, form.about.as_deref())
                    .set_if_some(UserField::MentorExpertise, form.mentor_expertise.as_ref())
                    .into_command(id_filter(&session.user_id), false)
            },
        )
        .await?;
    Ok(())
}

pub async fn update_availability(
    gateway: &dyn DataGateway,
    store: &SessionStore,
    session: &Session,
    form: AvailabilityForm,
) -> Result<(), AppError> {
    let availability = form.availability.normalized();
    FormSubmission::new(gateway, store, session, ProfileSection::Availability)
        .submit(
            || validation::validate_availability(&availability),
            || {
                Patch::new()
                    .set(UserField::MentorAvailability, &availability.0)
                    .into_command(id_filter(&session.user_id), false)
            },
        )
        .await?;
    Ok(())
}

/// Appends one entry. A list that only exists at the top level of an older
/// document is copied into the section together with the new entry.
pub async fn add_detail(
    gateway: &dyn DataGateway,
    store: &SessionStore,
    session: &Session,
    section: ProfileSection,
    raw: Value,
) -> Result<(), AppError> {
    let field = detail_field(section)?;
    let entry = DetailEntry::parse(section, raw)?;
    entry.validate()?;

    let record = fetch_user(gateway, &session.user_id).await?;
    let legacy = if record.in_section(field.key()) {
        None
    } else {
        Some(stored_entries(&record, field)).filter(|entries| !entries.is_empty())
    };

    FormSubmission::new(gateway, store, session, section)
        .submit(
            // já validado antes do fetch
            || Ok(()),
            || {
                let patch = match legacy {
                    Some(mut entries) => {
                        entries.push(entry.to_value()?);
                        Patch::new().set(field, entries)
                    }
                    None => entry.push_into(Patch::new(), field),
                };
                patch.into_command(id_filter(&session.user_id), false)
            },
        )
        .await?;
    Ok(())
}

/// Removes the `index`-th visible entry by rewriting the stored array.
/// Entries the view skips and fields it does not model are written back untouched.
pub async fn delete_detail(
    gateway: &dyn DataGateway,
    store: &SessionStore,
    session: &Session,
    section: ProfileSection,
    index: usize,
) -> Result<(), AppError> {
    let field = detail_field(section)?;
    let guard = store.begin_submit(&session.user_id, section)?;

    let record = fetch_user(gateway, &session.user_id).await?;
    let mut stored = stored_entries(&record, field);
    let visible = visible_positions(section, &stored);
    let Some(&position) = visible.get(index) else {
        return Err(AppError::NotFound(format!(
            "entry {} of {:?} (list has {})",
            index,
            section,
            visible.len()
        )));
    };
    stored.remove(position);

    let command = Patch::new()
        .set(field, &stored)
        .into_command(id_filter(&session.user_id), false)?;
    gateway.m_update(&command, &session.access_token).await?;

    let mut status = CompletionStatus::new();
    status.insert(section, visible.len() > 1);
    guard.overwrite_completion(status);

    log::info!("🗑️  Removed {:?}[{}] for user {}", section, index, session.user_id);
    Ok(())
}

/// Upload first, then point `profile` at the stored file.
pub async fn upload_profile_picture(
    gateway: &dyn DataGateway,
    session: &Session,
    upload: UploadRequest,
) -> Result<String, AppError> {
    let file = upload.into_file_upload()?;
    if !file.content_type.starts_with("image/") {
        return Err(AppError::Validation("Profile picture must be an image".to_string()));
    }

    let stored = gateway
        .upload_and_store_file(PROFILE_MODULE, file, &session.user_id, &session.access_token)
        .await?;

    let command = Patch::new()
        .set(UserField::Profile, &stored.file_path)
        .into_command(id_filter(&session.user_id), false)?;
    gateway.m_update(&command, &session.access_token).await?;

    log::info!("🖼️  Profile picture updated for user {}", session.user_id);
    Ok(stored.file_path)
}
