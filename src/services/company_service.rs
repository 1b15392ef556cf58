// Perfil da empresa: um documento "Company" por usuário (userId), gravado com upsert.

use serde::Deserialize;
use serde_json::json;

use crate::gateway::{DataGateway, FetchQuery};
use crate::models::de::string_or_list;
use crate::models::{Company, Record, SectionDocument};
use crate::services::lifecycle::FormSubmission;
use crate::services::patch::{field_filter, CompanyField, Patch};
use crate::services::upload::UploadRequest;
use crate::services::validation;
use crate::session::{ProfileSection, Role, Session, SessionStore};
use crate::utils::AppError;
use crate::views::CompanyView;

pub const LOGO_MODULE: &str = "companyLogo";

#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyForm {
    pub organization_name: String,
    #[serde(default, deserialize_with = "string_or_list")]
    pub industry: Vec<String>,
    #[serde(default)]
    pub noofemployees: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

fn owner_filter(user_id: &str) -> serde_json::Value {
    field_filter(vec![(CompanyField::UserId, json!(user_id))])
}

/// `None` when the user has not created a company profile yet.
pub async fn get_company(
    gateway: &dyn DataGateway,
    session: &Session,
) -> Result<Option<CompanyView>, AppError> {
    let query = FetchQuery::new(Company::COLLECTION)
        .filter(owner_filter(&session.user_id))
        .limit(1);
    let docs = gateway.fetch_section_data(&query).await?;

    Ok(docs
        .into_iter()
        .next()
        .map(|doc| CompanyView::from(&Record::<Company>::from_raw(doc))))
}

pub async fn update_company(
    gateway: &dyn DataGateway,
    store: &SessionStore,
    session: &Session,
    form: &CompanyForm,
) -> Result<(), AppError> {
    session.require_role(&[Role::Company])?;

    FormSubmission::new(gateway, store, session, ProfileSection::Company)
        .submit(
            || validation::validate_company(form),
            || {
                Patch::new()
                    .set(CompanyField::OrganizationName, form.organization_name.trim())
                    .set(CompanyField::Industry, &form.industry)
                    .set_if_some(CompanyField::Employees, form.noofemployees.as_deref())
                    .set_if_some(CompanyField::Website, form.website.as_deref())
                    .set_if_some(CompanyField::Location, form.location.as_deref())
                    .set_if_some(CompanyField::Description, form.description.as_deref())
                    .set(CompanyField::UserId, &session.user_id)
                    .into_command(owner_filter(&session.user_id), true)
            },
        )
        .await?;
    Ok(())
}

pub async fn upload_logo(
    gateway: &dyn DataGateway,
    session: &Session,
    upload: UploadRequest,
) -> Result<String, AppError> {
    session.require_role(&[Role::Company])?;
    let file = upload.into_file_upload()?;

    let stored = gateway
        .upload_and_store_file(LOGO_MODULE, file, &session.user_id, &session.access_token)
        .await?;

    let command = Patch::new()
        .set(CompanyField::Logo, &stored.file_path)
        .set(CompanyField::UserId, &session.user_id)
        .into_command(owner_filter(&session.user_id), true)?;
    gateway.m_update(&command, &session.access_token).await?;

    log::info!("🏢 Logo updated for company owner {}", session.user_id);
    Ok(stored.file_path)
}
