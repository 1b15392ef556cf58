use serde::Serialize;

use super::*;
use crate::models::{Company, Record};

#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyView {
    pub id: String,
    pub organization_name: String,
    pub industry: String,
    pub employees: String,
    pub logo: String,
    pub website: String,
    pub location: String,
    pub description: String,
}

impl From<&Record<Company>> for CompanyView {
    fn from(record: &Record<Company>) -> Self {
        let company = &record.body;
        CompanyView {
            id: record.id.clone(),
            organization_name: or_fallback(&company.organization_name, UNKNOWN_COMPANY),
            industry: join_or_fallback(&company.industry, NOT_SPECIFIED),
            employees: or_fallback(&company.noofemployees, NOT_SPECIFIED),
            logo: or_fallback(&company.logo, PLACEHOLDER_COMPANY_LOGO),
            website: or_fallback(&company.website, NOT_SPECIFIED),
            location: or_fallback(&company.location, NOT_SPECIFIED),
            description: or_fallback(&company.description, NOT_SPECIFIED),
        }
    }
}
