// Validações síncronas executadas antes de qualquer chamada ao gateway.
// Mensagens são exibidas direto para o usuário.

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;

use crate::utils::metrics;
use crate::models::{Achievement, Availability, Certificate, Project, Responsibility, WEEK_DAYS};
use crate::services::auth_service::{ResetPasswordRequest, SignupRequest};
use crate::services::company_service::CompanyForm;
use crate::services::job_service::JobPostForm;
use crate::services::mentorship_service::MentorshipForm;
use crate::services::profile_service::PersonalDetailsForm;
use crate::session::Role;
use crate::utils::AppError;

pub const AVAILABILITY_REQUIRED: &str = "Please select at least one time slot for your availability.";

lazy_static! {
    static ref EMAIL: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
    static ref MOBILE: Regex = Regex::new(r"^\+?[0-9]{10,15}$").unwrap();
    static ref PERSON_NAME: Regex = Regex::new(r"^[A-Za-z][A-Za-z .'\-]*$").unwrap();
    static ref URL: Regex = Regex::new(r"^https?://[^\s/$.?#][^\s]*$").unwrap();
    static ref OTP: Regex = Regex::new(r"^[0-9]{4,8}$").unwrap();
}

type Validation = Result<(), AppError>;

fn fail(message: impl Into<String>) -> Validation {
    metrics::record_validation_rejection();
    Err(AppError::Validation(message.into()))
}

fn required(value: &str, label: &str) -> Validation {
    if value.trim().is_empty() {
        return fail(format!("{} is required", label));
    }
    Ok(())
}

fn required_opt(value: &Option<String>, label: &str) -> Validation {
    required(value.as_deref().unwrap_or(""), label)
}

pub fn validate_email(email: &str) -> Validation {
    required(email, "Email")?;
    if !EMAIL.is_match(email.trim()) {
        return fail("Please enter a valid email address");
    }
    Ok(())
}

pub fn validate_mobile(mobile: &str) -> Validation {
    required(mobile, "Mobile number")?;
    let compact: String = mobile.chars().filter(|c| !c.is_whitespace() && *c != '-').collect();
    if !MOBILE.is_match(&compact) {
        return fail("Please enter a valid mobile number (10-15 digits)");
    }
    Ok(())
}

pub fn validate_name(name: &str, label: &str) -> Validation {
    required(name, label)?;
    if !PERSON_NAME.is_match(name.trim()) {
        return fail(format!("{} may only contain letters, spaces, dots, apostrophes and hyphens", label));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Validation {
    if password.chars().count() < 8 {
        return fail("Password must be at least 8 characters long");
    }
    let has_letter = password.chars().any(|c| c.is_ascii_alphabetic());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    if !has_letter || !has_digit {
        return fail("Password must contain at least one letter and one number");
    }
    Ok(())
}

/// Optional URL: empty is fine, anything else must be http(s)
pub fn validate_optional_url(url: &Option<String>, label: &str) -> Validation {
    match url.as_deref().map(str::trim) {
        None | Some("") => Ok(()),
        Some(u) if URL.is_match(u) => Ok(()),
        Some(_) => fail(format!("{} must be a valid http(s) URL", label)),
    }
}

pub fn validate_otp(otp: &str) -> Validation {
    if !OTP.is_match(otp.trim()) {
        return fail("Please enter the verification code sent to your email");
    }
    Ok(())
}

pub fn validate_personal_details(form: &PersonalDetailsForm) -> Validation {
    validate_name(&form.legalname, "Full name")?;
    validate_email(&form.email)?;
    validate_mobile(&form.mobile)?;
    if let Some(gender) = form.gender.as_deref().filter(|g| !g.trim().is_empty()) {
        let known = ["male", "female", "other", "prefer not to say"];
        if !known.contains(&gender.trim().to_lowercase().as_str()) {
            return fail("Please select a valid gender");
        }
    }
    Ok(())
}

pub fn validate_availability(availability: &Availability) -> Validation {
    if let Some(day) = availability.0.keys().find(|d| !WEEK_DAYS.contains(&d.as_str())) {
        return fail(format!("Unknown day in availability: {}", day));
    }
    if availability.selected_slot_count() == 0 {
        return fail(AVAILABILITY_REQUIRED);
    }
    Ok(())
}

pub fn validate_certificate(entry: &Certificate) -> Validation {
    required_opt(&entry.certificatename, "Certificate name")?;
    required_opt(&entry.issuedby, "Issuing organization")?;
    validate_optional_url(&entry.certificateurl, "Certificate URL")
}

pub fn validate_project(entry: &Project) -> Validation {
    required_opt(&entry.projectname, "Project name")?;
    required_opt(&entry.description, "Project description")?;
    validate_optional_url(&entry.projecturl, "Project URL")?;
    if let (Some(start), Some(end)) = (parse_date(&entry.startdate), parse_date(&entry.enddate)) {
        if end < start {
            return fail("Project end date cannot be before its start date");
        }
    }
    Ok(())
}

pub fn validate_achievement(entry: &Achievement) -> Validation {
    required_opt(&entry.title, "Achievement title")
}

pub fn validate_responsibility(entry: &Responsibility) -> Validation {
    required_opt(&entry.role, "Role")?;
    required_opt(&entry.organization, "Organization")
}

pub fn validate_company(form: &CompanyForm) -> Validation {
    required(&form.organization_name, "Organization name")?;
    if form.industry.is_empty() {
        return fail("Please select at least one industry");
    }
    validate_optional_url(&form.website, "Website")
}

pub fn validate_job_post(form: &JobPostForm) -> Validation {
    required(&form.title, "Job title")?;
    required(&form.location, "Location")?;
    if matches!(form.salary, Some(s) if s < 0.0) {
        return fail("Salary cannot be negative");
    }
    if form.skillsrequired.is_empty() {
        return fail("Please add at least one required skill");
    }
    Ok(())
}

pub fn validate_mentorship(form: &MentorshipForm, today: NaiveDate) -> Validation {
    required(&form.title, "Title")?;
    required(&form.focus_area, "Focus area")?;
    required(&form.duration, "Duration")?;
    match NaiveDate::parse_from_str(form.deadline.trim(), "%Y-%m-%d") {
        Ok(deadline) if deadline < today => fail("Deadline cannot be in the past"),
        Ok(_) => Ok(()),
        Err(_) => fail("Deadline must be a date in YYYY-MM-DD format"),
    }
}

pub fn validate_signup(form: &SignupRequest) -> Validation {
    validate_name(&form.legalname, "Full name")?;
    validate_email(&form.email)?;
    validate_mobile(&form.mobile)?;
    validate_password(&form.password)?;
    if Role::from_role_id(&form.role) == Role::Unknown || Role::from_role_id(&form.role) == Role::Admin {
        return fail("Please choose whether you are signing up as a student, mentor, company or institute");
    }
    Ok(())
}

pub fn validate_reset_password(form: &ResetPasswordRequest) -> Validation {
    validate_email(&form.email)?;
    validate_otp(&form.otp)?;
    validate_password(&form.password)?;
    if form.password != form.confirm_password {
        return fail("Passwords do not match");
    }
    Ok(())
}

fn parse_date(value: &Option<String>) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.as_deref()?.trim(), "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn message(result: Validation) -> String {
        match result {
            Err(AppError::Validation(m)) => m,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_email_and_mobile() {
        assert!(validate_email("ana@example.com").is_ok());
        assert!(validate_email("ana@example").is_err());
        assert_eq!(message(validate_email("  ")), "Email is required");
        assert!(validate_mobile("+91 98765 43210").is_ok());
        assert!(validate_mobile("12345").is_err());
    }

    #[test]
    fn test_password_rules() {
        assert!(validate_password("abc12345").is_ok());
        assert!(validate_password("short1").is_err());
        assert!(validate_password("lettersonly").is_err());
    }

    #[test]
    fn test_availability_requires_a_slot() {
        let none: Availability = serde_json::from_value(json!({
            "monday": { "09:00": false }, "tuesday": {}, "wednesday": {},
            "thursday": {}, "friday": {}, "saturday": {}, "sunday": {}
        }))
        .unwrap();
        assert_eq!(message(validate_availability(&none)), AVAILABILITY_REQUIRED);

        let one: Availability =
            serde_json::from_value(json!({ "Friday": { "18:00": true } })).unwrap();
        assert!(validate_availability(&one).is_ok());

        let bad_day: Availability =
            serde_json::from_value(json!({ "funday": { "18:00": true } })).unwrap();
        assert!(message(validate_availability(&bad_day)).contains("funday"));
    }

    #[test]
    fn test_project_dates_and_url() {
        let mut project = Project {
            projectname: Some("Portal".into()),
            description: Some("BFF".into()),
            startdate: Some("2024-05-01".into()),
            enddate: Some("2024-04-01".into()),
            ..Default::default()
        };
        assert!(validate_project(&project).is_err());
        project.enddate = Some("2024-06-01".into());
        project.projecturl = Some("ftp://nope".into());
        assert!(validate_project(&project).is_err());
        project.projecturl = Some("https://github.com/x/y".into());
        assert!(validate_project(&project).is_ok());
    }

    #[test]
    fn test_mentorship_deadline() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let mut form = MentorshipForm {
            title: "Rust".into(),
            focus_area: "Systems".into(),
            deadline: "2024-05-31".into(),
            duration: "4 weeks".into(),
            description: None,
        };
        assert_eq!(message(validate_mentorship(&form, today)), "Deadline cannot be in the past");
        form.deadline = "next week".into();
        assert!(validate_mentorship(&form, today).is_err());
        form.deadline = "2024-06-15".into();
        assert!(validate_mentorship(&form, today).is_ok());
    }

    #[test]
    fn test_signup_role_must_be_known() {
        let mut form = SignupRequest {
            legalname: "Ana Lima".into(),
            email: "ana@example.com".into(),
            mobile: "9876543210".into(),
            password: "abc12345".into(),
            role: "wizard".into(),
        };
        assert!(validate_signup(&form).is_err());
        form.role = "admin".into();
        assert!(validate_signup(&form).is_err());
        form.role = "mentor".into();
        assert!(validate_signup(&form).is_ok());
    }
}
