// ==================== VIEW-MODELS ====================
// Objetos planos que o front end renderiza direto: todo campo opcional
// do documento já vem substituído pelo texto/imagem padrão.

pub mod company;
pub mod job;
pub mod mentorship;
pub mod user;

pub use company::*;
pub use job::*;
pub use mentorship::*;
pub use user::*;

pub const NOT_SPECIFIED: &str = "Not specified";
pub const UNNAMED_USER: &str = "Unnamed User";
pub const UNNAMED_MENTOR: &str = "Unnamed Mentor";
pub const UNKNOWN_MENTOR: &str = "Unknown Mentor";
pub const UNKNOWN_COMPANY: &str = "Unknown Company";
pub const UNTITLED_INTERNSHIP: &str = "Untitled Internship";
pub const UNTITLED_MENTORSHIP: &str = "Untitled Mentorship";
pub const PLACEHOLDER_PROFILE_IMAGE: &str = "https://via.placeholder.com/150?text=Profile";
pub const PLACEHOLDER_COMPANY_LOGO: &str = "https://via.placeholder.com/150?text=Logo";

pub(crate) fn or_fallback(value: &Option<String>, fallback: &str) -> String {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(fallback)
        .to_string()
}

pub(crate) fn join_or_fallback(values: &[String], fallback: &str) -> String {
    if values.is_empty() {
        fallback.to_string()
    } else {
        values.join(", ")
    }
}
