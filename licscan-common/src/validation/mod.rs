//! Local input validation
//!
//! Pure functions applied before anything reaches the network:
//! - [`file`]: candidate dependency manifest checks (MIME type, extension, size)
//! - [`form`]: credential form checks (username length, password length, confirmation)
//!
//! Every validator short-circuits and reports only the first failing rule.

pub mod file;
pub mod form;

pub use file::{validate_file, CandidateFile, FileRejection, MAX_FILE_SIZE_BYTES};
pub use form::{validate_login, validate_registration, FormError, LoginForm, RegistrationForm};
