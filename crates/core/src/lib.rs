//! ELLP core types and utilities

pub mod error;
pub mod listing;
pub mod types;
pub mod validation;

pub use error::{CoreError, CoreResult};
pub use listing::{Page, matches_search, paginate};
pub use types::{
    AuthResponse, CreateVolunteerRequest, CreateWorkshopRequest, InactivateVolunteerRequest,
    LoginRequest, RefreshRequest, RegisterRequest, Role, Session, TokenPair,
    UpdateVolunteerRequest, UpdateWorkshopRequest, User, Volunteer, VolunteerFilter, Workshop,
    WorkshopFilter,
};
pub use validation::{FieldError, Validate, ValidationErrors};
