//! Wire types for the ELLP REST API

mod auth;
mod volunteer;
mod workshop;

pub use auth::{
    AuthResponse, LoginRequest, MeResponse, RefreshRequest, RegisterRequest, Role, Session,
    TokenPair, User,
};
pub use volunteer::{
    CreateVolunteerRequest, InactivateVolunteerRequest, UpdateVolunteerRequest, Volunteer,
    VolunteerFilter,
};
pub use workshop::{CreateWorkshopRequest, UpdateWorkshopRequest, Workshop, WorkshopFilter};

/// Query parameters rendered from a list filter, in a stable order
pub type QueryParams = Vec<(&'static str, String)>;
