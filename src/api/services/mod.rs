pub mod analytics;
pub mod error_code;
pub mod health;
pub mod helpers;
pub mod invitations;
pub mod invite;
pub mod profile;
pub mod routes;
pub mod types;

pub use error_code::ErrorCode;
pub use health::{HealthService, health_routes};
pub use helpers::{api_result, error_from_biolink, success_response};
pub use invite::{InviteService, PublicInvitation, invite_routes};
pub use routes::configure_routes;
pub use types::ApiResponse;
