pub mod invitation;
pub mod invitation_analytics;
pub mod profile;

pub use invitation::Entity as InvitationEntity;
pub use invitation_analytics::Entity as InvitationAnalyticsEntity;
pub use profile::Entity as ProfileEntity;
