pub mod account;
pub mod user;

pub use account::{
    AccessKeySummary, OrganizationSummary, ProvisioningResult, SignInRequest, SignUpRequest,
    UserProfile, OWNER_ROLE,
};
pub use user::AuthUser;
