pub mod account_client;
pub mod error;
pub mod session;
pub mod signin;
pub mod signup;

pub use account_client::{AccountApi, AccountClient};
pub use error::ApiError;
pub use session::AuthSession;
pub use signin::{SignInError, SignInFlow};
pub use signup::{SignUpError, SignUpFailure, SignUpOrchestrator, SIGN_UP_SUCCESS_MESSAGE};
