use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use log::error;
use loyalty_engine::{
    AccountApiError,
    AccrualFlowError,
    AuthApiError,
    LoyaltyDbError,
    OrderFlowError,
    WithdrawalError,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("Invalid order number: {0}")]
    InvalidOrderNumber(String),
    #[error("Order {0} has already been uploaded by another user")]
    OrderConflict(String),
    #[error("The login {0} is already taken")]
    LoginTaken(String),
    #[error("Receipt {0} has already been used for a withdrawal")]
    DuplicateWithdrawal(String),
    #[error("Insufficient funds. {0}")]
    InsufficientFunds(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("Authentication Error. {0}")]
    AuthenticationError(#[from] AuthError),
    #[error("Could not issue access token. {0}")]
    CouldNotSerializeAccessToken(String),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::InvalidOrderNumber(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::OrderConflict(_) => StatusCode::CONFLICT,
            Self::LoginTaken(_) => StatusCode::CONFLICT,
            Self::DuplicateWithdrawal(_) => StatusCode::CONFLICT,
            Self::InsufficientFunds(_) => StatusCode::PAYMENT_REQUIRED,
            Self::AuthenticationError(_) => StatusCode::UNAUTHORIZED,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::CouldNotSerializeAccessToken(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "error": self.to_string() }).to_string())
    }
}

/// Reasons an accrual verdict could not be recorded. The order stays pending and is retried later.
#[derive(Debug, Error)]
pub enum AccrualWorkerError {
    #[error("Asked about order {requested}, but the accrual service answered for order {answered}")]
    OrderMismatch { requested: String, answered: String },
    #[error(transparent)]
    FlowError(#[from] AccrualFlowError),
}

#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("No access token was provided.")]
    MissingToken,
    #[error("Access token is invalid. {0}")]
    ValidationError(String),
    #[error("Invalid login or password.")]
    InvalidCredentials,
}

fn backend_error(e: LoyaltyDbError) -> ServerError {
    error!("💻️ Storage failure: {e}");
    ServerError::BackendError(format!("Database error: {e}"))
}

impl From<OrderFlowError> for ServerError {
    fn from(e: OrderFlowError) -> Self {
        match e {
            OrderFlowError::InvalidOrderNumber(n) => Self::InvalidOrderNumber(n),
            OrderFlowError::OrderOwnedByAnotherUser(n) => Self::OrderConflict(n.to_string()),
            OrderFlowError::DatabaseError(e) => backend_error(e),
        }
    }
}

impl From<WithdrawalError> for ServerError {
    fn from(e: WithdrawalError) -> Self {
        match e {
            WithdrawalError::InvalidOrderNumber(n) => Self::InvalidOrderNumber(n),
            WithdrawalError::NonPositiveSum(_) => Self::InvalidRequestBody(e.to_string()),
            WithdrawalError::InsufficientFunds { available, requested } => {
                Self::InsufficientFunds(format!("Requested {requested}, but only {available} is available"))
            },
            WithdrawalError::DuplicateWithdrawal(n) => Self::DuplicateWithdrawal(n.to_string()),
            WithdrawalError::DatabaseError(e) => backend_error(e),
        }
    }
}

impl From<AuthApiError> for ServerError {
    fn from(e: AuthApiError) -> Self {
        match e {
            AuthApiError::MalformedCredentials(s) => Self::InvalidRequestBody(s),
            AuthApiError::LoginTaken(login) => Self::LoginTaken(login),
            AuthApiError::InvalidCredentials => Self::AuthenticationError(AuthError::InvalidCredentials),
            AuthApiError::PasswordHashError(s) => Self::BackendError(s),
            AuthApiError::DatabaseError(e) => backend_error(e),
        }
    }
}

impl From<AccountApiError> for ServerError {
    fn from(e: AccountApiError) -> Self {
        match e {
            AccountApiError::DatabaseError(e) => backend_error(e),
        }
    }
}
