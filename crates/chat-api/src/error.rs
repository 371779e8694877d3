//! RPC Error Types
//!
//! Maps application errors to JSON-RPC error codes.

use dreambot_core::AppError;
use jsonrpsee::types::ErrorObjectOwned;

/// RPC Error Codes
pub mod code {
    pub const VALIDATION_ERROR: i32 = 4000;
    /// Queue is shut down; the front end must surface a user-visible
    /// failure immediately because no ack will ever be sent.
    pub const QUEUE_UNAVAILABLE: i32 = 4003;
    pub const INTERNAL_ERROR: i32 = 5000;
    pub const GENERATION_ERROR: i32 = 5001;
    pub const DELIVERY_ERROR: i32 = 5002;
}

/// Convert AppError to a JSON-RPC ErrorObject
pub fn to_rpc_error(err: AppError) -> ErrorObjectOwned {
    match err {
        AppError::Validation(msg) => {
            ErrorObjectOwned::owned(code::VALIDATION_ERROR, msg, None::<()>)
        }
        AppError::Submission(e) => {
            ErrorObjectOwned::owned(code::QUEUE_UNAVAILABLE, e.to_string(), None::<()>)
        }
        AppError::Domain(e) => {
            ErrorObjectOwned::owned(code::VALIDATION_ERROR, e.to_string(), None::<()>)
        }
        AppError::Generation(e) => {
            ErrorObjectOwned::owned(code::GENERATION_ERROR, e.to_string(), None::<()>)
        }
        AppError::Delivery(e) => {
            ErrorObjectOwned::owned(code::DELIVERY_ERROR, e.to_string(), None::<()>)
        }
        AppError::Internal(msg) => ErrorObjectOwned::owned(code::INTERNAL_ERROR, msg, None::<()>),
    }
}
