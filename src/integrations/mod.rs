//! External service integrations.

pub mod lms_client {
    pub use crate::lms_client::*;
}

pub mod lms_models {
    pub use crate::lms_models::*;
}
