// Domain-layer modules and shared errors/models
pub mod grades {
    pub use crate::grades::*;
}

pub mod pipeline {
    pub use crate::pipeline::*;
}

pub mod presenter {
    pub use crate::presenter::*;
}

pub mod models {
    pub use crate::models::*;
}

pub mod errors {
    pub use crate::errors::*;
}
