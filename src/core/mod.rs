// Domain-layer modules and shared errors/models
pub mod phone {
    pub use crate::phone::*;
}

pub mod repository {
    pub use crate::repository::*;
}

pub mod service {
    pub use crate::service::*;
}

pub mod models {
    pub use crate::models::*;
}

pub mod errors {
    pub use crate::errors::*;
}
