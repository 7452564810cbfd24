mod entities;
mod error;
mod request;
mod response;
mod schema;

pub use entities::*;
pub use error::*;
pub use request::*;
pub use response::*;
pub use schema::*;
