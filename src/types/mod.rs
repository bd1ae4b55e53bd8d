pub mod errors;
pub mod ids;
pub mod ownership;
pub mod report;
pub mod safepath;
pub mod schema;

pub use errors::*;
pub use ids::*;
pub use ownership::*;
pub use report::*;
pub use safepath::*;
pub use schema::*;
