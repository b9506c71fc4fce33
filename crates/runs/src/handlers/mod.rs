//! HTTP handlers. Thin glue over the engine modules; everything with
//! algorithmic content lives in telemetry/lifecycle/rules/collectibles/
//! analytics.

mod challenges;
mod coaches;
mod collectibles;
mod company;
mod pagination;
mod positions;
mod runs;
mod users;

pub use challenges::*;
pub use coaches::*;
pub use collectibles::*;
pub use company::*;
pub use pagination::*;
pub use positions::*;
pub use runs::*;
pub use users::*;
