mod observe;

pub use observe::{observe_site, Observation, Params};
