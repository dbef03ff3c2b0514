pub mod model;
pub mod store;
pub mod structure;
pub mod util;
