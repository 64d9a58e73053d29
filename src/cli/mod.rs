pub mod convert;
pub mod fiats;
pub mod search;
pub mod setup;
pub mod ui;
