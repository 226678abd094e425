pub mod normalize;
pub mod profile;
pub mod seniority;
pub mod skills;
pub mod spec;
pub mod time_serde;
pub mod version;
