pub mod contributors;

pub use contributors::{ContributorIdentityEnricher, DEFAULT_MAX_UNVERIFIED};
