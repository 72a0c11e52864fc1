//! Boundary records supplied by external collaborators: the scraped job
//! posting and the candidate's static profile.

pub mod posting;
pub mod profile;

pub use posting::JobPosting;
pub use profile::Profile;
