//! Persistence
//!
//! Only the depth counter outlives the process.

pub mod profile;

pub use profile::{
    DepthProfile, ProfileError,
    load_profile, save_profile, load_profile_from, save_profile_to, profile_path,
};
