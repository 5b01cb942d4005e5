//! Secret Santa client screens: per-screen state controllers for room
//! creation and the user profile, plus the machinery they run on.

pub mod config;
pub mod profile;
pub mod room;
pub mod screen;
pub mod text;
pub mod usecase;
