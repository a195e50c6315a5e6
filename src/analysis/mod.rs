//! Pure statistics over label sequences and group outcomes.
pub mod stats;
