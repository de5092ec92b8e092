// Shared column mapping used by every listing page
pub mod base;

// Pages whose layout needs extra reshaping
pub mod netflix_ended;

pub use base::ColumnMapper;
pub use netflix_ended::NetflixEndedMapper;
