pub mod costs;
pub mod optimize;
