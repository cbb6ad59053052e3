pub mod helpers;
pub mod regions;
