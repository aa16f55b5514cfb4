pub mod batch;
pub mod catalog;
pub mod fortune;
