pub mod allocation;
pub mod assignments;
pub mod catalog;
