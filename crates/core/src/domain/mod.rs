pub mod dashboard;
pub mod education;
pub mod market;
pub mod portfolio;
pub mod profile;
pub mod recommendation;
pub mod records;
