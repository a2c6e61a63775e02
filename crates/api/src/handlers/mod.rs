pub mod dashboard;
pub mod entities;
pub mod history;
pub mod import;
