pub mod fetch;
pub mod issues;
