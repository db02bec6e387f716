pub mod cli;
pub mod config;
pub mod error;
pub mod github;
pub mod group;
pub mod output;
pub mod report;
pub mod run;
pub mod storage;
pub mod tasks;
