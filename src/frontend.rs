pub mod cli;
pub mod config;
pub mod map;
pub mod survey;
