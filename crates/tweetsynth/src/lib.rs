pub mod app;
pub mod config;
pub mod output;
pub mod tweetlog;
