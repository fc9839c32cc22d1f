/// Series prescan - refreshes the local TheTVDB metadata cache
pub mod config;
pub mod error;
