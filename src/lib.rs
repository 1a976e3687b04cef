pub mod config;
pub mod consts;
pub mod history;
pub mod locate;
pub mod output;
pub mod scan;
pub mod search;
