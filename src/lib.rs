pub mod calendar;
pub mod error;
pub mod output;
pub mod pager;
pub mod pipeline;
pub mod record;
pub mod source;
pub mod stats;
pub mod store;
