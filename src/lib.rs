pub mod analyzers;
pub mod error;
pub mod fetch;
pub mod lister;
pub mod output;
pub mod parser;
pub mod pipeline;
pub mod stats;
