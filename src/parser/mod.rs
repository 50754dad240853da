pub mod amazon_parser;

pub use amazon_parser::{AmazonParser, Parser};
