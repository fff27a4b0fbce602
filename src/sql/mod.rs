mod errors;
mod expects;
mod parser;
mod tokenizer;

pub use errors::*;
pub use parser::*;
