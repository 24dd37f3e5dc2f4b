mod reader;
pub use reader::{Cursor, Line, Word};

mod error;
pub use error::{GrammarError, LexError, ParseError, Rule};

mod types;
pub use types::*;

mod signal;
pub use signal::{LogicLevel, SignalDeclaration, Value};

mod parse;
pub use parse::{parse_vcd, parse_vcd_streaming, Steps};

mod utilities;

mod write;

mod validate;
pub use validate::{SemanticWarning, Validator};
