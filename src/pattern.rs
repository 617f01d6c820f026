use regex::Regex;

use crate::interpreter::EvalError;

/// Compiles a `LIKE` pattern: `%` matches any run of characters (including
/// none), `_` exactly one, everything else literally. The whole subject
/// must match.
pub fn compile_like(pattern: &str) -> Result<Regex, EvalError> {
    let mut source = String::with_capacity(pattern.len() + 8);
    source.push_str("(?s)^");

    let mut literal = [0u8; 4];
    for ch in pattern.chars() {
        match ch {
            '%' => source.push_str(".*"),
            '_' => source.push('.'),
            _ => source.push_str(&regex::escape(ch.encode_utf8(&mut literal))),
        }
    }
    source.push('$');

    Regex::new(&source).map_err(|e| EvalError::InvalidPattern(format!("'{}': {}", pattern, e)))
}
