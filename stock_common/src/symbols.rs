//! Symbol normalization and symbols-file parsing shared by client and server.
//!
//! Tracked symbols are free-form uppercase strings. The core performs no
//! syntax validation beyond trimming, uppercasing, and dropping empties;
//! whatever survives that is fetched as-is.

use std::io::BufRead;

use crate::error::TrackerError;

/// Fallback list used when the symbols file is missing or unreadable.
pub const DEFAULT_SYMBOLS: [&str; 6] = ["AAPL", "GOOGL", "MSFT", "TSLA", "AMZN", "NVDA"];

/// Normalizes one raw symbol: trim, uppercase, drop if empty.
pub fn normalize_symbol(raw: &str) -> Option<String> {
    let symbol = raw.trim().to_uppercase();
    if symbol.is_empty() { None } else { Some(symbol) }
}

/// Normalizes a list of raw symbols, deduplicating while preserving order.
pub fn normalize_symbols<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut symbols = Vec::new();
    for item in raw {
        if let Some(symbol) = normalize_symbol(item.as_ref())
            && !symbols.contains(&symbol)
        {
            symbols.push(symbol);
        }
    }
    symbols
}

/// Parses symbols from a buffered reader.
///
/// Symbols may be separated by new lines, commas, or whitespace. Each token
/// is normalized via [`normalize_symbol`]; empty tokens are skipped.
pub fn parse_from_reader<R: BufRead>(reader: R) -> Result<Vec<String>, TrackerError> {
    let mut tokens = Vec::new();

    for line_result in reader.lines() {
        let line = line_result.map_err(TrackerError::Io)?;
        for token in line.split([',', ' ', '\t']) {
            tokens.push(token.to_string());
        }
    }
    Ok(normalize_symbols(tokens))
}

/// The fallback list as owned strings.
pub fn default_symbols() -> Vec<String> {
    DEFAULT_SYMBOLS.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn parses_lines_commas_and_whitespace() {
        let input = Cursor::new("aapl, googl\nMSFT\t tsla\n\n");
        let symbols = parse_from_reader(input).unwrap();
        assert_eq!(symbols, vec!["AAPL", "GOOGL", "MSFT", "TSLA"]);
    }

    #[test]
    fn deduplicates_preserving_first_occurrence() {
        let symbols = normalize_symbols(["nvda", " NVDA ", "amzn", "NVDA"]);
        assert_eq!(symbols, vec!["NVDA", "AMZN"]);
    }

    #[test]
    fn drops_empty_tokens() {
        assert_eq!(normalize_symbol("   "), None);
        assert_eq!(normalize_symbol(" ibm "), Some("IBM".to_string()));
    }

    #[test]
    fn default_list_matches_fallback() {
        let defaults = default_symbols();
        assert_eq!(defaults.len(), DEFAULT_SYMBOLS.len());
        assert_eq!(defaults[0], "AAPL");
    }
}
