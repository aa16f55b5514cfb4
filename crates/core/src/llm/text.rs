fn is_quote(c: char) -> bool {
    matches!(c, '"' | '\'' | '\u{201C}' | '\u{201D}' | '\u{2018}' | '\u{2019}')
}

/// Removes surrounding whitespace and quote characters from model output.
///
/// Models like to wrap a fortune in quotes, sometimes nested or padded
/// (`" 'Beware.' "`), so trimming repeats until nothing changes.
pub fn strip_quotes(text: &str) -> &str {
    let mut current = text;
    loop {
        let next = current.trim().trim_matches(is_quote);
        if next.len() == current.len() {
            return next;
        }
        current = next;
    }
}
