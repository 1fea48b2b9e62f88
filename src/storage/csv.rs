//! Delimited-text line handling
//!
//! Fields are separated by the delimiter. A field may be wrapped in quotes,
//! with a doubled quote standing for a literal one. Records never span lines.

/// Delimiter and quote characters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvDialect {
    pub delimiter: char,
    pub quote: char,
}

impl Default for CsvDialect {
    fn default() -> Self {
        Self {
            delimiter: ',',
            quote: '"',
        }
    }
}

/// Splits one line into raw fields.
///
/// Returns `None` for an unterminated quote or stray text after a closing quote.
pub fn split_line(line: &str, dialect: &CsvDialect) -> Option<Vec<String>> {
    let CsvDialect { delimiter, quote } = *dialect;
    let mut fields = Vec::new();
    let mut chars = line.chars().peekable();

    loop {
        let mut field = String::new();

        if chars.peek() == Some(&quote) {
            chars.next();
            let mut closed = false;
            while let Some(c) = chars.next() {
                if c != quote {
                    field.push(c);
                } else if chars.peek() == Some(&quote) {
                    chars.next();
                    field.push(quote);
                } else {
                    closed = true;
                    break;
                }
            }
            if !closed {
                return None;
            }
            fields.push(field);
            match chars.next() {
                None => return Some(fields),
                Some(c) if c == delimiter => continue,
                Some(_) => return None,
            }
        }

        loop {
            match chars.next() {
                None => {
                    fields.push(field);
                    return Some(fields);
                }
                Some(c) if c == delimiter => break,
                Some(c) => field.push(c),
            }
        }
        fields.push(field);
    }
}

/// Quotes a field if it contains the delimiter, the quote, or a line break.
pub fn quote_field(value: &str, dialect: &CsvDialect) -> String {
    let needs_quoting = value
        .chars()
        .any(|c| c == dialect.delimiter || c == dialect.quote || c == '\n' || c == '\r');
    if !needs_quoting {
        return value.to_string();
    }

    let doubled: String = [dialect.quote, dialect.quote].iter().collect();
    let escaped = value.replace(dialect.quote, &doubled);
    format!("{q}{escaped}{q}", q = dialect.quote)
}

/// Joins fields into one line, quoting as needed. No trailing newline.
pub fn join_fields<I, S>(fields: I, dialect: &CsvDialect) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut line = String::new();
    for (i, field) in fields.into_iter().enumerate() {
        if i > 0 {
            line.push(dialect.delimiter);
        }
        line.push_str(&quote_field(field.as_ref(), dialect));
    }
    line
}
