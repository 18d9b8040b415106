/// Decodes the HTML entities that show up in the site's attribute values.
pub fn decode_entities(text: &str) -> String {
    text.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#039;", "'")
        .replace("&nbsp;", " ")
}

/// Decodes twice: several fields on the source pages arrive double-encoded
/// (`&amp;amp;`). Running the decoder over already-decoded text changes
/// nothing, so this is safe for singly-encoded values too.
pub fn decode_entities_twice(text: &str) -> String {
    decode_entities(&decode_entities(text))
}

/// Replaces characters that are invalid in file names.
pub fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '|' | '?' | '*' => '_',
            '/' | '\\' => '-',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}
