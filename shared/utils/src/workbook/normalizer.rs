use mechbi_models::Table;

/// Strips surrounding whitespace from every header in place.
pub fn normalize_headers(table: &mut Table) {
    for header in table.headers_mut() {
        let trimmed = header.trim();
        if trimmed.len() != header.len() {
            *header = trimmed.to_string();
        }
    }
}
