/// Normalizza un URL forzando lo schema https.
/// Stringa vuota (o soli spazi) resta vuota: il campo assente si salva come "".
pub fn normalize_https(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    let rest = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
        .or_else(|| trimmed.strip_prefix("//"))
        .unwrap_or(trimmed);
    format!("https://{}", rest)
}
