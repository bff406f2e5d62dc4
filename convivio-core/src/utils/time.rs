use time::{format_description::well_known::Rfc3339, OffsetDateTime};

/// Restituisce l'istante corrente in UTC formattato come RFC3339 (es. "2025-11-02T12:34:56Z").
/// I nanosecondi vengono azzerati così le stringhe hanno lunghezza fissa e
/// l'ordinamento lessicografico coincide con quello temporale.
pub fn now_timestamp() -> String {
    let now = OffsetDateTime::now_utc()
        .replace_nanosecond(0)
        .expect("zero is a valid nanosecond");
    now.format(&Rfc3339).expect("error formatting timestamp")
}
