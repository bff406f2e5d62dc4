use uuid::Uuid;

/// Genera un nuovo identificatore unico (UUIDv4) come stringa.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}
