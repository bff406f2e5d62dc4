use serde::{Deserialize, Serialize};

/// Utente esposto al client/server sul wire (mai l'hash della credenziale).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: String,
    pub name: String,
    pub email: String,
    /// URL dell'avatar derivato dall'e-mail alla registrazione.
    pub avatar: String,
    pub created_at: String, // RFC3339 UTC
}

/// Proiezione minima dell'utente, unita a profili e post in lettura.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRef {
    pub user_id: String,
    pub name: String,
    pub avatar: String,
}
