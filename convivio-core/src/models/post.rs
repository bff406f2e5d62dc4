use serde::{Deserialize, Serialize};

/// Riferimento utente in un like: al più uno per utente per post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Like {
    pub user: String,
}

/// Commento annidato nel post, il più recente per primo.
/// name/avatar sono snapshot dell'autore al momento della creazione.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub user: String,
    pub text: String,
    pub name: String,
    pub avatar: String,
    pub created_at: String, // RFC3339 UTC
}

/// Post: il riferimento al proprietario è fissato alla creazione e immutabile;
/// name/avatar sono snapshot, non seguono le modifiche successive del profilo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub post_id: String,
    pub user: String,
    pub text: String,
    pub name: String,
    pub avatar: String,
    pub likes: Vec<Like>,
    pub comments: Vec<Comment>,
    pub created_at: String, // RFC3339 UTC
}
