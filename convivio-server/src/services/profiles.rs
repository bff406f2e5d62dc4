use convivio_core::{
    new_id, normalize_https, now_timestamp, strip_html, AddEducationRequest, AddExperienceRequest,
    Education, Experience, Profile, SkillsInput, Social, UpsertProfileRequest, UserRef,
};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

use crate::error::ApiError;

const PROFILE_SELECT: &str = "SELECT p.user_id, u.name, u.avatar, p.company, p.website, \
     p.location, p.bio, p.status, p.githubusername, p.skills, p.social, p.experience, \
     p.education, p.created_at \
     FROM profiles p JOIN users u ON u.user_id = p.user_id";

// Ricostruisce il profilo da una riga del join profili/utenti:
// le collezioni annidate sono colonne JSON.
fn profile_from_row(row: &SqliteRow) -> Result<Profile, ApiError> {
    let skills: Vec<String> = serde_json::from_str(&row.try_get::<String, _>("skills")?)?;
    let social: Social = serde_json::from_str(&row.try_get::<String, _>("social")?)?;
    let experience: Vec<Experience> =
        serde_json::from_str(&row.try_get::<String, _>("experience")?)?;
    let education: Vec<Education> = serde_json::from_str(&row.try_get::<String, _>("education")?)?;

    Ok(Profile {
        user: UserRef {
            user_id: row.try_get("user_id")?,
            name: row.try_get("name")?,
            avatar: row.try_get("avatar")?,
        },
        company: row.try_get("company")?,
        website: row.try_get("website")?,
        location: row.try_get("location")?,
        bio: row.try_get("bio")?,
        status: row.try_get("status")?,
        githubusername: row.try_get("githubusername")?,
        skills,
        social,
        experience,
        education,
        created_at: row.try_get("created_at")?,
    })
}

async fn find_profile(pool: &SqlitePool, user_id: &str) -> Result<Option<Profile>, ApiError> {
    let row = sqlx::query(&format!("{} WHERE p.user_id = ?", PROFILE_SELECT))
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    row.as_ref().map(profile_from_row).transpose()
}

fn no_profile() -> ApiError {
    ApiError::NotFound("There is no profile for this user".to_string())
}

/// Profilo dell'utente autenticato, con name/avatar dal join.
pub async fn get_own_profile(pool: &SqlitePool, user_id: &str) -> Result<Profile, ApiError> {
    find_profile(pool, user_id).await?.ok_or_else(no_profile)
}

/// Lookup pubblico per id utente.
pub async fn get_profile_by_user(pool: &SqlitePool, user_id: &str) -> Result<Profile, ApiError> {
    find_profile(pool, user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Profile not found".to_string()))
}

/// Tutti i profili, lettura pubblica.
pub async fn list_profiles(pool: &SqlitePool) -> Result<Vec<Profile>, ApiError> {
    let rows = sqlx::query(PROFILE_SELECT).fetch_all(pool).await?;
    rows.iter().map(profile_from_row).collect()
}

fn clean(value: &Option<String>) -> String {
    value.as_deref().map(strip_html).unwrap_or_default()
}

// Link social: entra solo se valorizzato, sanificato e forzato a https.
fn social_link(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| normalize_https(&strip_html(s)))
}

/// Crea o sostituisce il profilo dell'utente in un'unica scrittura keyed su user_id.
/// L'upsert tocca solo i campi del profilo: esperienze, studi e data di creazione
/// sopravvivono agli aggiornamenti.
pub async fn upsert_profile(
    pool: &SqlitePool,
    user_id: &str,
    req: UpsertProfileRequest,
) -> Result<Profile, ApiError> {
    let skills: Vec<String> = match &req.skills {
        SkillsInput::List(list) => list.iter().map(|s| strip_html(s)).collect(),
        // input CSV: split, trim, sanifica e prefissa con uno spazio, il
        // formato che i client esistenti si aspettano di rileggere
        SkillsInput::Csv(csv) => csv
            .split(',')
            .map(|s| format!(" {}", strip_html(s.trim())))
            .collect(),
    };

    let website = req
        .website
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| normalize_https(&strip_html(s)))
        .unwrap_or_default();

    let social = Social {
        youtube: social_link(&req.youtube),
        twitter: social_link(&req.twitter),
        facebook: social_link(&req.facebook),
        linkedin: social_link(&req.linkedin),
        instagram: social_link(&req.instagram),
    };

    sqlx::query(
        "INSERT INTO profiles (user_id, company, website, location, bio, status, \
         githubusername, skills, social, experience, education, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) \
         ON CONFLICT(user_id) DO UPDATE SET \
         company = excluded.company, website = excluded.website, \
         location = excluded.location, bio = excluded.bio, status = excluded.status, \
         githubusername = excluded.githubusername, skills = excluded.skills, \
         social = excluded.social",
    )
    .bind(user_id)
    .bind(clean(&req.company))
    .bind(&website)
    .bind(clean(&req.location))
    .bind(clean(&req.bio))
    .bind(strip_html(&req.status))
    .bind(clean(&req.githubusername))
    .bind(serde_json::to_string(&skills)?)
    .bind(serde_json::to_string(&social)?)
    .bind("[]")
    .bind("[]")
    .bind(now_timestamp())
    .execute(pool)
    .await?;

    find_profile(pool, user_id).await?.ok_or_else(no_profile)
}

/// Cancella profilo e utente insieme, in un'unica transazione; i post cadono
/// solo se il flag di cascata è attivo.
pub async fn delete_account(
    pool: &SqlitePool,
    user_id: &str,
    cascade_posts: bool,
) -> Result<(), ApiError> {
    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM profiles WHERE user_id = ?")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;
    if cascade_posts {
        sqlx::query("DELETE FROM posts WHERE user_id = ?")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
    }
    sqlx::query("DELETE FROM users WHERE user_id = ?")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(())
}

async fn load_experience(pool: &SqlitePool, user_id: &str) -> Result<Vec<Experience>, ApiError> {
    let row = sqlx::query("SELECT experience FROM profiles WHERE user_id = ?")
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(no_profile)?;
    Ok(serde_json::from_str(&row.try_get::<String, _>("experience")?)?)
}

async fn store_experience(
    pool: &SqlitePool,
    user_id: &str,
    items: &[Experience],
) -> Result<(), ApiError> {
    sqlx::query("UPDATE profiles SET experience = ? WHERE user_id = ?")
        .bind(serde_json::to_string(items)?)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Aggiunge un'esperienza in testa alla sequenza (la più recente per prima).
pub async fn add_experience(
    pool: &SqlitePool,
    user_id: &str,
    req: AddExperienceRequest,
) -> Result<Profile, ApiError> {
    let mut items = load_experience(pool, user_id).await?;
    let entry = Experience {
        id: new_id(),
        title: strip_html(&req.title),
        company: strip_html(&req.company),
        location: clean(&req.location),
        from: strip_html(&req.from),
        to: req.to.as_deref().map(strip_html),
        current: req.current,
        description: clean(&req.description),
    };
    items.insert(0, entry);
    store_experience(pool, user_id, &items).await?;
    find_profile(pool, user_id).await?.ok_or_else(no_profile)
}

/// Rimuove l'esperienza con l'id dato. Id sconosciuto: nessun errore,
/// la sequenza resta com'è e viene comunque ri-persistita.
pub async fn remove_experience(
    pool: &SqlitePool,
    user_id: &str,
    exp_id: &str,
) -> Result<Profile, ApiError> {
    let mut items = load_experience(pool, user_id).await?;
    items.retain(|e| e.id != exp_id);
    store_experience(pool, user_id, &items).await?;
    find_profile(pool, user_id).await?.ok_or_else(no_profile)
}

async fn load_education(pool: &SqlitePool, user_id: &str) -> Result<Vec<Education>, ApiError> {
    let row = sqlx::query("SELECT education FROM profiles WHERE user_id = ?")
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(no_profile)?;
    Ok(serde_json::from_str(&row.try_get::<String, _>("education")?)?)
}

async fn store_education(
    pool: &SqlitePool,
    user_id: &str,
    items: &[Education],
) -> Result<(), ApiError> {
    sqlx::query("UPDATE profiles SET education = ? WHERE user_id = ?")
        .bind(serde_json::to_string(items)?)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Aggiunge un percorso di studi in testa alla sequenza.
pub async fn add_education(
    pool: &SqlitePool,
    user_id: &str,
    req: AddEducationRequest,
) -> Result<Profile, ApiError> {
    let mut items = load_education(pool, user_id).await?;
    let entry = Education {
        id: new_id(),
        school: strip_html(&req.school),
        degree: strip_html(&req.degree),
        fieldofstudy: clean(&req.fieldofstudy),
        from: strip_html(&req.from),
        to: req.to.as_deref().map(strip_html),
        current: req.current,
        description: clean(&req.description),
    };
    items.insert(0, entry);
    store_education(pool, user_id, &items).await?;
    find_profile(pool, user_id).await?.ok_or_else(no_profile)
}

/// Rimozione per id, stesse regole dell'esperienza.
pub async fn remove_education(
    pool: &SqlitePool,
    user_id: &str,
    edu_id: &str,
) -> Result<Profile, ApiError> {
    let mut items = load_education(pool, user_id).await?;
    items.retain(|e| e.id != edu_id);
    store_education(pool, user_id, &items).await?;
    find_profile(pool, user_id).await?.ok_or_else(no_profile)
}
