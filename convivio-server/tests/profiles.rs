use anyhow::Result;
use convivio_core::{
    AddEducationRequest, AddExperienceRequest, CreatePostRequest, RegisterRequest,
    RegisterResponse, SkillsInput, UpsertProfileRequest,
};
use convivio_server::auth::AuthUser;
use convivio_server::error::ApiError;
use convivio_server::services::{posts, profiles, users};
use convivio_server::{connect_pool, run_migrations, sqlite_url_for_path};
use sqlx::SqlitePool;
use tempfile::TempDir;

// Pool su file temporaneo con migrazioni applicate; il TempDir va tenuto vivo.
async fn setup() -> Result<(TempDir, SqlitePool)> {
    let td = TempDir::new()?;
    let url = sqlite_url_for_path(td.path().join("convivio.db").as_path())?;
    let pool = connect_pool(&url).await?;
    run_migrations(&pool).await?;
    Ok((td, pool))
}

async fn register(pool: &SqlitePool, name: &str, email: &str) -> Result<RegisterResponse> {
    Ok(users::register(
        pool,
        RegisterRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: "segretissima".to_string(),
        },
    )
    .await?)
}

fn base_request(status: &str, skills: SkillsInput) -> UpsertProfileRequest {
    UpsertProfileRequest {
        company: None,
        website: None,
        location: None,
        bio: None,
        status: status.to_string(),
        githubusername: None,
        skills,
        youtube: None,
        twitter: None,
        facebook: None,
        linkedin: None,
        instagram: None,
    }
}

fn exp_request(title: &str) -> AddExperienceRequest {
    AddExperienceRequest {
        title: title.to_string(),
        company: "ACME".to_string(),
        location: None,
        from: "2020-01-01".to_string(),
        to: None,
        current: false,
        description: None,
    }
}

/*
    Obiettivo test: due upsert consecutivi per lo stesso utente devono lasciare
    una sola riga profilo, con i campi dell'ultimo upsert.
*/
#[tokio::test]
async fn upsert_twice_keeps_one_profile_with_latest_fields() -> Result<()> {
    let (_td, pool) = setup().await?;
    let reg = register(&pool, "Alice", "alice@example.com").await?;
    let user_id = reg.user.user_id;

    let mut first = base_request("Developer", SkillsInput::Csv("js".to_string()));
    first.company = Some("ACME".to_string());
    profiles::upsert_profile(&pool, &user_id, first).await?;

    let mut second = base_request("Senior Developer", SkillsInput::Csv("rust".to_string()));
    second.company = Some("Officina".to_string());
    let profile = profiles::upsert_profile(&pool, &user_id, second).await?;

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM profiles WHERE user_id = ?")
        .bind(&user_id)
        .fetch_one(&pool)
        .await?;
    assert_eq!(count, 1);
    assert_eq!(profile.status, "Senior Developer");
    assert_eq!(profile.company, "Officina");
    assert_eq!(profile.user.name, "Alice");
    Ok(())
}

/*
    Obiettivo test: l'input skills come stringa CSV viene diviso, trimmato e
    prefissato con uno spazio, il formato che i client storici rileggono.
*/
#[tokio::test]
async fn skills_csv_is_split_with_leading_space() -> Result<()> {
    let (_td, pool) = setup().await?;
    let reg = register(&pool, "Alice", "alice@example.com").await?;

    let req = base_request("Developer", SkillsInput::Csv("js,node".to_string()));
    let profile = profiles::upsert_profile(&pool, &reg.user.user_id, req).await?;

    assert_eq!(profile.skills, vec![" js".to_string(), " node".to_string()]);
    Ok(())
}

// La lista già divisa passa com'è, a parte la sanificazione elemento per elemento.
#[tokio::test]
async fn skills_list_is_sanitized_but_not_reformatted() -> Result<()> {
    let (_td, pool) = setup().await?;
    let reg = register(&pool, "Alice", "alice@example.com").await?;

    let req = base_request(
        "Developer",
        SkillsInput::List(vec!["<b>js</b>".to_string(), "node".to_string()]),
    );
    let profile = profiles::upsert_profile(&pool, &reg.user.user_id, req).await?;

    assert_eq!(profile.skills, vec!["js".to_string(), "node".to_string()]);
    Ok(())
}

/*
    Obiettivo test: il testo libero viene ripulito da script prima di essere
    persistito; "<script>x</script>hello" deve salvare solo "hello".
*/
#[tokio::test]
async fn bio_is_sanitized_before_persistence() -> Result<()> {
    let (_td, pool) = setup().await?;
    let reg = register(&pool, "Alice", "alice@example.com").await?;

    let mut req = base_request("Developer", SkillsInput::Csv("js".to_string()));
    req.bio = Some("<script>x</script>hello".to_string());
    let profile = profiles::upsert_profile(&pool, &reg.user.user_id, req).await?;

    assert_eq!(profile.bio, "hello");
    Ok(())
}

/*
    Obiettivo test: website e link social vengono forzati a https; le piattaforme
    non valorizzate restano assenti dalla mappa social.
*/
#[tokio::test]
async fn website_and_social_links_are_normalized() -> Result<()> {
    let (_td, pool) = setup().await?;
    let reg = register(&pool, "Alice", "alice@example.com").await?;

    let mut req = base_request("Developer", SkillsInput::Csv("js".to_string()));
    req.website = Some("alice.dev".to_string());
    req.youtube = Some("http://youtube.com/c/alice".to_string());
    req.twitter = Some("   ".to_string());
    let profile = profiles::upsert_profile(&pool, &reg.user.user_id, req).await?;

    assert_eq!(profile.website, "https://alice.dev");
    assert_eq!(
        profile.social.youtube.as_deref(),
        Some("https://youtube.com/c/alice")
    );
    assert!(profile.social.twitter.is_none());
    assert!(profile.social.facebook.is_none());
    Ok(())
}

// L'upsert tocca solo i campi propri del profilo: le esperienze sopravvivono.
#[tokio::test]
async fn upsert_preserves_existing_experience() -> Result<()> {
    let (_td, pool) = setup().await?;
    let reg = register(&pool, "Alice", "alice@example.com").await?;
    let user_id = reg.user.user_id;

    profiles::upsert_profile(
        &pool,
        &user_id,
        base_request("Developer", SkillsInput::Csv("js".to_string())),
    )
    .await?;
    profiles::add_experience(&pool, &user_id, exp_request("Dev")).await?;

    let profile = profiles::upsert_profile(
        &pool,
        &user_id,
        base_request("Senior", SkillsInput::Csv("rust".to_string())),
    )
    .await?;

    assert_eq!(profile.experience.len(), 1);
    assert_eq!(profile.experience[0].title, "Dev");
    Ok(())
}

/*
    Obiettivo test: aggiunta in testa e rimozione per id di un'esperienza;
    la sequenza restante deve essere identica a prima, senza l'entry rimossa.
*/
#[tokio::test]
async fn add_then_remove_experience_by_id() -> Result<()> {
    let (_td, pool) = setup().await?;
    let reg = register(&pool, "Alice", "alice@example.com").await?;
    let user_id = reg.user.user_id;

    profiles::upsert_profile(
        &pool,
        &user_id,
        base_request("Developer", SkillsInput::Csv("js".to_string())),
    )
    .await?;
    profiles::add_experience(&pool, &user_id, exp_request("Junior")).await?;
    let profile = profiles::add_experience(&pool, &user_id, exp_request("Senior")).await?;

    // la più recente sta in testa
    assert_eq!(profile.experience[0].title, "Senior");
    assert_eq!(profile.experience[1].title, "Junior");

    let kept = profile.experience[1].clone();
    let removed_id = profile.experience[0].id.clone();
    let after = profiles::remove_experience(&pool, &user_id, &removed_id).await?;

    assert_eq!(after.experience, vec![kept]);
    Ok(())
}

// Id sconosciuto: nessun errore e sequenza invariata.
#[tokio::test]
async fn remove_experience_with_unknown_id_is_a_noop() -> Result<()> {
    let (_td, pool) = setup().await?;
    let reg = register(&pool, "Alice", "alice@example.com").await?;
    let user_id = reg.user.user_id;

    profiles::upsert_profile(
        &pool,
        &user_id,
        base_request("Developer", SkillsInput::Csv("js".to_string())),
    )
    .await?;
    let before = profiles::add_experience(&pool, &user_id, exp_request("Dev")).await?;

    let after = profiles::remove_experience(&pool, &user_id, "id-inesistente").await?;
    assert_eq!(after.experience, before.experience);
    Ok(())
}

/*
    Obiettivo test: il percorso studi ha la stessa semantica dell'esperienza,
    su una sequenza indipendente.
*/
#[tokio::test]
async fn add_then_remove_education_by_id() -> Result<()> {
    let (_td, pool) = setup().await?;
    let reg = register(&pool, "Alice", "alice@example.com").await?;
    let user_id = reg.user.user_id;

    profiles::upsert_profile(
        &pool,
        &user_id,
        base_request("Developer", SkillsInput::Csv("js".to_string())),
    )
    .await?;

    let req = AddEducationRequest {
        school: "Politecnico".to_string(),
        degree: "Laurea".to_string(),
        fieldofstudy: Some("Informatica".to_string()),
        from: "2015-09-01".to_string(),
        to: Some("2018-07-01".to_string()),
        current: false,
        description: None,
    };
    let profile = profiles::add_education(&pool, &user_id, req).await?;
    assert_eq!(profile.education.len(), 1);
    assert_eq!(profile.education[0].school, "Politecnico");
    // l'esperienza resta una sequenza separata
    assert!(profile.experience.is_empty());

    let edu_id = profile.education[0].id.clone();
    let after = profiles::remove_education(&pool, &user_id, &edu_id).await?;
    assert!(after.education.is_empty());
    Ok(())
}

// Senza profilo, /me deve rispondere not found.
#[tokio::test]
async fn own_profile_missing_is_not_found() -> Result<()> {
    let (_td, pool) = setup().await?;
    let reg = register(&pool, "Alice", "alice@example.com").await?;

    let err = profiles::get_own_profile(&pool, &reg.user.user_id)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
    Ok(())
}

/*
    Obiettivo test: la cancellazione dell'account elimina profilo e utente nella
    stessa transazione; i post restano se la cascata è disattiva.
*/
#[tokio::test]
async fn delete_account_removes_profile_and_user_but_keeps_posts() -> Result<()> {
    let (_td, pool) = setup().await?;
    let reg = register(&pool, "Alice", "alice@example.com").await?;
    let user_id = reg.user.user_id.clone();
    let author = AuthUser {
        user_id: user_id.clone(),
        name: reg.user.name.clone(),
        avatar: reg.user.avatar.clone(),
    };

    profiles::upsert_profile(
        &pool,
        &user_id,
        base_request("Developer", SkillsInput::Csv("js".to_string())),
    )
    .await?;
    posts::create_post(
        &pool,
        &author,
        CreatePostRequest {
            text: "ciao".to_string(),
        },
    )
    .await?;

    profiles::delete_account(&pool, &user_id, false).await?;

    let profile_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM profiles WHERE user_id = ?")
        .bind(&user_id)
        .fetch_one(&pool)
        .await?;
    let user_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE user_id = ?")
        .bind(&user_id)
        .fetch_one(&pool)
        .await?;
    let post_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts WHERE user_id = ?")
        .bind(&user_id)
        .fetch_one(&pool)
        .await?;

    assert_eq!(profile_count, 0);
    assert_eq!(user_count, 0);
    assert_eq!(post_count, 1, "posts survive without cascade");
    Ok(())
}

// Con la cascata attiva cadono anche i post dell'utente.
#[tokio::test]
async fn delete_account_with_cascade_removes_posts() -> Result<()> {
    let (_td, pool) = setup().await?;
    let reg = register(&pool, "Alice", "alice@example.com").await?;
    let user_id = reg.user.user_id.clone();
    let author = AuthUser {
        user_id: user_id.clone(),
        name: reg.user.name.clone(),
        avatar: reg.user.avatar.clone(),
    };

    posts::create_post(
        &pool,
        &author,
        CreatePostRequest {
            text: "ciao".to_string(),
        },
    )
    .await?;

    profiles::delete_account(&pool, &user_id, true).await?;

    let post_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts WHERE user_id = ?")
        .bind(&user_id)
        .fetch_one(&pool)
        .await?;
    assert_eq!(post_count, 0);
    Ok(())
}

/*
    Obiettivo test: registrazione con e-mail già usata deve fallire con 400
    e il login con credenziali sbagliate con 401.
*/
#[tokio::test]
async fn register_duplicate_email_and_bad_login_fail() -> Result<()> {
    let (_td, pool) = setup().await?;
    register(&pool, "Alice", "alice@example.com").await?;

    let err = register(&pool, "Alice Bis", "alice@example.com")
        .await
        .unwrap_err();
    let api_err = err.downcast::<ApiError>()?;
    assert!(matches!(api_err, ApiError::BadRequest(_)));

    let login_err = users::login(
        &pool,
        convivio_core::LoginRequest {
            email: "alice@example.com".to_string(),
            password: "password-sbagliata".to_string(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(login_err, ApiError::Unauthorized(_)));
    Ok(())
}
