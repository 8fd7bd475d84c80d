//! Sechub - Information-Security Asset Registry
//!
//! A REST backend for tracking organizational information-security assets.
//!
//! ## Entity graph
//!
//! - **Users / Groups**: identities and named collections, joined explicitly
//! - **Organizations -> Objects -> Infosystems -> Places**: the ownership
//!   chain of assets, each level cascading to its dependents
//! - **Projects / Checklists**: work tracked against an infosystem

use tracing::info;

use sechub::models::UserPayload;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = sechub::Config::from_env();

    info!(
        database = config.database_url.as_str(),
        bind_address = config.bind_address.as_str(),
        "Starting Sechub service"
    );

    let db = sechub::Database::new(&config.database_url).await?;

    let purged = db
        .purge_expired_refresh_tokens(&chrono::Utc::now().to_rfc3339())
        .await?;
    if purged > 0 {
        info!(purged, "Expired refresh tokens removed");
    }

    // Seed the bootstrap superuser on an empty database.
    if let Some(admin) = &config.admin {
        if db.count_users().await? == 0 {
            let payload = UserPayload {
                username: Some(admin.username.clone()),
                name: Some(admin.name.clone()),
                surname: Some(admin.surname.clone()),
                middle_name: None,
                phone: Some(admin.phone.clone()),
                email: Some(admin.email.clone()),
                password: Some(admin.password.clone()),
                is_superuser: Some(true),
                is_active: Some(true),
            };
            let user = sechub::identity::create_superuser(&db, &payload).await?;
            info!(user_id = user.id, username = %user.username, "Bootstrap superuser created");
        }
    }

    let state = sechub::AppState::new(db, &config);
    let app = sechub::routes(state);

    info!("Listening on {}", config.bind_address);
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Shutdown signal received");
            }
        })
        .await?;

    Ok(())
}
