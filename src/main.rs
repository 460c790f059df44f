use billing_backend::{config::Config, database, jobs, store::Store, AppState};
use dotenvy::dotenv;
use tokio::sync::watch;

#[tokio::main]
async fn main() {
    dotenv().ok();
    env_logger::init();

    let config = Config::from_env().expect("configuration error");

    let pool = database::create_database_pool(&config.database_url)
        .await
        .expect("failed to connect to database");

    database::run_migrations(&pool)
        .await
        .expect("failed to run migrations");
    log::info!("database ready");

    let store = Store::new(pool);

    let (shutdown_tx, shutdown_rx) = watch::channel(());
    let cleanup = tokio::spawn(jobs::run_item_cleanup(store.clone(), shutdown_rx));

    let state = AppState::new(config.clone(), store);
    let app = billing_backend::create_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind listener");
    log::info!("server listening on {}", addr);

    if let Err(err) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        log::error!("server error: {}", err);
    }

    let _ = shutdown_tx.send(());
    let _ = cleanup.await;
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(_) => std::future::pending().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
