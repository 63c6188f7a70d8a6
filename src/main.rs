// region:    --- Imports
use marketplace_service::auth::TokenKeys;
use marketplace_service::config::{AppConfig, StorageBackend};
use marketplace_service::database::DatabaseManager;
use marketplace_service::handlers::{self, AppState};
use marketplace_service::store::{InMemoryMarketStore, MarketStore, PgMarketStore};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
// endregion: --- Imports

// region:    --- Main
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // logging 초기화
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .without_time()
        .with_target(false)
        .init();

    // 설정 읽기
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{:<12} --> 설정 오류: {}", "Main", e);
            return Err(e.into());
        }
    };

    let keys = TokenKeys::new(&config.jwt.secret, config.jwt.expiry_hours);

    // 저장소 생성 (시작 시 열고 종료 시 닫는다)
    let mut db_manager: Option<Arc<DatabaseManager>> = None;
    let store: Arc<dyn MarketStore> = match (config.storage, &config.database) {
        (StorageBackend::Postgres, Some(db_config)) => {
            let manager = Arc::new(DatabaseManager::new(db_config).await?);

            // 데이터베이스 초기화
            if let Err(e) = manager.initialize_database(db_config.reset_on_start).await {
                error!("{:<12} --> 데이터베이스 초기화 실패: {:?}", "Main", e);
                return Err(e.into());
            }
            info!("{:<12} --> 데이터베이스 초기화 성공", "Main");

            db_manager = Some(Arc::clone(&manager));
            Arc::new(PgMarketStore::new(manager))
        }
        _ => {
            warn!("{:<12} --> 메모리 저장소로 실행 (재시작 시 데이터 소실)", "Main");
            Arc::new(seed_memory_store(&keys).await?)
        }
    };

    let routes_all = handlers::app(
        AppState { store, keys },
        config.server.body_limit_bytes,
    );

    // 리스너 생성
    let listener = TcpListener::bind(config.bind_addr()).await?;
    info!(
        "{:<12} --> Web Server: Listening on {}",
        "Main",
        listener.local_addr()?
    );

    // 서버 실행
    if let Err(err) = axum::serve(listener, routes_all.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("{:<12} --> Server error: {}", "Main", err);
    }

    if let Some(manager) = db_manager {
        manager.close().await;
    }
    info!("{:<12} --> 서버 종료", "Main");
    Ok(())
}

/// 로컬 개발용 사용자 생성 및 토큰 출력
async fn seed_memory_store(
    keys: &TokenKeys,
) -> Result<InMemoryMarketStore, Box<dyn std::error::Error>> {
    let store = InMemoryMarketStore::new();
    let admin = store.insert_user("admin", "admin@localhost", true).await;
    let demo = store.insert_user("demo", "demo@localhost", false).await;
    for user in [&admin, &demo] {
        info!(
            "{:<12} --> 개발용 사용자 {} (id={}, admin={}) token: {}",
            "Main",
            user.username,
            user.id,
            user.admin,
            keys.issue(user.id)?
        );
    }
    Ok(store)
}

/// Ctrl+C / SIGTERM 대기
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("{:<12} --> Ctrl+C 핸들러 설치 실패: {}", "Main", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
            }
            Err(e) => {
                error!("{:<12} --> SIGTERM 핸들러 설치 실패: {}", "Main", e);
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("{:<12} --> 종료 신호 수신", "Main");
}
// endregion: --- Main
