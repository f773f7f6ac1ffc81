pub mod config;
pub mod database;
pub mod entity;
pub mod error;
pub mod model;
pub mod remote;
pub mod repository;
pub mod usecase;
pub mod utils;
pub mod viewmodel;

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use config::AppConfig;
use database::repository::settings_repository::SettingsRepository;
use database::{FavoriteStore, NoopFavoriteStore, SqliteFavoriteStore};
use error::CatalogResult;
use remote::{CatalogApi, Ordering, RawgClient};
use repository::CatalogRepository;
use usecase::UseCases;
use utils::date::format_release_date;
use utils::logs::init_logging;
use viewmodel::{
    CollectionsViewModel, FavoritesViewModel, FeedSource, GameDetailsViewModel,
    GameListViewModel, GenresViewModel, PublishersViewModel, UiState,
};

/// 应用上下文：持有配置、数据库连接与全部用例，负责创建各界面的视图模型
pub struct AppContext {
    config: AppConfig,
    db: Option<DatabaseConnection>,
    use_cases: UseCases,
}

impl AppContext {
    /// 打开默认位置的数据库并完成初始化
    ///
    /// 数据库不可用时退化为不持久化收藏，浏览功能不受影响
    pub async fn init(config: AppConfig) -> CatalogResult<Self> {
        let db = match catalog_path::get_db_path() {
            Ok(path) => match database::db::establish_connection(&path).await {
                Ok(conn) => {
                    log::info!("数据库连接建立成功");
                    Some(conn)
                }
                Err(e) => {
                    log::error!("无法建立数据库连接，收藏功能不可用: {}", e);
                    None
                }
            },
            Err(e) => {
                log::error!("无法获取数据库路径，收藏功能不可用: {}", e);
                None
            }
        };
        Self::with_database(config, db).await
    }

    /// 使用给定的数据库连接初始化，远端接口使用 RAWG 客户端
    pub async fn with_database(
        mut config: AppConfig,
        db: Option<DatabaseConnection>,
    ) -> CatalogResult<Self> {
        if let Some(conn) = &db {
            Self::apply_stored_settings(&mut config, conn).await?;
        }
        if !config.has_api_key() {
            log::warn!("未配置 RAWG API key，请求可能被服务端拒绝");
        }
        let api: Arc<dyn CatalogApi> = Arc::new(RawgClient::new(&config)?);
        Ok(Self::from_parts(config, api, db))
    }

    /// 由现成的组件组装上下文
    pub fn from_parts(
        config: AppConfig,
        api: Arc<dyn CatalogApi>,
        db: Option<DatabaseConnection>,
    ) -> Self {
        let favorites: Arc<dyn FavoriteStore> = match &db {
            Some(conn) => Arc::new(SqliteFavoriteStore::new(conn.clone())),
            None => Arc::new(NoopFavoriteStore),
        };
        let repo = Arc::new(CatalogRepository::new(api, favorites));
        Self {
            config,
            db,
            use_cases: UseCases::new(repo),
        }
    }

    /// settings 表中的 API key 仅在配置文件与环境变量都未提供时生效；
    /// 默认排序以应用内的设置为准
    async fn apply_stored_settings(
        config: &mut AppConfig,
        conn: &DatabaseConnection,
    ) -> CatalogResult<()> {
        if !config.has_api_key() {
            if let Some(key) = SettingsRepository::get_api_key(conn).await? {
                log::debug!("使用数据库中保存的 API key");
                config.api_key = Some(key);
            }
        }
        if let Some(raw) = SettingsRepository::get_default_ordering(conn).await? {
            match raw.parse::<Ordering>() {
                Ok(ordering) => config.default_ordering = ordering,
                Err(e) => log::warn!("忽略无效的排序设置: {}", e),
            }
        }
        Ok(())
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn use_cases(&self) -> &UseCases {
        &self.use_cases
    }

    pub fn has_persistence(&self) -> bool {
        self.db.is_some()
    }

    // ==================== 视图模型 ====================

    /// 首页：按默认排序浏览全部游戏
    pub fn home_view_model(&self) -> GameListViewModel {
        self.game_list_view_model(FeedSource::All(self.config.default_ordering))
    }

    pub fn game_list_view_model(&self, source: FeedSource) -> GameListViewModel {
        GameListViewModel::new(self.use_cases.clone(), source, self.config.page_size)
    }

    pub fn game_details_view_model(&self) -> GameDetailsViewModel {
        GameDetailsViewModel::new(self.use_cases.clone())
    }

    pub fn genres_view_model(&self) -> GenresViewModel {
        GenresViewModel::genres(&self.use_cases, self.config.page_size)
    }

    pub fn publishers_view_model(&self) -> PublishersViewModel {
        PublishersViewModel::publishers(&self.use_cases, self.config.page_size)
    }

    pub fn collections_view_model(&self) -> CollectionsViewModel {
        CollectionsViewModel::collections(&self.use_cases, self.config.page_size)
    }

    pub fn favorites_view_model(&self) -> FavoritesViewModel {
        FavoritesViewModel::new(self.use_cases.clone())
    }

    // ==================== 用户设置 ====================

    /// 保存 API key（下次启动生效）
    pub async fn save_api_key(&self, key: String) -> Result<(), String> {
        let conn = self.db.as_ref().ok_or("数据库连接不可用")?;
        SettingsRepository::set_api_key(conn, key)
            .await
            .map_err(|e| format!("保存 API key 失败: {}", e))
    }

    /// 保存默认排序方式（下次启动生效）
    pub async fn save_default_ordering(&self, ordering: Ordering) -> Result<(), String> {
        let conn = self.db.as_ref().ok_or("数据库连接不可用")?;
        SettingsRepository::set_default_ordering(conn, ordering.as_param().to_string())
            .await
            .map_err(|e| format!("保存排序设置失败: {}", e))
    }

    /// 关闭数据库连接
    pub async fn shutdown(self) {
        if let Some(conn) = self.db {
            match database::db::close_connection(conn).await {
                Ok(_) => log::info!("数据库连接已成功关闭"),
                Err(e) => log::error!("关闭数据库连接时出错: {}", e),
            }
        }
    }
}

/// 无界面入口：加载首页并以文本形式输出
pub fn run() {
    let loaded = AppConfig::load();
    let config = loaded.config;
    init_logging(&config.log_level);
    for warning in &loaded.warnings {
        log::warn!("{}，已跳过该配置项", warning);
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("error while building async runtime");

    runtime.block_on(async move {
        let ctx = match AppContext::init(config).await {
            Ok(ctx) => ctx,
            Err(e) => {
                log::error!("初始化失败: {}", e);
                eprintln!("{}", e.user_message());
                return;
            }
        };

        let home = ctx.home_view_model();
        home.refresh().await;
        match home.state() {
            UiState::Success(feed) => {
                println!("共 {} 款游戏，显示前 {} 款", feed.total, feed.games.len());
                for game in &feed.games {
                    println!(
                        "{:>8}  {:<48} {:>4.2}  {}",
                        game.id,
                        game.name,
                        game.rating,
                        format_release_date(game.release_date, game.tba)
                    );
                }
            }
            UiState::Error(message) => eprintln!("{}", message),
            UiState::Loading => {}
        }

        ctx.shutdown().await;
    });
}
