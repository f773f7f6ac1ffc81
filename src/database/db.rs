use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr, RuntimeErr};
use std::fs;
use std::path::Path;
use std::time::Duration;
use url::Url;

// ==================== 数据库连接管理 ====================

/// Establish a SeaORM database connection and run pending migrations.
pub async fn establish_connection(db_path: &Path) -> Result<DatabaseConnection, DbErr> {
    // 1. 确保数据库所在的目录存在
    if !db_path.exists() {
        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                DbErr::Conn(RuntimeErr::Internal(format!("无法创建数据库目录: {}", e)))
            })?;
        }
        log::info!("首次启动，创建数据库: {}", db_path.display());
    } else {
        log::info!("使用数据库: {}", db_path.display());
    }

    // 2. 使用 `url` crate 安全地构建连接字符串
    let db_url = Url::from_file_path(db_path).map_err(|_| {
        DbErr::Conn(RuntimeErr::Internal(format!(
            "Invalid database path: {}",
            db_path.display()
        )))
    })?;
    let connection_string = format!("sqlite:{}?mode=rwc", db_url.path());

    // 3. 设置连接选项
    let mut options = ConnectOptions::new(connection_string);
    options
        .max_connections(1)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(8))
        .sqlx_logging(false);

    // 4. 连接数据库并执行迁移
    let conn = Database::connect(options).await?;
    run_migrations(&conn).await?;
    Ok(conn)
}

/// 建立内存数据库连接（测试及无持久化场景使用）
pub async fn connect_in_memory() -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new("sqlite::memory:");
    // 内存库每个连接相互独立，必须限制为单连接
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let conn = Database::connect(options).await?;
    run_migrations(&conn).await?;
    Ok(conn)
}

async fn run_migrations(conn: &DatabaseConnection) -> Result<(), DbErr> {
    log::info!("开始执行数据库迁移...");
    match Migrator::up(conn, None).await {
        Ok(_) => {
            log::info!("数据库迁移完成");
            Ok(())
        }
        Err(e) => {
            log::error!("数据库迁移失败: {}", e);
            Err(e)
        }
    }
}

/// 关闭数据库连接
pub async fn close_connection(conn: DatabaseConnection) -> Result<(), DbErr> {
    conn.close().await?;
    Ok(())
}
