use crate::entity::prelude::*;
use crate::entity::settings;
use sea_orm::*;

/// 用户设置仓库
pub struct SettingsRepository;

impl SettingsRepository {
    /// 读取设置记录，不存在时创建（ID 固定为 1）
    async fn ensure_settings(db: &DatabaseConnection) -> Result<settings::Model, DbErr> {
        if let Some(existing) = Settings::find_by_id(1).one(db).await? {
            return Ok(existing);
        }

        let record = settings::ActiveModel {
            id: Set(1),
            api_key: Set(None),
            default_ordering: Set(None),
        };
        record.insert(db).await
    }

    /// 获取保存的 API key，未设置时返回 None
    pub async fn get_api_key(db: &DatabaseConnection) -> Result<Option<String>, DbErr> {
        let record = Self::ensure_settings(db).await?;
        Ok(record.api_key.filter(|k| !k.is_empty()))
    }

    /// 设置 API key，传入空字符串表示清除
    pub async fn set_api_key(db: &DatabaseConnection, key: String) -> Result<(), DbErr> {
        let record = Self::ensure_settings(db).await?;

        let mut active: settings::ActiveModel = record.into();
        let key = key.trim().to_string();
        active.api_key = Set((!key.is_empty()).then_some(key));

        active.update(db).await?;
        Ok(())
    }

    /// 获取默认排序方式（接口参数形式，如 `-rating`）
    pub async fn get_default_ordering(db: &DatabaseConnection) -> Result<Option<String>, DbErr> {
        let record = Self::ensure_settings(db).await?;
        Ok(record.default_ordering)
    }

    /// 设置默认排序方式
    pub async fn set_default_ordering(
        db: &DatabaseConnection,
        ordering: String,
    ) -> Result<(), DbErr> {
        let record = Self::ensure_settings(db).await?;

        let mut active: settings::ActiveModel = record.into();
        active.default_ordering = Set(Some(ordering));

        active.update(db).await?;
        Ok(())
    }
}
