use directories::ProjectDirs;
use std::path::PathBuf;

/// 数据目录相关路径常量
pub const DB_DATA_DIR: &str = "data";
pub const DB_FILE_NAME: &str = "game_catalog.db";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const RESOURCE_DIR: &str = "resources";

/// 判断是否处于便携模式
///
/// 检测逻辑：检查可执行文件同级目录下是否存在 resources/data 目录
pub fn is_portable_mode() -> bool {
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            return exe_dir.join(RESOURCE_DIR).join(DB_DATA_DIR).is_dir();
        }
    }
    false
}

/// 获取基础数据目录
pub fn get_base_data_dir() -> Result<PathBuf, String> {
    get_base_data_dir_for_mode(is_portable_mode())
}

/// 获取指定模式的基础数据目录
pub fn get_base_data_dir_for_mode(portable: bool) -> Result<PathBuf, String> {
    if portable {
        // 便携模式：使用可执行文件所在目录的 resources 子目录
        let exe_path =
            std::env::current_exe().map_err(|e| format!("无法获取可执行文件路径: {}", e))?;
        let exe_dir = exe_path
            .parent()
            .ok_or_else(|| "无法获取可执行文件父目录".to_string())?;
        Ok(exe_dir.join(RESOURCE_DIR))
    } else {
        get_system_data_dir()
    }
}

fn project_dirs() -> Result<ProjectDirs, String> {
    ProjectDirs::from("io", "gamecatalog", "game-catalog")
        .ok_or_else(|| "无法获取系统目录信息".to_string())
}

/// 获取系统数据目录（跨平台）
fn get_system_data_dir() -> Result<PathBuf, String> {
    Ok(project_dirs()?.data_dir().to_path_buf())
}

/// 获取系统配置目录；便携模式下与数据目录相同
pub fn get_config_dir() -> Result<PathBuf, String> {
    if is_portable_mode() {
        return get_base_data_dir_for_mode(true);
    }
    Ok(project_dirs()?.config_dir().to_path_buf())
}

/// 获取数据库文件路径
pub fn get_db_path() -> Result<PathBuf, String> {
    Ok(get_base_data_dir()?.join(DB_DATA_DIR).join(DB_FILE_NAME))
}

/// 获取配置文件路径
pub fn get_config_path() -> Result<PathBuf, String> {
    Ok(get_config_dir()?.join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn db_path_ends_with_data_file() {
        let path = get_db_path().unwrap();
        assert!(path.ends_with(PathBuf::from(DB_DATA_DIR).join(DB_FILE_NAME)));
    }

    #[test]
    fn system_dirs_share_one_project() {
        let dirs = project_dirs().unwrap();
        assert_eq!(get_system_data_dir().unwrap(), dirs.data_dir());
        if !is_portable_mode() {
            assert_eq!(get_config_dir().unwrap(), dirs.config_dir());
        }
    }

    #[test]
    fn config_path_uses_config_file_name() {
        let path = get_config_path().unwrap();
        assert_eq!(path.file_name().unwrap(), CONFIG_FILE_NAME);
    }
}
