// config.rs — 配置管理模块
// 遵循 Unix 风格：优先从 ~/.config/textwall/config.toml 读取配置

use crate::render::DEFAULT_FONT_SIZE;
use schemars::JsonSchema; // 引入用于生成 JSON Schema 的 trait
use serde::{Deserialize, Serialize}; // 引入序列化与反序列化 trait
use shellexpand::tilde; // 用于展开 ~ 和环境变量
use std::env; // 环境变量模块
use std::fs; // 文件系统模块
use std::path::{Path, PathBuf}; // 路径处理类型

/// 展开路径中的 ~ 和环境变量 ($HOME, $XDG_CONFIG_HOME 等)
/// 支持格式: ~/path, $HOME/path, ${HOME}/path
fn expand_path(path_str: &str) -> PathBuf {
    let expanded = tilde(path_str).into_owned();
    PathBuf::from(expanded)
}

/// 映射 config.toml 文件内容的嵌套结构体
#[derive(Debug, Deserialize, Serialize, Default, JsonSchema)]
struct ConfigFile {
    #[serde(default)]
    common: CommonConfig,
    #[serde(default)]
    source: SourceConfigs,
}

#[derive(Debug, Deserialize, Serialize, Default, JsonSchema)]
struct CommonConfig {
    /// 搜索下载图片的保存目录 (支持 ~、$HOME 等环境变量，相对路径则相对于 $HOME)
    download_dir: Option<String>,
    /// 渲染用的字体文件路径，不配置则按系统候选列表查找
    font_path: Option<String>,
    /// 渲染字号（像素）
    #[serde(default)]
    font_size: Option<u32>,
    /// 默认搜索参数
    #[serde(default)]
    search: SearchDefaults,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct SearchDefaults {
    /// 默认搜索关键词
    #[serde(default)]
    pub query: Option<String>,
    /// 屏幕分辨率，下载的图片会缩放裁剪到这个尺寸
    #[serde(default = "default_resolution")]
    pub resolution: String,
}

impl Default for SearchDefaults {
    fn default() -> Self {
        Self {
            query: None,
            resolution: default_resolution(),
        }
    }
}

fn default_resolution() -> String {
    "1920x1080".to_string()
}

#[derive(Debug, Deserialize, Serialize, Default, JsonSchema)]
struct SourceConfigs {
    #[serde(default)]
    unsplash: UnsplashConfig,
}

#[derive(Debug, Deserialize, Serialize, Default, JsonSchema)]
struct UnsplashConfig {
    access_key: Option<String>,
}

/// 应用全局配置项
pub struct AppConfig {
    /// Unsplash Access Key (优先级：ENV > TOML)
    pub unsplash_access_key: Option<String>,
    /// 渲染用的字体文件路径（不配置则运行时查找系统字体）
    pub font_path: Option<PathBuf>,
    /// 渲染字号（像素）
    pub font_size: u32,
    /// 搜索下载图片的保存目录
    pub download_dir: PathBuf,
    /// 配置文件所在路径
    pub config_path: PathBuf,
    /// 默认搜索参数
    pub search_defaults: SearchDefaults,
}

impl AppConfig {
    /// 初始化配置
    pub fn new() -> Self {
        let home = env::var("HOME").expect("无法获取 $HOME 环境变量");
        let home_path = PathBuf::from(&home);
        let config_dir = home_path.join(".config").join("textwall");
        let config_path = config_dir.join("config.toml");

        let config_file = Self::load_config_from_file(&config_path).unwrap_or_default();

        // 优先级：环境变量 > 配置文件内容
        let unsplash_access_key = env::var("UNSPLASH_ACCESS_KEY")
            .ok()
            .or(config_file.source.unsplash.access_key);

        // 下载目录：
        // 1. 如果配置了路径：展开 ~ 和环境变量，然后检查是否为绝对路径
        // 2. 相对路径则相对于 $HOME
        // 3. 如果未配置：默认使用 $HOME/Pictures/textwall
        let download_dir = if let Some(dir_str) = config_file.common.download_dir {
            let p = expand_path(&dir_str);
            if p.is_absolute() { p } else { home_path.join(p) }
        } else {
            home_path.join("Pictures").join("textwall")
        };

        let font_path = config_file
            .common
            .font_path
            .as_deref()
            .map(expand_path);

        Self {
            unsplash_access_key,
            font_path,
            font_size: config_file.common.font_size.unwrap_or(DEFAULT_FONT_SIZE),
            download_dir,
            config_path,
            search_defaults: config_file.common.search,
        }
    }

    /// 辅助函数：解析 TOML 配置文件
    fn load_config_from_file(path: &Path) -> Option<ConfigFile> {
        fs::read_to_string(path)
            .ok()
            .and_then(|content| toml::from_str(&content).ok())
    }

    /// 确保所有必要的目录都存在
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::create_dir_all(&self.download_dir)?;

        Ok(())
    }

    /// 把当前配置映射回文件结构
    fn to_config_file(&self) -> ConfigFile {
        ConfigFile {
            common: CommonConfig {
                download_dir: Some(self.download_dir.to_string_lossy().to_string()),
                font_path: self
                    .font_path
                    .as_ref()
                    .map(|p| p.to_string_lossy().to_string()),
                font_size: Some(self.font_size),
                search: SearchDefaults {
                    query: self.search_defaults.query.clone(),
                    resolution: self.search_defaults.resolution.clone(),
                },
            },
            source: SourceConfigs {
                unsplash: UnsplashConfig {
                    access_key: self.unsplash_access_key.clone(),
                },
            },
        }
    }

    /// 将配置保存回文件
    pub fn save(&self) -> std::io::Result<()> {
        let toml_str = toml::to_string_pretty(&self.to_config_file())
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        fs::write(&self.config_path, toml_str)
    }

    /// 获取配置文件的 JSON Schema
    pub fn get_schema() -> String {
        let schema = schemars::schema_for!(ConfigFile);
        serde_json::to_string_pretty(&schema).unwrap()
    }

    /// 将当前配置转换为 TOML 字符串
    pub fn to_toml(&self) -> String {
        let toml_str = toml::to_string_pretty(&self.to_config_file())
            .unwrap_or_else(|_| "# Error serializing config".to_string());

        // 在 [source.unsplash] 节前追加注释说明
        // toml 库不支持带注释序列化，所以手动插入
        toml_str.replace(
            "[source.unsplash]",
            "# Unsplash 凭据；也可通过环境变量 UNSPLASH_ACCESS_KEY 提供\n[source.unsplash]\n# access_key = \"your_unsplash_access_key_here\"",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_defaults_fill_in_when_absent() {
        let parsed: ConfigFile = toml::from_str("").unwrap();
        assert_eq!(parsed.common.search.resolution, "1920x1080");
        assert_eq!(parsed.common.search.query, None);
        assert_eq!(parsed.common.font_size, None);
    }

    #[test]
    fn partial_config_file_parses() {
        let parsed: ConfigFile = toml::from_str(
            "[common]\nfont_size = 64\n\n[common.search]\nquery = \"sunset\"\n",
        )
        .unwrap();
        assert_eq!(parsed.common.font_size, Some(64));
        assert_eq!(parsed.common.search.query.as_deref(), Some("sunset"));
        // 未写的节走 Default
        assert!(parsed.source.unsplash.access_key.is_none());
    }
}
