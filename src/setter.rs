// setter.rs — 系统壁纸安装模块
// 核心渲染逻辑唯一依赖的窄接口：给一个文件路径，装成桌面壁纸

use rust_i18n::t;
use std::path::Path;

/// 把指定路径的图片安装为系统壁纸
///
/// 先把路径解析成绝对路径再交给系统：Windows 注册表里的
/// Wallpaper 键要求完整路径，相对路径装不上。
/// 底层由 wallpaper 库按操作系统分发，Windows 上是注册表写入
/// 加 SystemParametersInfo 桌面刷新，无需重启。
pub fn install(path: impl AsRef<Path>) -> Result<(), Box<dyn std::error::Error>> {
    let full_path = path.as_ref().canonicalize()?;
    let path_str = full_path.to_str().ok_or(t!("error_utf8"))?;

    println!("  -> {}", full_path.display());

    wallpaper::set_from_path(path_str)
        .map_err(|e| format!("{}: {}", t!("error_set_failed"), e).into())
}
