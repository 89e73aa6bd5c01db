// main.rs — 程序入口
// 负责初始化异步运行时、解析命令行参数、分发子命令

mod cli; // 声明 cli 模块，对应 src/cli.rs
mod config; // 声明 config 模块，对应 src/config.rs
mod imageops;
mod render; // 声明 render 模块，对应 src/render.rs
mod setter;
mod source;
mod words;

// 初始化多语言支持，嵌入 locales 目录下的所有翻译
rust_i18n::i18n!("locales");

use clap::{CommandFactory, Parser}; // 引入 Parser trait 的 parse() 方法; CommandFactory 用于生成补全脚本
use clap_complete::generate; // 引入补全脚本生成函数
use cli::{Cli, Commands}; // 引入 CLI 结构体和子命令枚举
use config::AppConfig; // 引入应用配置
use imageops::ScreenSize;
use render::{TextBlock, TextRasterizer};
use rust_i18n::t; // 引入翻译宏
use source::ImageSource;
use source::unsplash::UnsplashClient;
use std::path::PathBuf;

/// 渲染输出的固定文件名，写到当前工作目录
const WALL_FILENAME: &str = "textwall-wallpaper.png";

/// 所有生成文件共用的前缀，clean 子命令按它识别
const FILE_PREFIX: &str = "textwall-";

/// `#[tokio::main]` 宏将 async main 转换为同步 main + tokio 运行时
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 自动检测系统语言并设置
    let locale = std::env::var("LANG").unwrap_or_else(|_| "en".to_string());
    if locale.starts_with("zh") {
        rust_i18n::set_locale("zh-CN");
    } else {
        rust_i18n::set_locale("en");
    }

    // 解析命令行参数
    let cli = Cli::parse();

    // 创建应用配置（读取环境变量、设置路径）
    let mut config = AppConfig::new();

    // 确保下载目录存在
    config.ensure_dirs()?;

    // 根据子命令分发执行逻辑
    match &cli.command {
        Commands::Set { text, font_size } => {
            let image_path = handle_render(&config, text, None, *font_size)?;

            println!("{}", t!("setting_wallpaper"));
            setter::install(&image_path)?;
            println!("{}", t!("set_done"));
        }

        Commands::Render {
            text,
            output,
            font_size,
        } => {
            handle_render(&config, text, output.as_deref(), *font_size)?;
        }

        Commands::Fetch { query, words, set } => {
            handle_fetch(&config, query.as_deref(), words.as_deref(), *set).await?;
        }

        Commands::Apply { image } => {
            println!("{}", t!("setting_wallpaper"));
            setter::install(image)?;
            println!("{}", t!("set_done"));
        }

        Commands::Clean => {
            handle_clean(&config)?;
        }

        Commands::Config { action } => {
            handle_config(&mut config, action)?;
        }

        Commands::Completions { shell } => {
            generate(
                *shell,
                &mut Cli::command(),
                "textwall",
                &mut std::io::stdout(),
            );
        }
    }

    Ok(())
}

/// 处理 render / set 共用的渲染流程：文字 -> 位图 -> PNG 文件
///
/// 返回写出的文件路径。不指定输出路径时，
/// 写到当前工作目录的固定文件名，便于反复覆盖同一张壁纸。
fn handle_render(
    config: &AppConfig,
    text: &str,
    output: Option<&str>,
    font_size: Option<u32>,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    // 空文本在这里就被拒绝，不会分配退化画布
    let block = TextBlock::parse(text)?;

    let font = render::load_font(config.font_path.as_deref())?;
    let size = font_size.unwrap_or(config.font_size);

    println!("{}", t!("render_start"));
    let img = TextRasterizer::new(font, size).render(&block);

    let out_path = match output {
        Some(p) => PathBuf::from(p),
        None => std::env::current_dir()?.join(WALL_FILENAME),
    };

    // 按扩展名编码；写失败直接报错返回，后续的壁纸安装不会执行
    img.save(&out_path)?;
    println!("{}", t!("render_done", path => out_path.display()));

    Ok(out_path)
}

/// 处理 fetch 子命令：搜索 -> 列出候选 -> 随机下载 -> 适配屏幕
async fn handle_fetch(
    config: &AppConfig,
    query: Option<&str>,
    words_file: Option<&str>,
    set_wallpaper: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let access_key = config
        .unsplash_access_key
        .clone()
        .ok_or(t!("error_no_access_key"))?;
    let client = UnsplashClient::new(access_key);

    let mut rng = rand::thread_rng();

    // 关键词优先级：命令行 > 词文件随机挑选 > 配置默认值 > 兜底词
    let phrase = if let Some(q) = query {
        q.to_string()
    } else if let Some(path) = words_file {
        let list = words::load_search_words(path);
        words::select_search_word(&list, &mut rng)
    } else if let Some(q) = &config.search_defaults.query {
        q.clone()
    } else {
        words::DEFAULT_SEARCH.to_string()
    };

    println!("{}", t!("search_start", phrase => phrase));
    let hits = client.search(&phrase).await?;

    if hits.is_empty() {
        println!("{}", t!("no_results"));
        return Ok(());
    }

    show_results(&hits);

    let raw_path =
        source::download_random(&client, &hits, &config.download_dir, &mut rng).await?;
    println!("{}", t!("save_path", path => raw_path.display()));

    // 缩放并居中裁剪到配置的屏幕分辨率，另存为 PNG
    let screen = ScreenSize::parse(&config.search_defaults.resolution).ok_or(
        t!("error_bad_resolution", res => config.search_defaults.resolution),
    )?;
    let img = image::open(&raw_path)?;
    let fitted = imageops::fit_to_screen(&img, screen);

    let wall_path = raw_path.with_extension("png");
    fitted.save(&wall_path)?;
    println!("{}", t!("fit_done", path => wall_path.display()));

    if set_wallpaper {
        println!("{}", t!("setting_wallpaper"));
        setter::install(&wall_path)?;
        println!("{}", t!("set_done"));
    }

    Ok(())
}

/// 逐条列出搜索结果的描述和 URL
fn show_results(hits: &[source::SearchHit]) {
    println!("{}", t!("results_title", count => hits.len()));
    for (i, hit) in hits.iter().enumerate() {
        let desc = if hit.description.is_empty() {
            "-"
        } else {
            hit.description.as_str()
        };
        println!("{:>3}. {}", i + 1, desc);
        println!("     {}", hit.url);
    }
}

/// 处理 clean 子命令：清理下载目录和当前目录里所有 textwall- 前缀的文件
fn handle_clean(config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let dirs = vec![config.download_dir.clone(), std::env::current_dir()?];

    let mut deleted_count = 0;

    for dir in dirs {
        if !dir.exists() {
            continue;
        }

        println!("{}", t!("cleaning_dir", path => dir.display()));

        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            let path = entry.path();

            if path.is_file() {
                if let Some(filename) = path.file_name().and_then(|n| n.to_str()) {
                    if filename.starts_with(FILE_PREFIX) {
                        std::fs::remove_file(&path)?;
                        deleted_count += 1;
                        println!("  {} {}", t!("deleted"), filename);
                    }
                }
            }
        }
    }

    println!("{}", t!("clean_done", count => deleted_count));
    Ok(())
}

/// 处理 config 子命令：查看或修改配置
fn handle_config(
    config: &mut AppConfig,
    action: &cli::ConfigAction,
) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        cli::ConfigAction::Show => {
            println!("{}", t!("config_title"));
            println!(
                "{}",
                t!("config_path", path => config.config_path.display())
            );
            println!(
                "{}",
                t!("config_download_dir", path => config.download_dir.display())
            );
            let font_str = config
                .font_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| t!("config_font_auto").to_string());
            println!("{}", t!("config_font_path", path => font_str));
            println!("{}", t!("config_font_size", size => config.font_size));
            let query_str = config.search_defaults.query.as_deref().unwrap_or("None");
            println!("{}", t!("config_query", query => query_str));
            println!(
                "{}",
                t!("config_res", res => config.search_defaults.resolution)
            );
        }
        cli::ConfigAction::Schema => {
            println!("{}", AppConfig::get_schema());
        }
        cli::ConfigAction::Dump => {
            println!("{}", config.to_toml());
        }
        cli::ConfigAction::Set { key, value } => {
            match key.as_str() {
                "query" => config.search_defaults.query = Some(value.clone()),
                "res" | "resolution" => config.search_defaults.resolution = value.clone(),
                "font-size" | "font_size" => {
                    let size: u32 = value
                        .parse()
                        .ok()
                        .filter(|v| *v > 0)
                        .ok_or(t!("config_error_bad_number", value => value))?;
                    config.font_size = size;
                }
                _ => return Err(t!("config_error_unknown_key", key => key).into()),
            }
            config.save()?;
            println!("{}", t!("config_updated", key => key, value => value));
        }
    }
    Ok(())
}
