// cli.rs — 命令行接口定义模块
// 使用 clap 的 derive 模式定义所有子命令和参数

use clap::{Parser, Subcommand}; // Parser: 解析命令行参数的 trait; Subcommand: 定义子命令的 trait
use clap_complete::Shell; // Shell 枚举：Bash, Zsh, Fish, Elvish, PowerShell

/// 文字壁纸工具
///
/// 把一段文字渲染成图片设为桌面壁纸；
/// 也可以按关键词从 Unsplash 随机拉一张图铺满屏幕。
#[derive(Parser)]
#[command(name = "textwall")]
#[command(version)] // 自动从 Cargo.toml 读取 version 字段
#[command(about = "文字壁纸工具 — 把文字渲染成图片设为桌面壁纸")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 把文字渲染成图片并设为系统壁纸
    ///
    /// 文字里写字面的 \n（反斜杠加 n）即可换行。
    /// 用法示例:
    ///   textwall set "今日事今日毕"
    ///   textwall set "第一行\n第二行"
    ///   textwall set -s 64 "大字报"
    Set {
        /// 要渲染的文字内容
        text: String,

        /// 字号（像素），不指定则使用配置里的值
        #[arg(short = 's', long)]
        font_size: Option<u32>,
    },

    /// 只渲染图片，不设置壁纸
    ///
    /// 用法示例:
    ///   textwall render "备忘内容"
    ///   textwall render "备忘内容" -o memo.png
    Render {
        /// 要渲染的文字内容
        text: String,

        /// 输出路径（不指定则写到当前目录的固定文件名）
        #[arg(short, long)]
        output: Option<String>,

        /// 字号（像素），不指定则使用配置里的值
        #[arg(short = 's', long)]
        font_size: Option<u32>,
    },

    /// 从 Unsplash 搜索并随机下载一张图片
    ///
    /// 不给关键词时，从词文件里随机挑一个；
    /// 词文件也没有就用默认词 "nature"。
    /// 用法示例:
    ///   textwall fetch -q sunset
    ///   textwall fetch -w words.txt --set
    Fetch {
        /// 搜索关键词
        #[arg(short, long)]
        query: Option<String>,

        /// 搜索词文件路径（每行一个词，// 开头为注释）
        #[arg(short, long)]
        words: Option<String>,

        /// 下载完成后直接设为系统壁纸
        #[arg(long)]
        set: bool,
    },

    /// 将本地指定的图片设置为系统壁纸
    ///
    /// 用法示例:
    ///   textwall apply image.png
    Apply {
        /// 图片的本地路径
        image: String,
    },

    /// 清理所有带有 textwall- 前缀的生成文件
    ///
    /// 用法示例:
    ///   textwall clean
    Clean,

    /// 配置管理操作
    ///
    /// 用法示例:
    ///   textwall config show
    ///   textwall config dump
    ///   textwall config set query "anime"
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// 生成 shell 补全脚本（支持 bash, zsh, fish, elvish, powershell）
    ///
    /// 用法示例：
    ///   textwall completions zsh > ~/.zsh/completions/_textwall
    ///   textwall completions fish > ~/.config/fish/completions/textwall.fish
    Completions {
        /// 目标 shell 类型
        shell: Shell,
    },
}

/// 配置管理操作
#[derive(Subcommand)]
pub enum ConfigAction {
    /// 查看当前所有配置简报
    Show,
    /// 生成配置文件对应的 JSON Schema
    Schema,
    /// 以 TOML 格式打印当前完整配置内容
    Dump,
    /// 设置配置项的值 (支持: query, resolution, font-size)
    Set {
        /// 要设置的键 (query, res, font-size)
        key: String,
        /// 要设置的值
        value: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        // clap 自带的断言：参数定义有冲突会在这里直接 panic
        Cli::command().debug_assert();
    }

    #[test]
    fn set_takes_one_positional_text() {
        let cli = Cli::try_parse_from(["textwall", "set", "hello\\nworld"]).unwrap();
        match cli.command {
            Commands::Set { text, font_size } => {
                assert_eq!(text, "hello\\nworld");
                assert_eq!(font_size, None);
            }
            _ => panic!("expected set subcommand"),
        }
    }

    #[test]
    fn set_without_text_is_a_usage_error() {
        assert!(Cli::try_parse_from(["textwall", "set"]).is_err());
    }
}
