// words.rs — 搜索词文件模块
// 从文本文件读入候选搜索词，随机挑一个作为图片搜索的关键词

use rand::Rng;
use rand::seq::SliceRandom;
use rust_i18n::t;
use std::fs;
use std::path::Path;

/// 没有词文件（或文件为空）时用的兜底搜索词
pub const DEFAULT_SEARCH: &str = "nature";

/// 解析词文件内容：每行一个词（或短语），统一转小写并去除首尾空白，
/// 空行和 `//` 开头的注释行跳过
pub fn parse_words(content: &str) -> Vec<String> {
    content
        .lines()
        .map(|line| line.trim().to_lowercase())
        .filter(|line| !line.is_empty() && !line.starts_with("//"))
        .collect()
}

/// 读取词文件；读取失败时打印提示并返回空列表，不中断整个流程
pub fn load_search_words(path: impl AsRef<Path>) -> Vec<String> {
    let path = path.as_ref();
    println!("{}", t!("words_reading", path => path.display()));

    match fs::read_to_string(path) {
        Ok(content) => parse_words(&content),
        Err(_) => {
            println!("{}", t!("words_read_error", path => path.display()));
            Vec::new()
        }
    }
}

/// 从词列表里随机挑一个；列表为空时退回 [`DEFAULT_SEARCH`]
///
/// 随机数发生器由调用方传入，方便测试时控制
pub fn select_search_word(words: &[String], rng: &mut impl Rng) -> String {
    words
        .choose(rng)
        .cloned()
        .unwrap_or_else(|| DEFAULT_SEARCH.to_string())
}
