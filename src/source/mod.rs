// source/mod.rs — 图片搜索源模块入口
pub mod unsplash;

// 搜索源抽象接口：给一个搜索词，返回有序的 (描述, URL) 候选列表；
// 再从候选里随机挑一张下载，失败就换一张重试，次数有限

use async_trait::async_trait;
use rand::Rng;
use rust_i18n::t;
use std::path::{Path, PathBuf};

/// 下载重试的最大次数：每次失败都重新随机挑一个候选
pub const MAX_TRIES: usize = 5;

/// 统一的搜索结果条目
/// 不论来自哪个图片站，都转换成这个结构体供上层使用
#[derive(Debug, Clone)]
pub struct SearchHit {
    /// 图片在原站的 ID
    pub id: String,
    /// 图片的文字描述（已清洗，可直接打印）
    pub description: String,
    /// 原图的直接下载 URL
    pub url: String,
    /// 来源特定的附加数据（如 Unsplash 的 download_location）
    pub extra: Option<String>,
}

/// 图片搜索源的抽象 Trait
///
/// Rust 原生对 Trait 中的 async fn 支持有限，
/// 这里沿用 `async_trait` 宏来支持异步接口。
#[async_trait]
pub trait ImageSource {
    /// 按关键词搜索，返回有序的候选列表
    async fn search(&self, phrase: &str) -> Result<Vec<SearchHit>, Box<dyn std::error::Error>>;

    /// 下载一个候选到指定目录，返回保存后的完整路径
    async fn download(
        &self,
        hit: &SearchHit,
        save_dir: &Path,
    ) -> Result<PathBuf, Box<dyn std::error::Error>>;
}

/// 清洗图片描述：非字母数字的字符替换成空格，再折叠连续空白
/// 搜索站返回的描述常夹杂 HTML 残渣和标点，清洗后才适合打印
pub fn clean_description(raw: &str) -> String {
    let replaced: String = raw
        .chars()
        .map(|ch| if ch.is_ascii_alphanumeric() { ch } else { ' ' })
        .collect();

    replaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// 从候选列表里随机挑一张下载；失败则换一张重试，最多 [`MAX_TRIES`] 次
///
/// 候选 URL 随时可能失效，单个候选下载失败不算整体失败。
/// 随机数发生器由调用方传入，不依赖进程级全局状态。
pub async fn download_random(
    source: &dyn ImageSource,
    hits: &[SearchHit],
    save_dir: &Path,
    rng: &mut impl Rng,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    if hits.is_empty() {
        return Err(t!("error_no_results").into());
    }

    for attempt in 1..=MAX_TRIES {
        let idx = rng.gen_range(0..hits.len());
        println!(
            "{}",
            t!("download_pick", index => idx + 1, attempt => attempt, total => MAX_TRIES)
        );

        match source.download(&hits[idx], save_dir).await {
            Ok(path) => return Ok(path),
            Err(e) => println!("{}", t!("download_failed", reason => e)),
        }
    }

    Err(t!("error_download_exhausted").into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn cleaning_replaces_punctuation_and_collapses_spaces() {
        assert_eq!(
            clean_description("Sunset, over   the <b>sea</b>!"),
            "Sunset over the b sea b"
        );
        assert_eq!(clean_description("___"), "");
        assert_eq!(clean_description("plain"), "plain");
    }

    /// 永远下载失败的假源，用来数重试次数
    struct FailingSource {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ImageSource for FailingSource {
        async fn search(&self, _: &str) -> Result<Vec<SearchHit>, Box<dyn std::error::Error>> {
            Ok(Vec::new())
        }

        async fn download(
            &self,
            _: &SearchHit,
            _: &Path,
        ) -> Result<PathBuf, Box<dyn std::error::Error>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err("boom".into())
        }
    }

    /// 第二次调用才成功的假源
    struct FlakySource {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ImageSource for FlakySource {
        async fn search(&self, _: &str) -> Result<Vec<SearchHit>, Box<dyn std::error::Error>> {
            Ok(Vec::new())
        }

        async fn download(
            &self,
            _: &SearchHit,
            _: &Path,
        ) -> Result<PathBuf, Box<dyn std::error::Error>> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                Err("boom".into())
            } else {
                Ok(PathBuf::from("ok.png"))
            }
        }
    }

    fn some_hits() -> Vec<SearchHit> {
        vec![
            SearchHit {
                id: "a".into(),
                description: "first".into(),
                url: "http://example.com/a.jpg".into(),
                extra: None,
            },
            SearchHit {
                id: "b".into(),
                description: "second".into(),
                url: "http://example.com/b.jpg".into(),
                extra: None,
            },
        ]
    }

    #[tokio::test]
    async fn gives_up_after_max_tries() {
        let source = FailingSource { calls: AtomicUsize::new(0) };
        let mut rng = rand::thread_rng();
        let result =
            download_random(&source, &some_hits(), Path::new("."), &mut rng).await;

        assert!(result.is_err());
        assert_eq!(source.calls.load(Ordering::SeqCst), MAX_TRIES);
    }

    #[tokio::test]
    async fn retries_until_a_download_succeeds() {
        let source = FlakySource { calls: AtomicUsize::new(0) };
        let mut rng = rand::thread_rng();
        let path = download_random(&source, &some_hits(), Path::new("."), &mut rng)
            .await
            .unwrap();

        assert_eq!(path, PathBuf::from("ok.png"));
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn empty_candidate_list_is_an_error() {
        let source = FailingSource { calls: AtomicUsize::new(0) };
        let mut rng = rand::thread_rng();
        let result = download_random(&source, &[], Path::new("."), &mut rng).await;

        assert!(result.is_err());
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }
}
