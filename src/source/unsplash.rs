// unsplash.rs — Unsplash API 异步客户端模块
// 负责与 Unsplash API 交互：按关键词搜索图片和下载原图
//
// 注意：根据 Unsplash API Guidelines，每次实际下载图片前
// 必须先调用 links.download_location 触发下载统计。

use super::{ImageSource, SearchHit, clean_description};
use async_trait::async_trait;
use serde::Deserialize; // 反序列化 trait，用于将 JSON 转为 Rust 结构体
use std::path::{Path, PathBuf};
use tokio::fs::File; // tokio 提供的异步文件操作
use tokio::io::AsyncWriteExt; // 异步写入 trait，提供 write_all() 等方法

/// Unsplash 搜索响应的顶层结构
/// GET /search/photos 返回的 JSON 根对象
#[derive(Deserialize, Debug)]
pub struct SearchResponse {
    /// 搜索结果列表
    pub results: Vec<Photo>,
}

/// 单张图片的数据结构
/// 只提取需要的字段，JSON 中多余的字段 serde 会自动忽略
#[derive(Deserialize, Debug)]
pub struct Photo {
    /// 图片唯一标识符（如 "LBI7cgq3pbM"）
    pub id: String,

    /// 作者填写的描述，经常为 null
    pub description: Option<String>,

    /// 自动生成的替代文本描述，同样可能为 null
    pub alt_description: Option<String>,

    /// 各尺寸图片 URL 集合
    pub urls: PhotoUrls,

    /// 图片相关链接，包含触发下载统计所需的 download_location
    pub links: PhotoLinks,
}

/// 图片 URL 集合
#[derive(Deserialize, Debug)]
pub struct PhotoUrls {
    /// 原始图片 URL，可追加 Imgix 参数自定义格式
    pub raw: String,
}

/// 图片链接集合
#[derive(Deserialize, Debug)]
pub struct PhotoLinks {
    /// 触发下载统计的 API 地址（必须在下载前调用）
    pub download_location: String,
}

/// 触发下载统计后返回的响应结构
#[derive(Deserialize, Debug)]
struct DownloadResponse {
    /// 实际可下载的图片 URL
    url: String,
}

/// Unsplash API 异步客户端
///
/// 封装了 reqwest::Client 和 API 配置。
/// Access Key 通过 `Authorization: Client-ID <key>` header 传递。
pub struct UnsplashClient {
    /// HTTP 客户端（内部有连接池，应复用）
    client: reqwest::Client,

    /// API 基础 URL
    base_url: String,

    /// Unsplash Access Key（必填，用于 Authorization header）
    access_key: String,
}

impl UnsplashClient {
    /// 创建新的 Unsplash 客户端
    ///
    /// # 参数
    /// - `access_key`: 从 Unsplash Developer 后台获取的 Access Key
    pub fn new(access_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: String::from("https://api.unsplash.com"),
            access_key,
        }
    }

    /// 构建 Authorization header 的值
    /// Unsplash 使用 "Client-ID <key>" 格式，而非 Bearer token
    fn auth_header(&self) -> String {
        format!("Client-ID {}", self.access_key)
    }
}

#[async_trait]
impl ImageSource for UnsplashClient {
    async fn search(&self, phrase: &str) -> Result<Vec<SearchHit>, Box<dyn std::error::Error>> {
        let url = format!("{}/search/photos", self.base_url);

        let response = self
            .client
            .get(&url)
            .header("Authorization", self.auth_header())
            // Unsplash 每页最多 30 条；壁纸场景优先横向图
            .query(&[
                ("query", phrase),
                ("per_page", "30"),
                ("orientation", "landscape"),
                ("content_filter", "low"),
            ])
            .send()
            .await?;

        let search_response: SearchResponse = response.json().await?;

        let hits = search_response
            .results
            .into_iter()
            .map(|photo| {
                // 两个描述字段都可能缺失，优先人工描述
                let raw_desc = photo
                    .description
                    .or(photo.alt_description)
                    .unwrap_or_default();

                SearchHit {
                    description: clean_description(&raw_desc),
                    url: format!("{}&fm=jpg&q=85", photo.urls.raw),
                    // download_location 存入 extra，供 download() 调用统计接口
                    extra: Some(photo.links.download_location),
                    id: photo.id,
                }
            })
            .collect();

        Ok(hits)
    }

    async fn download(
        &self,
        hit: &SearchHit,
        save_dir: &Path,
    ) -> Result<PathBuf, Box<dyn std::error::Error>> {
        // 第一步：调用 download_location 触发下载统计（API Guidelines 强制要求），
        // 同时拿到带签名的真实下载 URL；没有 extra 时直接退回 url 字段
        let download_url = if let Some(download_location) = &hit.extra {
            let dl_response: DownloadResponse = self
                .client
                .get(download_location)
                .header("Authorization", self.auth_header())
                .send()
                .await?
                .json()
                .await?;
            dl_response.url
        } else {
            hit.url.clone()
        };

        // 第二步：下载实际图片字节
        let bytes = self
            .client
            .get(&download_url)
            .send()
            .await?
            .bytes()
            .await?;

        let filename = format!("textwall-unsplash-{}.jpg", hit.id);
        let save_path = save_dir.join(filename);

        let mut file = File::create(&save_path).await?;
        file.write_all(&bytes).await?;

        Ok(save_path)
    }
}
