// imageops.rs — 图片适配模块
// 把下载到的图片缩放并居中裁剪到屏幕大小（先 cover 缩放再裁掉溢出的一边）

use image::DynamicImage;
use image::imageops::FilterType;

/// 目标屏幕尺寸
///
/// 显式参数传进每个函数，不走进程级全局变量
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenSize {
    pub width: u32,
    pub height: u32,
}

impl ScreenSize {
    /// 解析 "WxH" 形式的分辨率字符串（如 "3840x2160"）
    pub fn parse(resolution: &str) -> Option<Self> {
        let (w, h) = resolution.split_once('x')?;
        let width = w.parse::<u32>().ok()?;
        let height = h.parse::<u32>().ok()?;
        if width == 0 || height == 0 {
            return None;
        }
        Some(Self { width, height })
    }
}

/// cover 缩放后的尺寸：取宽高比中较大的那个，
/// 图片在一个维度上恰好等于屏幕，另一个维度可能更大
fn cover_dimensions(img_width: u32, img_height: u32, screen: ScreenSize) -> (u32, u32) {
    let width_ratio = screen.width as f64 / img_width as f64;
    let height_ratio = screen.height as f64 / img_height as f64;
    let scale = width_ratio.max(height_ratio);

    // 四舍五入后钳到不小于屏幕，贴合的那个维度不会因浮点误差差出一像素
    let scaled_w = ((img_width as f64 * scale).round() as u32).max(screen.width);
    let scaled_h = ((img_height as f64 * scale).round() as u32).max(screen.height);
    (scaled_w, scaled_h)
}

/// 缩放加居中裁剪，输出正好是屏幕尺寸
///
/// 最多只有一个维度会超出屏幕；裁剪时保持图片中心不动。
pub fn fit_to_screen(img: &DynamicImage, screen: ScreenSize) -> DynamicImage {
    let (scaled_w, scaled_h) = cover_dimensions(img.width(), img.height(), screen);
    let scaled = img.resize_exact(scaled_w, scaled_h, FilterType::CatmullRom);

    if scaled_w > screen.width {
        let x = (scaled_w - screen.width) / 2;
        scaled.crop_imm(x, 0, screen.width, screen.height)
    } else if scaled_h > screen.height {
        let y = (scaled_h - screen.height) / 2;
        scaled.crop_imm(0, y, screen.width, screen.height)
    } else {
        scaled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_resolution_string() {
        assert_eq!(
            ScreenSize::parse("3840x2160"),
            Some(ScreenSize { width: 3840, height: 2160 })
        );
        assert_eq!(ScreenSize::parse("1920"), None);
        assert_eq!(ScreenSize::parse("0x1080"), None);
        assert_eq!(ScreenSize::parse("axb"), None);
    }

    #[test]
    fn cover_scales_by_the_larger_ratio() {
        let screen = ScreenSize { width: 3840, height: 2160 };

        // 等比例：正好放大两倍
        assert_eq!(cover_dimensions(1920, 1080, screen), (3840, 2160));

        // 扁长图：高度比例更大，宽度会溢出屏幕
        let (w, h) = cover_dimensions(4000, 1000, screen);
        assert_eq!(h, 2160);
        assert!(w > screen.width);
    }

    #[test]
    fn fit_produces_exact_screen_size() {
        let screen = ScreenSize { width: 64, height: 36 };

        // 过宽和过高的图都应裁到屏幕大小
        for (w, h) in [(200u32, 40u32), (40, 200), (64, 36)] {
            let img = DynamicImage::new_rgb8(w, h);
            let fitted = fit_to_screen(&img, screen);
            assert_eq!((fitted.width(), fitted.height()), (64, 36));
        }
    }
}
