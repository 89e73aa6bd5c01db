// render.rs — 文字光栅化模块
// 把一段文本画成一张可作壁纸的位图：
// 按字面转义符拆行 -> 估算画布尺寸 -> 白底黑字（50% 透明度）逐行绘制

use ab_glyph::{Font, FontArc, GlyphId, PxScale, ScaleFont, point};
use image::{Rgb, RgbImage};
use rust_i18n::t;
use std::fs;
use std::path::{Path, PathBuf};

/// 默认字号（像素）
pub const DEFAULT_FONT_SIZE: u32 = 40;

/// 换行转义序列：字面的反斜杠加 n（两个字符），不是换行控制符
/// shell 里写 `textwall set "第一行\n第二行"` 即可换行
pub const NEWLINE_ESCAPE: &str = "\\n";

// 版式常量：左边距 5px，基线位于行带底部上方 5px，文字覆盖率 50%
const LEFT_MARGIN: f32 = 5.0;
const BASELINE_RISE: f32 = 5.0;
const TEXT_ALPHA: f32 = 0.5;

/// 运行时字体候选列表，按顺序取第一个存在的文件
/// Windows 优先微软雅黑，其余平台退回常见的系统无衬线字体
const FONT_CANDIDATES: &[&str] = &[
    "C:\\Windows\\Fonts\\msyh.ttc",
    "C:\\Windows\\Fonts\\msyh.ttf",
    "C:\\Windows\\Fonts\\simhei.ttf",
    "C:\\Windows\\Fonts\\segoeui.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/noto/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    "/System/Library/Fonts/PingFang.ttc",
    "/System/Library/Fonts/Helvetica.ttc",
];

/// 单个字符的宽度权重
///
/// 没有真实字体度量时的估算：码点低于 256 视为半宽（0.5），
/// 其余（汉字、假名等）视为全宽（1.0）。
pub fn char_weight(ch: char) -> f32 {
    if (ch as u32) < 256 { 0.5 } else { 1.0 }
}

/// 一行文本的加权宽度估算（以字号为单位）
pub fn weighted_width(line: &str) -> f32 {
    line.chars().map(char_weight).sum()
}

/// 拆行后的输入文本
///
/// 输入按 [`NEWLINE_ESCAPE`] 拆成有序的行序列；出现 k 次转义符就得到 k+1 行。
/// 空输入（或每一行加权宽度都为 0 的输入）在这里就被拒绝，
/// 避免后面分配出零尺寸的退化画布。
#[derive(Debug)]
pub struct TextBlock {
    lines: Vec<String>,
}

impl TextBlock {
    /// 解析命令行传入的文本
    pub fn parse(text: &str) -> Result<Self, Box<dyn std::error::Error>> {
        if text.is_empty() {
            return Err(t!("error_empty_text").into());
        }

        let lines: Vec<String> = text.split(NEWLINE_ESCAPE).map(str::to_string).collect();

        // 只含转义符之类的输入，行都是空的，同样没法画
        if lines.iter().all(|line| weighted_width(line) == 0.0) {
            return Err(t!("error_empty_text").into());
        }

        Ok(Self { lines })
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// 所有行中最大的加权宽度，决定画布宽度
    pub fn max_weighted_width(&self) -> f32 {
        self.lines
            .iter()
            .map(|line| weighted_width(line))
            .fold(0.0, f32::max)
    }
}

/// 由文本块和字号算出的画布尺寸
///
/// 宽 = 字号 × 最大加权行宽（向上取整），高 = 字号 × 行数。
/// 每行占据一条字号高的横带，行与行自上而下排布。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasSpec {
    pub width: u32,
    pub height: u32,
}

impl CanvasSpec {
    pub fn for_block(block: &TextBlock, font_size: u32) -> Self {
        let width = (font_size as f32 * block.max_weighted_width()).ceil() as u32;
        let height = font_size * block.lines().len() as u32;
        Self { width, height }
    }
}

/// 在系统字体候选列表中找第一个存在的文件
pub fn find_system_font() -> Option<PathBuf> {
    FONT_CANDIDATES
        .iter()
        .map(|s| PathBuf::from(*s))
        .find(|p| p.is_file())
}

/// 加载字体：优先配置里指定的路径，否则走系统候选列表
///
/// # 参数
/// - `explicit`: config.toml 里 font_path 指定的路径（可选）
pub fn load_font(explicit: Option<&Path>) -> Result<FontArc, Box<dyn std::error::Error>> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => find_system_font().ok_or(t!("error_no_font"))?,
    };

    let bytes = fs::read(&path)
        .map_err(|e| format!("{}: {}", t!("error_font_load", path => path.display()), e))?;

    // try_from_vec 解析 ttf/otf，也接受 ttc 集合（取第一个字面）
    FontArc::try_from_vec(bytes)
        .map_err(|e| format!("{}: {}", t!("error_font_load", path => path.display()), e).into())
}

/// 文字光栅化器
///
/// 持有解析好的字体和字号，`render` 是纯函数式的单趟绘制：
/// 同样的输入和同一份字体文件，两次输出逐位相同。
pub struct TextRasterizer {
    font: FontArc,
    font_size: u32,
}

impl TextRasterizer {
    pub fn new(font: FontArc, font_size: u32) -> Self {
        Self { font, font_size }
    }

    /// 把文本块画成白底黑字的位图
    ///
    /// 第 i 行占据 [i×字号, (i+1)×字号) 的横带，
    /// 基线在横带底部上方 [`BASELINE_RISE`] 像素处。
    pub fn render(&self, block: &TextBlock) -> RgbImage {
        let spec = CanvasSpec::for_block(block, self.font_size);
        let mut canvas = RgbImage::from_pixel(spec.width, spec.height, Rgb([255, 255, 255]));

        let scale = PxScale::from(self.font_size as f32);
        let scaled = self.font.as_scaled(scale);

        for (i, line) in block.lines().iter().enumerate() {
            let baseline = (self.font_size * (i as u32 + 1)) as f32 - BASELINE_RISE;

            let mut caret = LEFT_MARGIN;
            let mut prev: Option<GlyphId> = None;

            for ch in line.chars() {
                let id = self.font.glyph_id(ch);
                if let Some(prev_id) = prev {
                    caret += scaled.kern(prev_id, id);
                }

                let glyph = id.with_scale_and_position(scale, point(caret, baseline));
                if let Some(outline) = self.font.outline_glyph(glyph) {
                    let bounds = outline.px_bounds();
                    // coverage 是该像素被字形轮廓覆盖的比例，叠加 50% 透明度后
                    // 与白底做混合：黑色部分只需按 (1 - alpha) 压暗原像素
                    outline.draw(|gx, gy, coverage| {
                        let px = bounds.min.x as i32 + gx as i32;
                        let py = bounds.min.y as i32 + gy as i32;
                        if px >= 0 && py >= 0 && (px as u32) < spec.width && (py as u32) < spec.height
                        {
                            let alpha = coverage.clamp(0.0, 1.0) * TEXT_ALPHA;
                            let pixel = canvas.get_pixel_mut(px as u32, py as u32);
                            for channel in pixel.0.iter_mut() {
                                *channel = (*channel as f32 * (1.0 - alpha)).round() as u8;
                            }
                        }
                    });
                }

                caret += scaled.h_advance(id);
                prev = Some(id);
            }
        }

        canvas
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_line_weighs_half_per_char() {
        // N 个 ASCII 字符 -> 0.5 × N
        assert_eq!(weighted_width("hello"), 2.5);
        assert_eq!(weighted_width(""), 0.0);
    }

    #[test]
    fn wide_chars_weigh_one_each() {
        // 码点 >= 256 的字符 -> 1.0 × 字符数
        assert_eq!(weighted_width("你好世界"), 4.0);
        assert_eq!(weighted_width("a你"), 1.5);
    }

    #[test]
    fn escape_with_k_occurrences_yields_k_plus_one_lines() {
        let block = TextBlock::parse("a\\nb\\nc").unwrap();
        assert_eq!(block.lines(), &["a", "b", "c"]);

        let block = TextBlock::parse("单行文本").unwrap();
        assert_eq!(block.lines().len(), 1);
    }

    #[test]
    fn real_newline_is_not_the_escape() {
        // 转义序列是字面的 \n 两个字符，真正的换行符不拆行
        let block = TextBlock::parse("a\nb").unwrap();
        assert_eq!(block.lines().len(), 1);
    }

    #[test]
    fn canvas_spec_tracks_widest_line_and_line_count() {
        let block = TextBlock::parse("hello").unwrap();
        let spec = CanvasSpec::for_block(&block, 40);
        assert_eq!(spec, CanvasSpec { width: 100, height: 40 });

        // 两行：高度翻倍，宽度取最宽的一行（“你好世界” -> 4.0）
        let block = TextBlock::parse("hi\\n你好世界").unwrap();
        let spec = CanvasSpec::for_block(&block, 40);
        assert_eq!(spec, CanvasSpec { width: 160, height: 80 });
    }

    #[test]
    fn empty_input_is_rejected_before_allocation() {
        assert!(TextBlock::parse("").is_err());
        // 只有转义符的输入拆出来全是空行，同样拒绝
        assert!(TextBlock::parse("\\n").is_err());
        assert!(TextBlock::parse("\\n\\n").is_err());
    }

    #[test]
    fn rendering_is_deterministic() {
        // 机器上没有候选字体时跳过（渲染结果依赖具体字体文件）
        let Some(path) = find_system_font() else {
            return;
        };
        let font = load_font(Some(&path)).unwrap();

        let block = TextBlock::parse("determinism\\n测试").unwrap();
        let first = TextRasterizer::new(font.clone(), DEFAULT_FONT_SIZE).render(&block);
        let second = TextRasterizer::new(font, DEFAULT_FONT_SIZE).render(&block);
        assert_eq!(first.as_raw(), second.as_raw());
    }

    #[test]
    fn canvas_is_white_outside_text() {
        let Some(path) = find_system_font() else {
            return;
        };
        let font = load_font(Some(&path)).unwrap();

        let block = TextBlock::parse("x").unwrap();
        let img = TextRasterizer::new(font, DEFAULT_FONT_SIZE).render(&block);
        // 右上角远离字形，应保持纯白背景
        let corner = img.get_pixel(img.width() - 1, 0);
        assert_eq!(corner, &Rgb([255, 255, 255]));
    }
}
