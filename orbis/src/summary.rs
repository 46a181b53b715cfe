//! PNG rendering of the refresh summary.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use font8x8::{BASIC_FONTS, LATIN_FONTS, UnicodeFonts};
use image::{ImageFormat, Rgb, RgbImage};

use orbis_core::{OrbisError, SummaryRenderer, SummarySnapshot, format_gdp, format_timestamp};

const WIDTH: u32 = 600;
const HEIGHT: u32 = 400;
const MARGIN: u32 = 20;
const GLYPH: u32 = 8;

const BACKGROUND: Rgb<u8> = Rgb([30, 30, 70]);
const TITLE_COLOR: Rgb<u8> = Rgb([255, 200, 0]);
const LABEL_COLOR: Rgb<u8> = Rgb([200, 200, 255]);
const TIME_COLOR: Rgb<u8> = Rgb([100, 255, 100]);
const TEXT_COLOR: Rgb<u8> = Rgb([255, 255, 255]);

/// Title drawn at the top of the summary image.
pub const SUMMARY_TITLE: &str = "API Cache Summary";

/// Writes a fixed-size PNG summary to one path, replacing it on every render.
///
/// The file is first written next to the target and then renamed over it, so
/// readers never observe a partially written image.
#[derive(Debug, Clone)]
pub struct PngSummaryRenderer {
    path: PathBuf,
}

impl PngSummaryRenderer {
    /// Render to `path`. Parent directories are created on first render.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Target path of the image.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SummaryRenderer for PngSummaryRenderer {
    fn name(&self) -> &'static str {
        "png"
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "orbis::summary::render",
            skip(self, snapshot),
            fields(path = %self.path.display(), total = snapshot.total),
        )
    )]
    async fn render(&self, snapshot: &SummarySnapshot) -> Result<(), OrbisError> {
        let path = self.path.clone();
        let snapshot = snapshot.clone();
        tokio::task::spawn_blocking(move || {
            let png = encode_png(&draw(&snapshot))?;
            write_atomically(&path, &png)
        })
        .await
        .map_err(|e| OrbisError::render(format!("render task failed: {e}")))?
    }
}

/// Lay out the summary onto a fresh canvas.
#[must_use]
pub fn draw(snapshot: &SummarySnapshot) -> RgbImage {
    let mut img = RgbImage::from_pixel(WIDTH, HEIGHT, BACKGROUND);
    let mut y = MARGIN;

    draw_text(&mut img, MARGIN, y, SUMMARY_TITLE, 3, TITLE_COLOR);
    y += GLYPH * 3 + 20;

    draw_text(
        &mut img,
        MARGIN,
        y,
        &format!("Total Countries Cached: {}", snapshot.total),
        2,
        LABEL_COLOR,
    );
    y += GLYPH * 2 + 14;

    draw_text(&mut img, MARGIN, y, "Last Successful Refresh (UTC):", 2, LABEL_COLOR);
    y += GLYPH * 2 + 8;
    draw_text(
        &mut img,
        MARGIN,
        y,
        &format_timestamp(snapshot.last_refreshed_at),
        2,
        TIME_COLOR,
    );
    y += GLYPH * 2 + 20;

    draw_text(
        &mut img,
        MARGIN,
        y,
        &format!("Top {} Estimated GDP:", snapshot.top.len()),
        2,
        LABEL_COLOR,
    );
    y += GLYPH * 2 + 10;

    for (i, country) in snapshot.top.iter().enumerate() {
        let line = format!(
            "{}. {:<25} {}",
            i + 1,
            country.name,
            format_gdp(country.estimated_gdp)
        );
        let scale = fit_scale(&line, 2);
        draw_text(&mut img, MARGIN, y, &line, scale, TEXT_COLOR);
        y += GLYPH * scale + 8;
        if y + GLYPH >= HEIGHT {
            break;
        }
    }
    img
}

/// Largest scale up to `max` at which `text` fits between the margins.
fn fit_scale(text: &str, max: u32) -> u32 {
    let chars = u32::try_from(text.chars().count()).unwrap_or(u32::MAX);
    let room = WIDTH - 2 * MARGIN;
    (1..=max)
        .rev()
        .find(|s| chars.saturating_mul(GLYPH * s) <= room)
        .unwrap_or(1)
}

fn glyph(ch: char) -> [u8; 8] {
    BASIC_FONTS
        .get(ch)
        .or_else(|| LATIN_FONTS.get(ch))
        .or_else(|| BASIC_FONTS.get('?'))
        .unwrap_or([0; 8])
}

fn draw_text(img: &mut RgbImage, x: u32, y: u32, text: &str, scale: u32, color: Rgb<u8>) {
    let mut cx = x;
    for ch in text.chars() {
        if cx + GLYPH * scale > WIDTH {
            break;
        }
        for (row, bits) in glyph(ch).iter().enumerate() {
            for col in 0..GLYPH {
                if bits & (1 << col) == 0 {
                    continue;
                }
                let px = cx + col * scale;
                let py = y + u32::try_from(row).unwrap_or(0) * scale;
                for dy in 0..scale {
                    for dx in 0..scale {
                        if px + dx < WIDTH && py + dy < HEIGHT {
                            img.put_pixel(px + dx, py + dy, color);
                        }
                    }
                }
            }
        }
        cx += GLYPH * scale;
    }
}

fn encode_png(img: &RgbImage) -> Result<Vec<u8>, OrbisError> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png)
        .map_err(OrbisError::render)?;
    Ok(buf.into_inner())
}

fn write_atomically(path: &Path, bytes: &[u8]) -> Result<(), OrbisError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .map_err(|e| OrbisError::render(format!("creating {}: {e}", parent.display())))?;
    }
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    if let Err(e) = std::fs::write(&tmp, bytes) {
        let _ = std::fs::remove_file(&tmp);
        return Err(OrbisError::render(format!("writing {}: {e}", tmp.display())));
    }
    std::fs::rename(&tmp, path).map_err(|e| {
        let _ = std::fs::remove_file(&tmp);
        OrbisError::render(format!("replacing {}: {e}", path.display()))
    })
}
