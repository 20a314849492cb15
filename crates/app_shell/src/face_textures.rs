//! Face label textures, packed side by side into one atlas.

use menu_core::CubeFace;
use resvg::render;
use settings::FaceSettings;
use tiny_skia::Pixmap;
use tracing::{debug, warn};
use usvg::{fontdb, Options};

const FACE_TEMPLATE_SVG: &str = include_str!("face_template.svg");

/// Edge length of one face tile in pixels.
pub const TILE_SIZE: u32 = 256;

/// RGBA8 atlas with one `TILE_SIZE` tile per face, in face index order.
pub struct FaceAtlas {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl FaceAtlas {
    pub fn build(faces: &[FaceSettings; 6]) -> Self {
        let width = TILE_SIZE * CubeFace::ALL.len() as u32;
        let height = TILE_SIZE;
        let mut pixels = vec![0u8; (width * height * 4) as usize];

        let fontdb = load_fonts();
        for face in CubeFace::ALL {
            let settings = &faces[face.index()];
            let tile = match face_tile(settings, &fontdb) {
                Some(tile) => tile,
                None => {
                    warn!(face = face.name(), "label rasterization failed; using plain tile");
                    solid_tile(settings.color)
                }
            };
            blit_tile(&mut pixels, width, face.index() as u32, &tile);
        }
        debug!(width, height, "face atlas ready");
        Self {
            width,
            height,
            pixels,
        }
    }

    #[cfg(test)]
    fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let offset = ((y * self.width + x) * 4) as usize;
        [
            self.pixels[offset],
            self.pixels[offset + 1],
            self.pixels[offset + 2],
            self.pixels[offset + 3],
        ]
    }
}

fn load_fonts() -> fontdb::Database {
    let mut fontdb = fontdb::Database::new();
    fontdb.load_system_fonts();
    fontdb
}

fn face_tile(face: &FaceSettings, fontdb: &fontdb::Database) -> Option<Vec<u8>> {
    let text = auto_text_color(face.color);
    let svg = FACE_TEMPLATE_SVG
        .replace("{{BACKGROUND_COLOR}}", &rgb_to_hex(face.color))
        .replace("{{TEXT_COLOR}}", &rgb_to_hex(text))
        .replace("{{LABEL}}", &escape_xml(&face.label));
    rasterize_svg(&svg, fontdb)
}

fn rasterize_svg(svg: &str, fontdb: &fontdb::Database) -> Option<Vec<u8>> {
    let mut opt = Options::default();
    opt.font_family = "DejaVu Sans".into();
    opt.languages = vec!["en".into()];
    opt.font_size = 44.0;
    let tree = usvg::Tree::from_data(svg.as_bytes(), &opt, fontdb).ok()?;
    let size = tree.size().to_int_size();
    if size.width() != TILE_SIZE || size.height() != TILE_SIZE {
        return None;
    }
    let mut pixmap = Pixmap::new(TILE_SIZE, TILE_SIZE)?;
    let mut pixmap_mut = pixmap.as_mut();
    render(&tree, tiny_skia::Transform::identity(), &mut pixmap_mut);
    Some(pixmap.take())
}

fn solid_tile(color: [u8; 3]) -> Vec<u8> {
    let [r, g, b] = color;
    [r, g, b, 255].repeat((TILE_SIZE * TILE_SIZE) as usize)
}

fn blit_tile(atlas: &mut [u8], atlas_width: u32, slot: u32, tile: &[u8]) {
    let row_bytes = (TILE_SIZE * 4) as usize;
    for row in 0..TILE_SIZE as usize {
        let src = &tile[row * row_bytes..(row + 1) * row_bytes];
        let dst_start = (row * atlas_width as usize + (slot * TILE_SIZE) as usize) * 4;
        atlas[dst_start..dst_start + row_bytes].copy_from_slice(src);
    }
}

/// Dark text on light faces, light text on dark ones.
fn auto_text_color(background: [u8; 3]) -> [u8; 3] {
    let [r, g, b] = background.map(|c| c as f32 / 255.0);
    let luminance = 0.2126 * r + 0.7152 * g + 0.0722 * b;
    if luminance > 0.6 {
        [30, 30, 30]
    } else {
        [240, 240, 240]
    }
}

fn rgb_to_hex(rgb: [u8; 3]) -> String {
    format!("#{:02X}{:02X}{:02X}", rgb[0], rgb[1], rgb[2])
}

fn escape_xml(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}
