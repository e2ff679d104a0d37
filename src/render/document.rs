use crate::foundation::core::MapFrame;
use crate::render::opts::Theme;

/// Assemble a standalone SVG document around rendered fragments.
///
/// The canvas is exactly `frame`; fragments in projected map units are
/// shifted by the frame origin. The basemap, when present, is drawn first.
pub fn compose_document(
    frame: &MapFrame,
    theme: Theme,
    basemap: Option<&str>,
    schematic: &str,
) -> String {
    let (w, h) = (frame.width(), frame.height());
    let mut doc = String::new();
    doc.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"no\"?>\n");
    doc.push_str(&format!(
        "<svg width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\" xmlns=\"http://www.w3.org/2000/svg\">\n"
    ));
    doc.push_str(&format!(
        "<rect id=\"page\" x=\"0\" y=\"0\" width=\"{w}\" height=\"{h}\" style=\"fill:{};stroke:none;\" />\n",
        theme.page_color()
    ));
    doc.push_str(&format!(
        "<g transform=\"translate({}, {})\">\n",
        -frame.left(),
        -frame.top()
    ));
    if let Some(basemap) = basemap {
        doc.push_str(basemap);
    }
    doc.push_str(schematic);
    doc.push_str("</g>\n</svg>\n");
    doc
}

#[cfg(test)]
#[path = "../../tests/unit/render/document.rs"]
mod tests;
