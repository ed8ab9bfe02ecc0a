//! Removal of generated image size suffixes (`-300x200` in `pic-300x200.jpg`).

use regex::Regex;
use std::sync::OnceLock;

/// Extensions the platform generates size variants for.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

fn dimension_suffix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        let source = format!(r"(?i)-\d+x\d+(\.(?:{}))", IMAGE_EXTENSIONS.join("|"));
        Regex::new(&source).expect("dimension suffix pattern is valid")
    })
}

/// Strips every `-<w>x<h>` that directly precedes an image extension.
///
/// Repeats until the name is stable, so the result is a fixed point:
/// `strip_dimension_suffix(strip_dimension_suffix(x)) == strip_dimension_suffix(x)`.
pub fn strip_dimension_suffix(filename: &str) -> String {
    let re = dimension_suffix();
    let mut current = filename.to_string();
    loop {
        let next = re.replace_all(&current, "$1").into_owned();
        if next == current {
            return current;
        }
        current = next;
    }
}
