use crate::Context;
use poise::serenity_prelude as serenity;
use uuid::Uuid;

pub const COLOR_SUCCESS: u32 = 0x00FF00;
pub const COLOR_ERROR: u32 = 0xFF0000;
pub const COLOR_WARNING: u32 = 0xFFAA00;
pub const COLOR_INFO: u32 = 0x0099FF;

/// Reply with an error embed
pub async fn send_err_embed(ctx: Context<'_>, title: &str, description: &str) {
    let embed = serenity::CreateEmbed::new()
        .title(title)
        .color(COLOR_ERROR)
        .description(description);
    let _ = ctx
        .send(poise::CreateReply::default().embed(embed))
        .await;
}

/// Short id that keys an upload in the store and the database.
pub fn new_file_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(12);
    id
}

/// Format a byte count the way Discord users expect to read it.
pub fn format_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
    if bytes == 0 {
        return String::from("0 B");
    }
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    format!("{:.2} {}", size, UNITS[unit])
}

/// Strip path separators and other characters an attachment name should
/// never smuggle into the store, and cap the length.
pub fn sanitize_filename(name: &str) -> String {
    const DANGEROUS: &[char] = &['/', '\\', '<', '>', ':', '"', '|', '?', '*'];

    let mut sanitized: String = name
        .chars()
        .map(|c| {
            if DANGEROUS.contains(&c) || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect();
    sanitized = sanitized.replace("..", "_");

    if sanitized.chars().count() > 100 {
        let (stem, ext) = match sanitized.rfind('.') {
            Some(i) => (&sanitized[..i], &sanitized[i..]),
            None => (sanitized.as_str(), ""),
        };
        let stem: String = stem.chars().take(95).collect();
        sanitized = format!("{}{}", stem, ext);
    }
    sanitized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_ids_are_short_hex_and_unique() {
        let a = new_file_id();
        let b = new_file_id();
        assert_eq!(a.len(), 12);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[test]
    fn format_size_scales_units() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(512), "512.00 B");
        assert_eq!(format_size(1024), "1.00 KB");
        assert_eq!(format_size(1536), "1.50 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.00 MB");
        assert_eq!(format_size(3 * 1024 * 1024 * 1024), "3.00 GB");
    }

    #[test]
    fn sanitize_strips_separators_and_traversal() {
        assert_eq!(sanitize_filename("my game.rbxl"), "my game.rbxl");
        assert_eq!(sanitize_filename("a/b\\c.rbxl"), "a_b_c.rbxl");
        assert_eq!(sanitize_filename("..secret.rbxl"), "_secret.rbxl");
        assert_eq!(sanitize_filename("x<y>z?.rbxlx"), "x_y_z_.rbxlx");
    }

    #[test]
    fn sanitize_caps_length_but_keeps_extension() {
        let long = format!("{}.rbxlx", "a".repeat(200));
        let out = sanitize_filename(&long);
        assert!(out.chars().count() <= 101);
        assert!(out.ends_with(".rbxlx"));
    }
}
