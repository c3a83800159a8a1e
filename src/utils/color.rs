//! 主题颜色校验

/// `#rgb`、`#rrggbb` 或纯小写字母的 CSS 颜色关键字（如 `teal`）
pub fn is_valid_css_color(value: &str) -> bool {
    if let Some(hex) = value.strip_prefix('#') {
        return matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit());
    }
    !value.is_empty() && value.len() <= 32 && value.chars().all(|c| c.is_ascii_lowercase())
}
