pub mod color;
pub mod ip;
pub mod time_parser;
pub mod url_validator;

/// 邀请页 id 长度
pub const INVITE_ID_LEN: usize = 26;

/// 生成小写 base36 随机 id（邀请页公开链接的一部分）
pub fn generate_invite_id() -> String {
    generate_base36(INVITE_ID_LEN)
}

pub fn generate_base36(length: usize) -> String {
    use std::iter;

    let chars = b"0123456789abcdefghijklmnopqrstuvwxyz";

    iter::repeat_with(|| chars[rand::random_range(0..chars.len())] as char)
        .take(length)
        .collect()
}
