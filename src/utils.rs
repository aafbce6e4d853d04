//! 通用辅助函数：
//! - 环境变量读取与解析
//! - 读取标准输入直到结束

use std::{env, io::Read, path::PathBuf};

/// 可选读取 PATH 环境变量为 PathBuf。
pub(crate) fn env_opt_path(key: &str) -> Option<PathBuf> {
    env_opt_string(key).map(PathBuf::from)
}

/// 可选读取 String 环境变量（空白视为未设置）。
pub(crate) fn env_opt_string(key: &str) -> Option<String> {
    env::var(key).ok().map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// 读取布尔环境变量的真值（1/true/on/yes/y）。
pub(crate) fn env_bool_truthy(key: &str) -> Option<bool> {
    env::var(key).ok().map(|v| parse_truthy(&v))
}

fn parse_truthy(v: &str) -> bool {
    matches!(
        v.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "on" | "yes" | "y"
    )
}

/// 将输入流完整读出为字符串（stdin 只读取一次，直到 EOF）。
pub(crate) fn drain_stdin<R: Read>(mut reader: R) -> std::io::Result<String> {
    let mut buf = String::new();
    reader.read_to_string(&mut buf)?;
    Ok(buf)
}
