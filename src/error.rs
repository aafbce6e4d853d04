//! 主题文件加载的错误类型

use std::{io, path::PathBuf};
use thiserror::Error;

/// 读取与解析主题文件时可能出现的错误
#[derive(Error, Debug)]
pub(crate) enum ThemeError {
    #[error("failed to read theme file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read theme file from stdin: {0}")]
    Stdin(#[source] io::Error),

    #[error("failed to parse theme file: {0}")]
    Parse(#[from] serde_json::Error),

    /// 顶层缺少 `themes` 字段
    #[error("Invalid theme file. Please check if the file is a valid JSON file.")]
    MissingThemes,
}
