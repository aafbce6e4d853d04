//! 终端输出辅助：
//! - 缩进、按宽度换行（忽略 ANSI 转义序列的可见宽度）
//! - 仅在 stdout 为终端时着色

use owo_colors::OwoColorize;
use std::io::{self, IsTerminal};
use terminal_size::{terminal_size, Width};
use unicode_width::UnicodeWidthStr;

/// 所有输出行的基础缩进
pub(crate) const UI_INDENT: usize = 2;

// 无法获取终端宽度时使用
const FALLBACK_WIDTH: usize = 80;

/// 着色开关
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Palette {
    color: bool,
}

impl Palette {
    pub(crate) fn detect() -> Self {
        Self { color: io::stdout().is_terminal() }
    }

    #[cfg(test)]
    pub(crate) fn plain() -> Self {
        Self { color: false }
    }

    pub(crate) fn dim(&self, s: &str) -> String {
        if self.color {
            s.dimmed().to_string()
        } else {
            s.to_string()
        }
    }

    pub(crate) fn blue(&self, s: &str) -> String {
        if self.color {
            s.blue().to_string()
        } else {
            s.to_string()
        }
    }

    /// 选项与描述之间的点
    pub(crate) fn dot(&self) -> String {
        if self.color {
            "\u{00B7}".bright_black().dimmed().to_string()
        } else {
            "\u{00B7}".to_string()
        }
    }

    /// 用反引号包裹并高亮，例如默认值
    pub(crate) fn highlight(&self, s: &str) -> String {
        format!("{}{}{}", self.dim(&self.blue("`")), self.blue(s), self.dim(&self.blue("`")))
    }

    pub(crate) fn header(&self) -> String {
        let mark = if self.color {
            "\u{2248}".blue().bold().italic().to_string()
        } else {
            "\u{2248}".to_string()
        };
        format!(
            "{} tailwind-theme {}",
            mark,
            self.blue(&format!("v{}", env!("CARGO_PKG_VERSION")))
        )
    }
}

/// 当前终端列数
pub(crate) fn terminal_width() -> usize {
    terminal_size()
        .map(|(Width(w), _)| w as usize)
        .filter(|w| *w > 0)
        .unwrap_or(FALLBACK_WIDTH)
}

/// 在基础缩进之外再缩进 `offset` 列
pub(crate) fn indent(value: &str, offset: usize) -> String {
    format!("{}{}", " ".repeat(offset + UI_INDENT), value)
}

/// 去掉 ANSI 转义序列后的显示列宽（宽字符计 2 列）
pub(crate) fn visible_width(s: &str) -> usize {
    strip_ansi(s).width()
}

fn strip_ansi(s: &str) -> String {
    let mut plain = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\u{1b}' {
            // CSI: ESC [ ... 终止字节 0x40..=0x7E
            if chars.next() == Some('[') {
                for t in chars.by_ref() {
                    if ('\u{40}'..='\u{7e}').contains(&t) {
                        break;
                    }
                }
            }
            continue;
        }
        plain.push(c);
    }
    plain
}

/// 按空格分词换行，单词本身超宽时独占一行
pub(crate) fn word_wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut line_width = 0;

    for word in text.split(' ') {
        let word_width = visible_width(word);
        if line_width > 0 && line_width + word_width + 1 > width {
            lines.push(std::mem::take(&mut line));
            line_width = 0;
        }
        if line_width > 0 {
            line.push(' ');
            line_width += 1;
        }
        line.push_str(word);
        line_width += word_width;
    }
    if line_width > 0 {
        lines.push(line);
    }
    lines
}
