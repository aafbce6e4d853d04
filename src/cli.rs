//! CLI 定义模块：仅负责命令行参数结构体与解析
//! 帮助信息由 `help` 模块自行渲染，因此这里关闭了 clap 自带的 `--help`。

use clap::Parser;
use std::path::PathBuf;

/// 顶层 CLI 入口（隐式 build，不支持子命令）
#[derive(Parser, Debug)]
#[command(
    name = "tailwind-theme",
    about = "按主题文件批量构建 Tailwind CSS",
    version,
    disable_help_flag = true
)]
pub(crate) struct Cli {
    /// Theme file to read (`-` reads from stdin)
    #[arg(short, long, value_name = "FILE")]
    pub(crate) input: Option<String>,
    /// Output directory, one `<theme>.css` per theme
    #[arg(short, long, value_name = "DIR")]
    pub(crate) output: Option<PathBuf>,
    /// Watch for changes and rebuild as needed
    #[arg(short, long)]
    pub(crate) watch: bool,
    /// Optimize and minify the output
    #[arg(short, long)]
    pub(crate) minify: bool,
    /// Optimize the output without minifying
    #[arg(long)]
    pub(crate) optimize: bool,
    /// Generate a source map
    #[arg(long)]
    pub(crate) map: bool,
    /// The current working directory
    #[arg(long, value_name = "DIR")]
    pub(crate) cwd: Option<PathBuf>,
    /// CSS build command invoked once per theme
    #[arg(long, value_name = "PROGRAM")]
    pub(crate) bin: Option<String>,
    /// Display usage information
    #[arg(short, long)]
    pub(crate) help: bool,
    /// 位置参数：当前不支持任何子命令，出现即视为非法命令
    #[arg(value_name = "COMMAND", hide = true)]
    pub(crate) command: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn parses_short_flags() {
        let cli = Cli::try_parse_from(["tailwind-theme", "-i", "themes.json", "-o", "dist", "-w"])
            .expect("parse");
        assert_eq!(cli.input.as_deref(), Some("themes.json"));
        assert_eq!(cli.output, Some(PathBuf::from("dist")));
        assert!(cli.watch);
        assert!(!cli.minify);
        assert_eq!(cli.bin, None);
        assert!(cli.command.is_empty());
    }

    #[test]
    fn dash_is_accepted_as_input() {
        let cli = Cli::try_parse_from(["tailwind-theme", "--input", "-", "--output=dist"]).expect("parse");
        assert_eq!(cli.input.as_deref(), Some("-"));
    }

    #[test]
    fn positional_arguments_are_collected() {
        let cli = Cli::try_parse_from(["tailwind-theme", "init"]).expect("parse");
        assert_eq!(cli.command, vec!["init".to_string()]);
    }

    #[test]
    fn help_flag_is_ours() {
        let cli = Cli::try_parse_from(["tailwind-theme", "-h"]).expect("parse");
        assert!(cli.help);
        Cli::command().debug_assert();
    }
}
