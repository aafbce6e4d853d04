//! 帮助信息渲染：
//! - 用法行按终端宽度换行，续行与首个选项对齐
//! - 选项表：别名右对齐，点线填充到统一列，再接描述与默认值

use clap::Command;

use crate::renderer::{indent, terminal_width, visible_width, word_wrap, Palette, UI_INDENT};

/// 选项与描述之间最少的点数
const MINIMUM_GAP: usize = 8;

/// 帮助中展示的一个选项
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct OptionSpec {
    pub(crate) flag: String,
    pub(crate) description: String,
    pub(crate) alias: Option<String>,
    pub(crate) default: Option<String>,
}

/// 一次帮助输出的内容
#[derive(Debug, Default)]
pub(crate) struct HelpRequest<'a> {
    pub(crate) invalid: Option<&'a str>,
    pub(crate) usage: &'a [&'a str],
    pub(crate) options: &'a [OptionSpec],
}

/// 从 clap 定义中提取选项（跳过位置参数与隐藏参数），保持声明顺序
pub(crate) fn options_from_command(cmd: &Command) -> Vec<OptionSpec> {
    cmd.get_arguments()
        .filter(|arg| !arg.is_positional() && !arg.is_hide_set())
        .filter_map(|arg| {
            let long = arg.get_long()?;
            let takes_value = arg.get_action().takes_values();
            Some(OptionSpec {
                flag: format!("--{long}"),
                description: arg.get_help().map(|h| h.to_string()).unwrap_or_default(),
                alias: arg.get_short().map(|c| format!("-{c}")),
                // 布尔开关的隐式默认值 `false` 不展示
                default: if takes_value {
                    arg.get_default_values()
                        .first()
                        .map(|v| v.to_string_lossy().into_owned())
                } else {
                    None
                },
            })
        })
        .collect()
}

/// 为某个选项补充展示用的默认值
pub(crate) fn set_default(options: &mut [OptionSpec], flag: &str, value: &str) {
    if let Some(opt) = options.iter_mut().find(|o| o.flag == flag) {
        opt.default = Some(value.to_string());
    }
}

/// 渲染到 stdout
pub(crate) fn print(req: &HelpRequest<'_>) {
    print!("{}", render(req, terminal_width(), Palette::detect()));
}

/// 按给定宽度渲染帮助文本
pub(crate) fn render(req: &HelpRequest<'_>, width: usize, palette: Palette) -> String {
    let mut out: Vec<String> = vec![palette.header()];

    if let Some(invalid) = req.invalid {
        out.push(String::new());
        out.push(format!("{} {}", palette.dim("Invalid command:"), invalid));
    }

    if !req.usage.is_empty() {
        out.push(String::new());
        out.push(palette.dim("Usage:"));
        for (idx, example) in req.usage.iter().enumerate() {
            render_usage(&mut out, idx, example, width, palette);
        }
    }

    if !req.options.is_empty() {
        render_options(&mut out, req.options, width, palette);
    }

    let mut text = out.join("\n");
    text.push('\n');
    text
}

fn render_usage(out: &mut Vec<String>, idx: usize, example: &str, width: usize, palette: Palette) {
    // 命令部分（含末尾空格）与选项部分
    let Some(split) = example.find('[') else {
        out.push(indent(example, 0));
        return;
    };
    let command = &example[..split];
    let options = dim_brackets(&example[split..], palette);
    let command_width = visible_width(command);

    // 命令与选项之间的空格
    let space = 1;
    let lines = word_wrap(&options, width.saturating_sub(UI_INDENT + command_width + space));

    // 需要折行时，与上一条用法之间空一行
    if lines.len() > 1 && idx != 0 {
        out.push(String::new());
    }

    let mut lines = lines.into_iter();
    let first = lines.next().unwrap_or_default();
    out.push(indent(&format!("{command}{first}"), 0));
    for line in lines {
        out.push(indent(&line, command_width));
    }
}

fn render_options(out: &mut Vec<String>, options: &[OptionSpec], width: usize, palette: Palette) {
    let max_alias = options
        .iter()
        .filter_map(|o| o.alias.as_deref())
        .map(visible_width)
        .max()
        .unwrap_or(0);

    // 别名 + `, ` + flag；无别名时用空格补齐
    let option_strings: Vec<String> = options
        .iter()
        .map(|o| match &o.alias {
            Some(alias) => format!("{alias:>max_alias$}, {}", o.flag),
            None => format!("{}{}", " ".repeat(max_alias + 2), o.flag),
        })
        .collect();
    let max_option = option_strings.iter().map(|s| visible_width(s)).max().unwrap_or(0);

    out.push(String::new());
    out.push(palette.dim("Options:"));

    for (spec, option) in options.iter().zip(&option_strings) {
        let option_width = visible_width(option);
        let dot_count = MINIMUM_GAP + (max_option - option_width);
        // 点线前后各一个空格
        let spaces = 2;
        let available = width.saturating_sub(option_width + dot_count + spaces + UI_INDENT);

        let text = match &spec.default {
            Some(value) => format!(
                "{} {}",
                spec.description,
                palette.dim(&format!("[default:\u{202F}{}]", palette.highlight(value)))
            ),
            None => spec.description.clone(),
        };
        let mut lines = word_wrap(&text, available).into_iter();
        let first = lines.next().unwrap_or_default();

        out.push(indent(
            &format!("{} {} {}", palette.blue(option), palette.dot().repeat(dot_count), first),
            0,
        ));
        for line in lines {
            out.push(indent(
                &format!("{}{}", " ".repeat(option_width + dot_count + spaces), line),
                0,
            ));
        }
    }
}

/// 将每个 `[...]` 片段变暗，使命令本身更醒目
fn dim_brackets(text: &str, palette: Palette) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find('[') {
        let Some(len) = rest[start..].find(']') else {
            break;
        };
        out.push_str(&rest[..start]);
        out.push_str(&palette.dim(&rest[start..=start + len]));
        rest = &rest[start + len + 1..];
    }
    out.push_str(rest);
    out
}
