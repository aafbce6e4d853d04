//! 主题文件模块：
//! - 定义 `Theme` / `WrappedTheme` 数据结构
//! - 从文件、标准输入或空对象读取主题列表
//! - 按主题展开构建参数（fan-out）

use serde::Deserialize;
use serde_json::Value;
use std::{
    fs, io,
    path::{Path, PathBuf},
};

use crate::{build::BuildOptions, error::ThemeError, utils::drain_stdin};

/// 单个主题：名称决定输出文件名，input 为该主题的入口样式表
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct Theme {
    pub(crate) name: String,
    pub(crate) input: PathBuf,
}

/// 主题文件的顶层结构（`$schema` 等其余字段忽略）
#[derive(Debug, Deserialize)]
pub(crate) struct WrappedTheme {
    pub(crate) themes: Vec<Theme>,
}

/// 主题文件来源
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ThemeSource {
    /// `-`：从标准输入读取
    Stdin,
    File(PathBuf),
    /// 未指定：按 `{}` 处理
    Empty,
}

impl ThemeSource {
    pub(crate) fn from_arg(arg: Option<&str>) -> Self {
        match arg {
            Some("-") => ThemeSource::Stdin,
            Some(p) => ThemeSource::File(PathBuf::from(p)),
            None => ThemeSource::Empty,
        }
    }

    /// 人类可读的来源描述
    pub(crate) fn describe(&self) -> String {
        match self {
            ThemeSource::Stdin => "<stdin>".to_string(),
            ThemeSource::File(p) => p.display().to_string(),
            ThemeSource::Empty => "<none>".to_string(),
        }
    }
}

/// 读取并解析主题列表
pub(crate) fn read_themes(source: &ThemeSource) -> Result<Vec<Theme>, ThemeError> {
    let content = match source {
        ThemeSource::Stdin => drain_stdin(io::stdin().lock()).map_err(ThemeError::Stdin)?,
        ThemeSource::File(path) => fs::read_to_string(path).map_err(|source| ThemeError::Read {
            path: path.clone(),
            source,
        })?,
        ThemeSource::Empty => String::from("{}"),
    };
    parse_themes(&content)
}

/// 解析主题文件文本。`themes` 缺失或为假值时返回 `MissingThemes`。
pub(crate) fn parse_themes(text: &str) -> Result<Vec<Theme>, ThemeError> {
    let value: Value = serde_json::from_str(text)?;
    if value.get("themes").map_or(true, is_falsy) {
        return Err(ThemeError::MissingThemes);
    }
    let wrapped: WrappedTheme = serde_json::from_value(value)?;
    Ok(wrapped.themes)
}

// null、false、0 与空字符串视同缺失
fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

/// 为每个主题生成一份构建参数：覆盖 input，并把输出命名为 `<out>/<name>.css`
pub(crate) fn generate_args(themes: &[Theme], base: &BuildOptions) -> Vec<BuildOptions> {
    let out_dir = base.output.as_deref().unwrap_or(Path::new("."));
    themes
        .iter()
        .map(|theme| BuildOptions {
            input: Some(theme.input.clone()),
            output: Some(out_dir.join(format!("{}.css", theme.name))),
            ..base.clone()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base(output: Option<&str>) -> BuildOptions {
        BuildOptions {
            input: Some(PathBuf::from("themes.json")),
            output: output.map(PathBuf::from),
            watch: true,
            minify: true,
            ..BuildOptions::default()
        }
    }

    fn theme(name: &str, input: &str) -> Theme {
        Theme { name: name.to_string(), input: PathBuf::from(input) }
    }

    #[test]
    fn source_from_arg() {
        assert_eq!(ThemeSource::from_arg(Some("-")), ThemeSource::Stdin);
        assert_eq!(
            ThemeSource::from_arg(Some("themes.json")),
            ThemeSource::File(PathBuf::from("themes.json"))
        );
        assert_eq!(ThemeSource::from_arg(None), ThemeSource::Empty);
    }

    #[test]
    fn parse_single_theme() {
        let themes = parse_themes(r#"{"themes":[{"name":"dark","input":"dark.css"}]}"#).unwrap();
        assert_eq!(themes, vec![theme("dark", "dark.css")]);
    }

    #[test]
    fn schema_is_optional_and_ignored() {
        let text = r#"{
            "$schema": "./node_modules/tailwind-theme/schema.json",
            "themes": [
                {"name": "light", "input": "src/light.css"},
                {"name": "dark", "input": "src/dark.css"}
            ]
        }"#;
        let themes = parse_themes(text).unwrap();
        assert_eq!(themes.len(), 2);
        assert_eq!(themes[0].name, "light");
        assert_eq!(themes[1].input, PathBuf::from("src/dark.css"));
    }

    #[test]
    fn missing_themes_key() {
        assert!(matches!(parse_themes("{}"), Err(ThemeError::MissingThemes)));
        assert!(matches!(parse_themes(r#"{"themes": null}"#), Err(ThemeError::MissingThemes)));
        assert!(matches!(parse_themes("[]"), Err(ThemeError::MissingThemes)));
    }

    #[test]
    fn falsy_themes_count_as_missing() {
        for text in [r#"{"themes": false}"#, r#"{"themes": 0}"#, r#"{"themes": ""}"#] {
            assert!(matches!(parse_themes(text), Err(ThemeError::MissingThemes)), "{text}");
        }
        // 真值但类型不对仍是解析错误
        assert!(matches!(parse_themes(r#"{"themes": true}"#), Err(ThemeError::Parse(_))));
        assert!(matches!(parse_themes(r#"{"themes": {}}"#), Err(ThemeError::Parse(_))));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(parse_themes("{\"themes\": ["), Err(ThemeError::Parse(_))));
    }

    #[test]
    fn empty_source_reports_missing_themes() {
        assert!(matches!(read_themes(&ThemeSource::Empty), Err(ThemeError::MissingThemes)));
    }

    #[test]
    fn unreadable_file_keeps_path() {
        let err = read_themes(&ThemeSource::File(PathBuf::from("does/not/exist.json"))).unwrap_err();
        match err {
            ThemeError::Read { path, .. } => assert_eq!(path, PathBuf::from("does/not/exist.json")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn reads_theme_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("themes.json");
        fs::write(&path, r#"{"themes":[{"name":"brand","input":"brand.css"}]}"#).unwrap();
        let themes = read_themes(&ThemeSource::File(path)).unwrap();
        assert_eq!(themes, vec![theme("brand", "brand.css")]);
    }

    #[test]
    fn fan_out_one_per_theme() {
        let themes = vec![theme("light", "light.css"), theme("dark", "dark.css"), theme("hc", "a/hc.css")];
        let args = generate_args(&themes, &base(Some("dist")));
        assert_eq!(args.len(), 3);
        let outputs: Vec<_> = args.iter().map(|a| a.output.clone().unwrap()).collect();
        assert_eq!(
            outputs,
            vec![
                PathBuf::from("dist/light.css"),
                PathBuf::from("dist/dark.css"),
                PathBuf::from("dist/hc.css"),
            ]
        );
        assert_eq!(args[2].input, Some(PathBuf::from("a/hc.css")));
    }

    #[test]
    fn fan_out_keeps_shared_flags() {
        let shared = BuildOptions {
            map: true,
            cwd: Some(PathBuf::from("web")),
            ..base(Some("dist"))
        };
        let themes = vec![theme("light", "light.css"), theme("dark", "dark.css"), theme("hc", "hc.css")];
        let args = generate_args(&themes, &shared);
        assert_eq!(args.len(), themes.len());

        // 除 input / output 外，每一项都与公共参数一致
        let expected = BuildOptions { input: None, output: None, ..shared.clone() };
        for derived in &args {
            let masked = BuildOptions { input: None, output: None, ..derived.clone() };
            assert_eq!(masked, expected);
        }
    }

    #[test]
    fn fan_out_empty() {
        assert!(generate_args(&[], &base(Some("dist"))).is_empty());
    }

    #[test]
    fn fan_out_without_output_uses_current_dir() {
        let args = generate_args(&[theme("dark", "dark.css")], &base(None));
        assert_eq!(args[0].output, Some(PathBuf::from("./dark.css")));
    }
}
