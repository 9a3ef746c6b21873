//! Assembly of an expanded demo into renderable content.

use std::sync::OnceLock;

use regex::Regex;

use crate::aggregate::DemoGroup;
use crate::error::Result;
use crate::facade::DomFacade;
use crate::fence::Language;

fn hoisted_line() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // `import x from`, `export {x} from`, and bare `import "m"`.
    RE.get_or_init(|| {
        Regex::new(r#"^\s*(?:(?:import|export)\b.+\bfrom\b|import\s*["'])"#).unwrap_or_else(|e| panic!("static regex: {e}"))
    })
}

fn statement_open() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // `import {` / `export {` / `import a, {` with the brace left open.
    RE.get_or_init(|| {
        Regex::new(r"^\s*(?:(?:import|export)\s*\{|import\s+[\w$]+\s*,\s*\{)[^}]*$").unwrap_or_else(|e| panic!("static regex: {e}"))
    })
}

fn from_clause() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"\bfrom\s*["']"#).unwrap_or_else(|e| panic!("static regex: {e}")))
}

/// Split JS into `(imports, body)`.
///
/// Module-level import/export-from statements cannot live inside the async
/// wrapper, so they are hoisted. A statement whose specifier list spans
/// several lines is hoisted whole, up to its `from '...'` line. A brace list
/// that closes without a `from` is a local export and stays in the body.
/// Each bucket keeps its original line order.
pub fn split_imports(js: &str) -> (String, String) {
    let mut imports: Vec<&str> = Vec::new();
    let mut body: Vec<&str> = Vec::new();
    let mut pending: Vec<&str> = Vec::new();
    for line in js.lines() {
        if !pending.is_empty() {
            pending.push(line);
            if from_clause().is_match(line) {
                imports.append(&mut pending);
            } else if line.contains('}') || line.contains(';') {
                body.append(&mut pending);
            }
            continue;
        }
        if hoisted_line().is_match(line) {
            imports.push(line);
        } else if statement_open().is_match(line) {
            pending.push(line);
        } else {
            body.push(line);
        }
    }
    body.append(&mut pending);
    (imports.join("\n"), body.join("\n"))
}

/// Everything needed to run one demo; rebuilt on every expand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutableSnippet {
    pub import_statements: String,
    pub body_code: String,
    pub html: String,
    pub css: String,
}

impl ExecutableSnippet {
    /// Expanded content is the union of all fragments, whatever tab is selected.
    pub fn from_group(group: &DemoGroup) -> Self {
        let (import_statements, body_code) = split_imports(group.source(Language::Js));
        Self {
            import_statements,
            body_code,
            html: group.source(Language::Html).to_string(),
            css: group.source(Language::Css).to_string(),
        }
    }

    /// Module script text: hoisted imports, the DOM facade, then the body
    /// inside an async IIFE that logs instead of throwing.
    pub fn module_script(&self, demo_id: &str) -> Result<String> {
        let facade = DomFacade::for_demo(demo_id)?;
        let mut script = String::new();
        if !self.import_statements.is_empty() {
            script.push_str(&self.import_statements);
            script.push('\n');
        }
        script.push_str(&facade.prelude());
        script.push_str(&format!(
            "(async ({binding}) => {{\n  try {{\n{body}\n  }} catch (e) {{\n    console.error(e);\n  }}\n}})({global});\n",
            binding = DomFacade::BINDING,
            body = self.body_code,
            global = DomFacade::GLOBAL,
        ));
        Ok(script)
    }

    /// The markup rendered into the execution host's shadow root.
    pub fn render_content(&self, demo_id: &str) -> Result<String> {
        let script = self.module_script(demo_id)?;
        Ok(format!(
            "<style>\n{css}\n</style>\n{html}\n<script type=\"module\">\n{script}</script>\n",
            css = self.css,
            html = self.html,
            script = escape_script_close(&script),
        ))
    }
}

/// Keep a literal `</script` in demo code from ending the element early.
fn escape_script_close(script: &str) -> String {
    script.replace("</script", "<\\/script")
}
