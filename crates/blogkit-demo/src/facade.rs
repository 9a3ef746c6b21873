//! DOM access facade handed to demo code.
//!
//! Demo scripts run inside a shadow root, where `document.querySelector`
//! cannot see their own markup. Instead of patching `document`, the generated
//! module builds a frozen `dom` object with shadow-piercing lookups rooted at
//! the demo's `<live-demo>` host and passes it to the wrapped body.

use crate::error::{DemoError, Result};

pub struct DomFacade {
    id_literal: String,
}

impl DomFacade {
    /// Parameter name the demo body sees.
    pub const BINDING: &'static str = "dom";
    /// Module-scoped constant holding the facade.
    pub const GLOBAL: &'static str = "__liveDemoDom";
    pub const METHODS: [&'static str; 4] = ["query", "queryAll", "getById", "addEventListener"];

    pub fn for_demo(demo_id: &str) -> Result<Self> {
        let id_literal = serde_json::to_string(demo_id).map_err(|e| DemoError::Script(e.to_string()))?;
        Ok(Self { id_literal })
    }

    pub fn prelude(&self) -> String {
        format!(
            r#"const {global} = (() => {{
  const scope = document.querySelector(`live-demo[data-demo-id=${{JSON.stringify({id})}}]`) ?? document;
  const queryAll = (selector) => {{
    const found = [];
    const walk = (root) => {{
      found.push(...root.querySelectorAll(selector));
      if (root.shadowRoot) walk(root.shadowRoot);
      for (const el of root.querySelectorAll("*")) {{
        if (el.shadowRoot) walk(el.shadowRoot);
      }}
    }};
    walk(scope);
    return found;
  }};
  const query = (selector) => queryAll(selector)[0] ?? null;
  const getById = (id) => query(`#${{CSS.escape(id)}}`);
  const addEventListener = (type, listener, options) => scope.addEventListener(type, listener, options);
  return Object.freeze({{ {methods} }});
}})();
"#,
            global = Self::GLOBAL,
            id = self.id_literal,
            methods = Self::METHODS.join(", "),
        )
    }
}
