use std::collections::BTreeMap;

/// Snippet shown when a new live sandbox block is inserted.
pub const DEFAULT_SNIPPET_CONTENT: &str = r#"export default function App() {
  return (
    <div className="App">
      <h1>Hello CodeSandbox</h1>
      <h2>Start editing to see some magic happen!</h2>
    </div>
  );
}"#;

/// Code block settings: fallback language and the languages the surface knows.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeBlockConfig {
    pub default_language: String,
    /// Fence token -> display name.
    pub languages: BTreeMap<String, String>,
}

impl CodeBlockConfig {
    pub fn display_name(&self, token: &str) -> Option<&str> {
        self.languages.get(token).map(String::as_str)
    }

    pub fn is_registered(&self, token: &str) -> bool {
        self.languages.contains_key(token)
    }
}

impl Default for CodeBlockConfig {
    fn default() -> Self {
        let languages = [("java", "Java"), ("js", "JavaScript"), ("css", "CSS")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self {
            default_language: "js".to_string(),
            languages,
        }
    }
}

/// A live-preview sandbox template.
#[derive(Debug, Clone, PartialEq)]
pub struct SandboxPreset {
    pub label: String,
    pub name: String,
    /// Fence meta word marking a code block as a live sandbox.
    pub meta: String,
    pub snippet_file_name: String,
    pub snippet_language: String,
    pub initial_snippet_content: String,
}

impl SandboxPreset {
    pub fn react() -> Self {
        Self {
            label: "React".to_string(),
            name: "react".to_string(),
            meta: "live".to_string(),
            snippet_file_name: "/App.js".to_string(),
            snippet_language: "jsx".to_string(),
            initial_snippet_content: DEFAULT_SNIPPET_CONTENT.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SandboxConfig {
    pub default_preset: String,
    pub presets: Vec<SandboxPreset>,
}

impl SandboxConfig {
    pub fn default_preset(&self) -> Option<&SandboxPreset> {
        self.presets.iter().find(|p| p.name == self.default_preset)
    }

    /// Preset for a fence info string's meta words.
    ///
    /// A block is live when one of its words is a preset's meta word. A
    /// `preset=<name>` word picks among live presets; otherwise the default
    /// preset wins over the others.
    pub fn preset_for_meta<'a>(&self, meta_words: impl IntoIterator<Item = &'a str>) -> Option<&SandboxPreset> {
        let words: Vec<&str> = meta_words.into_iter().collect();
        let is_live = |p: &&SandboxPreset| words.contains(&p.meta.as_str());

        if let Some(name) = words.iter().find_map(|w| w.strip_prefix("preset=")) {
            return self.presets.iter().filter(is_live).find(|p| p.name == name);
        }
        self.default_preset()
            .filter(is_live)
            .or_else(|| self.presets.iter().find(is_live))
    }
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            default_preset: "react".to_string(),
            presets: vec![SandboxPreset::react()],
        }
    }
}

/// Editing capabilities enabled on the markdown surface.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorConfig {
    pub headings: bool,
    pub lists: bool,
    pub quotes: bool,
    pub thematic_breaks: bool,
    pub tables: bool,
    pub links: bool,
    pub images: bool,
    /// `None` disables fenced code blocks.
    pub code_blocks: Option<CodeBlockConfig>,
    /// `None` disables live sandboxes.
    pub sandbox: Option<SandboxConfig>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            headings: true,
            lists: true,
            quotes: true,
            thematic_breaks: true,
            tables: true,
            links: true,
            images: true,
            code_blocks: Some(CodeBlockConfig::default()),
            sandbox: Some(SandboxConfig::default()),
        }
    }
}
