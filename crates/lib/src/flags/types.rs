use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Flags for one tool, split into a platform tier and a rule tier.
///
/// Platform flags come from the toolchain description, rule flags from the
/// target itself. When several `ToolFlags` are concatenated all platform
/// flags precede all rule flags so that target settings win.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolFlags {
  pub platform: Vec<String>,
  pub rule: Vec<String>,
}

impl ToolFlags {
  pub fn new(platform: Vec<String>, rule: Vec<String>) -> Self {
    Self { platform, rule }
  }

  /// Platform flags followed by rule flags.
  pub fn all_flags(&self) -> Vec<String> {
    self.platform.iter().chain(self.rule.iter()).cloned().collect()
  }

  pub fn is_empty(&self) -> bool {
    self.platform.is_empty() && self.rule.is_empty()
  }

  /// Concatenate tiers in order: every platform tier, then every rule tier.
  pub fn concat<'a>(parts: impl IntoIterator<Item = &'a ToolFlags>) -> ToolFlags {
    let mut platform = Vec::new();
    let mut rule = Vec::new();
    for part in parts {
      platform.extend(part.platform.iter().cloned());
      rule.extend(part.rule.iter().cloned());
    }
    ToolFlags { platform, rule }
  }
}

impl From<Vec<String>> for ToolFlags {
  fn from(rule: Vec<String>) -> Self {
    Self {
      platform: Vec::new(),
      rule,
    }
  }
}

impl From<&[&str]> for ToolFlags {
  fn from(rule: &[&str]) -> Self {
    rule.iter().map(|s| s.to_string()).collect::<Vec<_>>().into()
  }
}

/// A header search root declared by the target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "path", rename_all = "snake_case")]
pub enum SearchPath {
  /// `-I <dir>`
  Include(PathBuf),
  /// `-isystem <dir>`
  System(PathBuf),
  /// `-iquote <dir>`
  Quote(PathBuf),
  /// `-F <dir>`
  Framework(PathBuf),
  /// `-iframework <dir>`
  SystemFramework(PathBuf),
}

impl SearchPath {
  pub fn path(&self) -> &Path {
    match self {
      SearchPath::Include(p)
      | SearchPath::System(p)
      | SearchPath::Quote(p)
      | SearchPath::Framework(p)
      | SearchPath::SystemFramework(p) => p,
    }
  }

  pub fn flag(&self) -> &'static str {
    match self {
      SearchPath::Include(_) => "-I",
      SearchPath::System(_) => "-isystem",
      SearchPath::Quote(_) => "-iquote",
      SearchPath::Framework(_) => "-F",
      SearchPath::SystemFramework(_) => "-iframework",
    }
  }

  /// The flag and its directory as two separate arguments.
  pub fn to_args(&self) -> [String; 2] {
    [self.flag().to_string(), self.path().to_string_lossy().to_string()]
  }
}

/// Language of the translation unit, passed to the compiler as `-x <lang>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceLanguage {
  C,
  Cxx,
  ObjC,
  ObjCxx,
  Cuda,
  Hip,
  Asm,
  AsmWithCpp,
  CCppOutput,
  CxxCppOutput,
  ObjCCppOutput,
  ObjCxxCppOutput,
}

impl SourceLanguage {
  pub fn as_flag(self) -> &'static str {
    match self {
      SourceLanguage::C => "c",
      SourceLanguage::Cxx => "c++",
      SourceLanguage::ObjC => "objective-c",
      SourceLanguage::ObjCxx => "objective-c++",
      SourceLanguage::Cuda => "cuda",
      SourceLanguage::Hip => "hip",
      SourceLanguage::Asm => "assembler",
      SourceLanguage::AsmWithCpp => "assembler-with-cpp",
      SourceLanguage::CCppOutput => "cpp-output",
      SourceLanguage::CxxCppOutput => "c++-cpp-output",
      SourceLanguage::ObjCCppOutput => "objective-c-cpp-output",
      SourceLanguage::ObjCxxCppOutput => "objective-c++-cpp-output",
    }
  }

  /// Guess the language from a source file extension.
  pub fn from_extension(path: &Path) -> Option<Self> {
    let ext = path.extension()?.to_str()?;
    let lang = match ext {
      "c" => SourceLanguage::C,
      "cc" | "cpp" | "cxx" | "c++" | "C" => SourceLanguage::Cxx,
      "m" => SourceLanguage::ObjC,
      "mm" => SourceLanguage::ObjCxx,
      "cu" => SourceLanguage::Cuda,
      "hip" => SourceLanguage::Hip,
      "s" => SourceLanguage::Asm,
      "S" => SourceLanguage::AsmWithCpp,
      "i" => SourceLanguage::CCppOutput,
      "ii" => SourceLanguage::CxxCppOutput,
      "mi" => SourceLanguage::ObjCCppOutput,
      "mii" => SourceLanguage::ObjCxxCppOutput,
      _ => return None,
    };
    Some(lang)
  }
}

impl std::fmt::Display for SourceLanguage {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_flag())
  }
}
