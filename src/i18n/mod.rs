//! Localized report labels.
//!
//! Lookups never fail: an unsupported language falls back to
//! [`DEFAULT_LANGUAGE`] and an unknown key is returned unchanged.

mod catalog;

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// Language used when nothing else matches.
pub const DEFAULT_LANGUAGE: &str = "en-US";

/// Supported language codes with their native names.
pub const SUPPORTED_LANGUAGES: &[(&str, &str)] = &[("en-US", "English"), ("zh-CN", "简体中文")];

/// Locale environment variables, in precedence order.
const LOCALE_ENV_VARS: &[&str] = &["LC_ALL", "LC_MESSAGES", "LANG"];

static CATALOGS: Lazy<HashMap<&'static str, HashMap<&'static str, &'static str>>> =
    Lazy::new(|| {
        let mut catalogs = HashMap::new();
        catalogs.insert("en-US", catalog::EN_US.iter().copied().collect());
        catalogs.insert("zh-CN", catalog::ZH_CN.iter().copied().collect());
        catalogs
    });

/// Look up a label.
pub fn get_text<'a>(language: &str, key: &'a str) -> &'a str {
    let language = normalize_language(language).unwrap_or(DEFAULT_LANGUAGE);
    CATALOGS
        .get(language)
        .and_then(|catalog| catalog.get(key))
        .or_else(|| CATALOGS.get(DEFAULT_LANGUAGE).and_then(|catalog| catalog.get(key)))
        .copied()
        .unwrap_or(key)
}

/// Map a language code or locale string onto a supported language.
///
/// Accepts `zh-CN`, `zh_CN.UTF-8`, `EN`, `en_GB@euro` and similar forms.
pub fn normalize_language(code: &str) -> Option<&'static str> {
    let code = code.split(['.', '@']).next().unwrap_or_default().trim().replace('_', "-");
    if code.is_empty() {
        return None;
    }

    if let Some((supported, _)) =
        SUPPORTED_LANGUAGES.iter().find(|(lang, _)| lang.eq_ignore_ascii_case(&code))
    {
        return Some(supported);
    }

    let primary = code.split('-').next().unwrap_or_default();
    SUPPORTED_LANGUAGES
        .iter()
        .map(|(lang, _)| *lang)
        .find(|lang| lang.split('-').next().is_some_and(|p| p.eq_ignore_ascii_case(primary)))
}

/// Pick the report language.
///
/// `setting` is a language code or `auto`; with `auto` the `preferred`
/// collaborator supplies the ambient locale.
pub fn resolve_language<F>(setting: &str, preferred: F) -> &'static str
where
    F: FnOnce() -> Option<String>,
{
    let setting = setting.trim();
    if setting.is_empty() || setting.eq_ignore_ascii_case("auto") {
        let ambient = preferred();
        return ambient.as_deref().and_then(normalize_language).unwrap_or_else(|| {
            tracing::debug!("Ambient locale {:?} not supported, using {}", ambient, DEFAULT_LANGUAGE);
            DEFAULT_LANGUAGE
        });
    }

    normalize_language(setting).unwrap_or_else(|| {
        tracing::warn!("Unsupported language '{}', using {}", setting, DEFAULT_LANGUAGE);
        DEFAULT_LANGUAGE
    })
}

/// Ambient UI locale from the environment.
pub fn system_language() -> Option<String> {
    LOCALE_ENV_VARS
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty() && value != "C" && value != "POSIX")
}

/// Labels bound to one language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Texts {
    language: &'static str,
}

impl Default for Texts {
    fn default() -> Self {
        Self { language: DEFAULT_LANGUAGE }
    }
}

impl Texts {
    /// Bind labels to a language; unsupported codes fall back to the default.
    pub fn new(language: &str) -> Self {
        Self { language: normalize_language(language).unwrap_or(DEFAULT_LANGUAGE) }
    }

    /// The bound language code.
    pub fn language(&self) -> &'static str {
        self.language
    }

    /// Look up a label.
    pub fn get<'a>(&self, key: &'a str) -> &'a str {
        get_text(self.language, key)
    }
}
