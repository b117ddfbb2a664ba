//! Bilingual field normalization.
//!
//! Records carry English and Arabic variants of their display text, and seed
//! data often fills only one side. Normalization fills the gaps on output so
//! the storefront always has something to show, without ever inventing a
//! name or overwriting text an author wrote.

/// Writing system a piece of text is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Script {
    Latin,
    Arabic,
    Unknown,
}

/// Display languages the storefront supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lang {
    En,
    Ar,
}

impl Lang {
    pub fn as_str(&self) -> &'static str {
        match self {
            Lang::En => "en",
            Lang::Ar => "ar",
        }
    }

    /// The script text in this language is expected to use.
    pub fn script(&self) -> Script {
        match self {
            Lang::En => Script::Latin,
            Lang::Ar => Script::Arabic,
        }
    }
}

fn is_arabic(c: char) -> bool {
    matches!(
        c,
        '\u{0600}'..='\u{06FF}'
            | '\u{0750}'..='\u{077F}'
            | '\u{08A0}'..='\u{08FF}'
            | '\u{FB50}'..='\u{FDFF}'
            | '\u{FE70}'..='\u{FEFF}'
    )
}

/// Detect the script of a piece of text.
///
/// Any Arabic character wins; otherwise any ASCII letter means Latin.
/// Digits and punctuation alone are [`Script::Unknown`].
pub fn detect_script(text: &str) -> Script {
    if text.chars().any(is_arabic) {
        Script::Arabic
    } else if text.chars().any(|c| c.is_ascii_alphabetic()) {
        Script::Latin
    } else {
        Script::Unknown
    }
}

/// Whether a field holds something worth showing.
pub fn is_present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// Fills missing language variants of display text.
pub trait Normalizer: Send + Sync {
    /// Fill a missing side of a name or title pair.
    fn fill_pair(&self, en: &mut Option<String>, ar: &mut Option<String>);

    /// Fill a missing side of a description pair, generating placeholder
    /// text from the names when both sides are empty.
    fn fill_description(
        &self,
        en: &mut Option<String>,
        ar: &mut Option<String>,
        name_en: Option<&str>,
        name_ar: Option<&str>,
    );
}

/// Copies text across languages only when its script fits the target.
///
/// English text is never copied into an Arabic field and vice versa, so a
/// record with only `name_en: "Shirt"` keeps `name_ar` empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptFallback;

impl ScriptFallback {
    fn copy_if_fits(source: &Option<String>, target: &mut Option<String>, lang: Lang) {
        if is_present(target) {
            return;
        }
        if let Some(text) = present(source) {
            if detect_script(text) == lang.script() {
                *target = Some(text.to_string());
            }
        }
    }
}

impl Normalizer for ScriptFallback {
    fn fill_pair(&self, en: &mut Option<String>, ar: &mut Option<String>) {
        Self::copy_if_fits(ar, en, Lang::En);
        Self::copy_if_fits(en, ar, Lang::Ar);
    }

    fn fill_description(
        &self,
        en: &mut Option<String>,
        ar: &mut Option<String>,
        name_en: Option<&str>,
        name_ar: Option<&str>,
    ) {
        self.fill_pair(en, ar);
        if is_present(en) || is_present(ar) {
            return;
        }

        let name_en = name_en.filter(|n| !n.trim().is_empty());
        let name_ar = name_ar.filter(|n| !n.trim().is_empty());

        let subject = name_en.or(name_ar).unwrap_or("this item");
        *en = Some(format!(
            "Discover {}, carefully selected for quality and value.",
            subject
        ));

        let subject = name_ar.or(name_en).unwrap_or("هذا المنتج");
        *ar = Some(format!("اكتشف {}، منتج مختار بعناية لجودته وقيمته.", subject));
    }
}

/// Records with bilingual display text.
pub trait Localize {
    fn localize(&mut self, normalizer: &dyn Normalizer);
}
