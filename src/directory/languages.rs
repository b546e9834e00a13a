use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use regex::Regex;

/// ISO 639-1 codes with the language's own name for itself.
const LANGUAGE_NAMES: &[(&str, &str)] = &[
    ("af", "Afrikaans"),
    ("ar", "العربية"),
    ("bg", "български"),
    ("bn", "বাংলা"),
    ("bs", "bosanski"),
    ("ca", "català"),
    ("cs", "čeština"),
    ("cy", "Cymraeg"),
    ("da", "dansk"),
    ("de", "Deutsch"),
    ("el", "Ελληνικά"),
    ("en", "English"),
    ("eo", "esperanto"),
    ("es", "español"),
    ("et", "eesti"),
    ("eu", "euskara"),
    ("fa", "فارسی"),
    ("fi", "suomi"),
    ("fr", "français"),
    ("ga", "Gaeilge"),
    ("gl", "galego"),
    ("he", "עברית"),
    ("hi", "हिन्दी"),
    ("hr", "hrvatski"),
    ("hu", "magyar"),
    ("hy", "հայերեն"),
    ("id", "Indonesia"),
    ("is", "íslenska"),
    ("it", "italiano"),
    ("ja", "日本語"),
    ("ka", "ქართული"),
    ("kk", "қазақ тілі"),
    ("ko", "한국어"),
    ("la", "Latina"),
    ("lt", "lietuvių"),
    ("lv", "latviešu"),
    ("mk", "македонски"),
    ("ms", "Melayu"),
    ("mt", "Malti"),
    ("nb", "norsk bokmål"),
    ("nl", "Nederlands"),
    ("nn", "nynorsk"),
    ("no", "norsk"),
    ("pl", "polski"),
    ("pt", "português"),
    ("ro", "română"),
    ("ru", "русский"),
    ("sk", "slovenčina"),
    ("sl", "slovenščina"),
    ("sq", "shqip"),
    ("sr", "српски"),
    ("sv", "svenska"),
    ("sw", "Kiswahili"),
    ("ta", "தமிழ்"),
    ("th", "ไทย"),
    ("tl", "Tagalog"),
    ("tr", "Türkçe"),
    ("uk", "українська"),
    ("ur", "اردو"),
    ("vi", "Tiếng Việt"),
    ("zh", "中文"),
];

static LANGUAGE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([a-z]{2})").expect("valid language regex"));

pub fn language_name(code: &str) -> Option<&'static str> {
    LANGUAGE_NAMES
        .binary_search_by(|(c, _)| c.cmp(&code))
        .ok()
        .map(|i| LANGUAGE_NAMES[i].1)
}

/// Reduces a stored language tag such as `de_AT`, `en-us` or `deu` to its
/// first two letters. Tags that do not start with two letters yield `None`.
pub fn primary_code(raw: &str) -> Option<String> {
    let lowered = raw.trim().to_ascii_lowercase();
    LANGUAGE_PREFIX
        .captures(&lowered)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Maps the language tags found on podcasts to display names, keyed by
/// primary code. Tags without a known name are dropped.
pub fn all_languages<I, S>(codes: I) -> BTreeMap<String, String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    codes
        .into_iter()
        .filter_map(|code| primary_code(code.as_ref()))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .filter_map(|code| language_name(&code).map(|name| (code, name.to_string())))
        .collect()
}
