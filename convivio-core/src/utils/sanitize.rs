use once_cell::sync::Lazy;
use regex::Regex;

// I blocchi script/style vanno rimossi per interi (tag + contenuto),
// per tutti gli altri tag si butta il markup e si tiene il testo.
static SCRIPT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>").expect("valid regex"));
static STYLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<style\b[^>]*>.*?</style\s*>").expect("valid regex"));
static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<[^>]*>").expect("valid regex"));

/// Ripulisce il testo libero arrivato dal client da HTML e script
/// prima che venga persistito.
pub fn strip_html(input: &str) -> String {
    let no_script = SCRIPT_RE.replace_all(input, "");
    let no_style = STYLE_RE.replace_all(&no_script, "");
    TAG_RE.replace_all(&no_style, "").into_owned()
}
