//! Header-to-key normalization.

/// Turns a raw header cell into the identifier used for keyed row access.
///
/// Implementations must be pure. Any `Fn(&str) -> String` closure is a
/// normalizer, so callers can inject their own rules:
///
/// ```
/// use sheetquery_sheet::KeyNormalizer;
///
/// let lower = |raw: &str| raw.to_lowercase();
/// assert_eq!(lower.normalize("Qty"), "qty");
/// ```
pub trait KeyNormalizer: Send + Sync {
    fn normalize(&self, raw: &str) -> String;
}

impl<F> KeyNormalizer for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn normalize(&self, raw: &str) -> String {
        self(raw)
    }
}

/// Default normalizer producing camelCase identifiers.
///
/// Words are split on any non-alphanumeric character and on case boundaries
/// (`fooBar`, `XMLHttp`). The first word is lower-cased, the rest are
/// capitalised.
#[derive(Debug, Clone, Copy, Default)]
pub struct CamelCase;

impl KeyNormalizer for CamelCase {
    fn normalize(&self, raw: &str) -> String {
        let mut out = String::with_capacity(raw.len());
        for (i, word) in split_words(raw).iter().enumerate() {
            let lower = word.to_lowercase();
            if i == 0 {
                out.push_str(&lower);
                continue;
            }
            let mut chars = lower.chars();
            if let Some(first) = chars.next() {
                out.extend(first.to_uppercase());
                out.push_str(chars.as_str());
            }
        }
        out
    }
}

fn split_words(raw: &str) -> Vec<String> {
    let chars: Vec<char> = raw.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &ch) in chars.iter().enumerate() {
        if !ch.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        if ch.is_uppercase() {
            if let Some(prev) = current.chars().last() {
                let next_is_lower = chars.get(i + 1).is_some_and(|c| c.is_lowercase());
                // fooBar -> foo|Bar, XMLHttp -> XML|Http
                if prev.is_lowercase()
                    || prev.is_numeric()
                    || (prev.is_uppercase() && next_is_lower)
                {
                    words.push(std::mem::take(&mut current));
                }
            }
        }
        current.push(ch);
    }

    if !current.is_empty() {
        words.push(current);
    }
    words
}
