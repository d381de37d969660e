/// Raw and lower-cased views over one document's text.
///
/// Contact fields are matched against the raw view so addresses keep their
/// original casing; everything else is matched against the lower-cased view.
#[derive(Debug, Clone)]
pub struct NormalizedText<'a> {
    raw: &'a str,
    lowered: String,
}

impl<'a> NormalizedText<'a> {
    pub fn new(raw: &'a str) -> Self {
        Self {
            raw,
            lowered: raw.to_lowercase(),
        }
    }

    pub fn raw(&self) -> &str {
        self.raw
    }

    pub fn lowered(&self) -> &str {
        &self.lowered
    }

    pub fn is_blank(&self) -> bool {
        self.raw.trim().is_empty()
    }
}

/// Title-cases a vocabulary term: a letter following a non-letter is upper-cased,
/// every other letter lower-cased. `ci/cd` → `Ci/Cd`, `c++` → `C++`.
pub fn title_case(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    let mut prev_is_letter = false;
    for ch in term.chars() {
        if ch.is_alphabetic() {
            if prev_is_letter {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(ch);
            prev_is_letter = false;
        }
    }
    out
}
