//! Target languages.
//!
//! Each [Language] carries the data the pipeline needs about it
//! (accepted scripts, token multiplier, default share of the token target)
//! so that the rest of the code never branches on language names.
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::identifiers::ScriptClass;

/// Writing system family, used to pick the cleaning pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScriptFamily {
    Latin,
    Devanagari,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[serde(alias = "en")]
    English,
    #[serde(alias = "hi")]
    Hindi,
    #[serde(alias = "sa")]
    Sanskrit,
}

struct LanguageInfo {
    name: &'static str,
    code: &'static str,
    multiplier: f64,
    share: f64,
    enforces_budget: bool,
    family: ScriptFamily,
    accepted: &'static [ScriptClass],
}

static ENGLISH: LanguageInfo = LanguageInfo {
    name: "english",
    code: "en",
    multiplier: 1.3,
    share: 0.5,
    enforces_budget: true,
    family: ScriptFamily::Latin,
    accepted: &[ScriptClass::Latin],
};

// Hindi text routinely carries English terms, hence the mixed classes.
static HINDI: LanguageInfo = LanguageInfo {
    name: "hindi",
    code: "hi",
    multiplier: 1.8,
    share: 0.35,
    enforces_budget: true,
    family: ScriptFamily::Devanagari,
    accepted: &[
        ScriptClass::Devanagari,
        ScriptClass::MixedDevanagari,
        ScriptClass::Mixed,
    ],
};

// Sanskrit data is scarce: the budget is reported against, never enforced.
static SANSKRIT: LanguageInfo = LanguageInfo {
    name: "sanskrit",
    code: "sa",
    multiplier: 2.0,
    share: 0.15,
    enforces_budget: false,
    family: ScriptFamily::Devanagari,
    accepted: &[ScriptClass::Devanagari],
};

impl Language {
    pub const ALL: [Language; 3] = [Language::English, Language::Hindi, Language::Sanskrit];

    fn info(&self) -> &'static LanguageInfo {
        match self {
            Language::English => &ENGLISH,
            Language::Hindi => &HINDI,
            Language::Sanskrit => &SANSKRIT,
        }
    }

    /// Lowercase name, also used for output directories and file names.
    pub fn name(&self) -> &'static str {
        self.info().name
    }

    /// ISO 639-1 code.
    pub fn code(&self) -> &'static str {
        self.info().code
    }

    /// Average number of subword tokens per whitespace-delimited word.
    pub fn token_multiplier(&self) -> f64 {
        self.info().multiplier
    }

    /// Default fraction of the overall token target.
    pub fn default_share(&self) -> f64 {
        self.info().share
    }

    /// Whether collection stops once the budget is reached.
    pub fn enforces_budget(&self) -> bool {
        self.info().enforces_budget
    }

    pub fn script_family(&self) -> ScriptFamily {
        self.info().family
    }

    pub fn accepted_scripts(&self) -> &'static [ScriptClass] {
        self.info().accepted
    }

    /// Acceptance predicate: is text of this script class suitable for this language?
    pub fn accepts(&self, class: ScriptClass) -> bool {
        self.accepted_scripts().contains(&class)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Language {
    type Err = Error;

    /// Parses either the name (`hindi`) or the code (`hi`), case insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Language::ALL
            .iter()
            .find(|lang| lang.name() == needle || lang.code() == needle)
            .copied()
            .ok_or(Error::UnknownLang(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_names_and_codes() {
        assert_eq!(Language::from_str("hindi").unwrap(), Language::Hindi);
        assert_eq!(Language::from_str("SA").unwrap(), Language::Sanskrit);
        assert_eq!(Language::from_str(" English ").unwrap(), Language::English);
        assert!(matches!(
            Language::from_str("klingon"),
            Err(Error::UnknownLang(_))
        ));
    }

    #[test]
    fn acceptance() {
        assert!(Language::Hindi.accepts(ScriptClass::Mixed));
        assert!(Language::Hindi.accepts(ScriptClass::MixedDevanagari));
        assert!(!Language::Hindi.accepts(ScriptClass::Latin));

        assert!(Language::Sanskrit.accepts(ScriptClass::Devanagari));
        assert!(!Language::Sanskrit.accepts(ScriptClass::MixedDevanagari));

        assert!(Language::English.accepts(ScriptClass::Latin));
        assert!(!Language::English.accepts(ScriptClass::LatinDominant));
        assert!(!Language::English.accepts(ScriptClass::Mixed));

        for lang in Language::ALL {
            assert!(!lang.accepts(ScriptClass::Unknown));
        }
    }

    #[test]
    fn shares_sum_to_one() {
        let total: f64 = Language::ALL.iter().map(Language::default_share).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn only_sanskrit_is_uncapped() {
        assert!(Language::English.enforces_budget());
        assert!(Language::Hindi.enforces_budget());
        assert!(!Language::Sanskrit.enforces_budget());
    }
}
