//! Country alias and stage label tables.
//!
//! These are data, not logic: extend the tables without touching the
//! derivation in `metadata`. Bump `BUILTIN_ALIAS_VERSION` when the built-in
//! alias table changes.
//!
//! Alias matching is first-match-wins over a lower-cased substring test, so
//! an alias that contains another alias as a substring must be listed first
//! (`"czech republic"` before `"czech"`, `"nigeria"` before `"niger"`).
//! Aliases of up to `WHOLE_WORD_ALIAS_LEN` characters only match whole words
//! (`"usa"` must not hit "Jerusalem").

use crate::config::CountryAlias;
use crate::data_fetcher::models::CountryLabel;

pub const BUILTIN_ALIAS_VERSION: u32 = 4;

/// Aliases this short or shorter must match a whole word.
pub const WHOLE_WORD_ALIAS_LEN: usize = 4;

const BUILTIN_ALIASES: &[(&str, &str)] = &[
    // multi-word and containing names first
    ("czech republic", "CZ"),
    ("chinese taipei", "TW"),
    ("south korea", "KR"),
    ("korea republic", "KR"),
    ("new zealand", "NZ"),
    ("great britain", "GB"),
    ("united kingdom", "GB"),
    ("united states", "US"),
    ("north macedonia", "MK"),
    ("dominican republic", "DO"),
    ("puerto rico", "PR"),
    ("bosnia", "BA"),
    ("romania", "RO"),
    ("nigeria", "NG"),
    ("albania", "AL"),
    ("israel", "IL"),
    // nordics
    ("norway", "NO"),
    ("norwegian", "NO"),
    ("norge", "NO"),
    ("norsk", "NO"),
    ("eliteserien", "NO"),
    ("sweden", "SE"),
    ("swedish", "SE"),
    ("sverige", "SE"),
    ("denmark", "DK"),
    ("danish", "DK"),
    ("finland", "FI"),
    ("finnish", "FI"),
    ("iceland", "IS"),
    // rest of europe
    ("germany", "DE"),
    ("german", "DE"),
    ("bundesliga", "DE"),
    ("france", "FR"),
    ("french", "FR"),
    ("italy", "IT"),
    ("italian", "IT"),
    ("superlega", "IT"),
    ("spain", "ES"),
    ("spanish", "ES"),
    ("portugal", "PT"),
    ("netherlands", "NL"),
    ("dutch", "NL"),
    ("belgium", "BE"),
    ("poland", "PL"),
    ("polish", "PL"),
    ("plusliga", "PL"),
    ("czechia", "CZ"),
    ("czech", "CZ"),
    ("slovakia", "SK"),
    ("slovenia", "SI"),
    ("austria", "AT"),
    ("switzerland", "CH"),
    ("swiss", "CH"),
    ("türkiye", "TR"),
    ("turkey", "TR"),
    ("turkish", "TR"),
    ("greece", "GR"),
    ("greek", "GR"),
    ("serbia", "RS"),
    ("croatia", "HR"),
    ("hungary", "HU"),
    ("bulgaria", "BG"),
    ("estonia", "EE"),
    ("latvia", "LV"),
    ("lithuania", "LT"),
    ("ukraine", "UA"),
    ("russia", "RU"),
    ("england", "GB"),
    // elsewhere
    ("brazil", "BR"),
    ("argentina", "AR"),
    ("canada", "CA"),
    ("japan", "JP"),
    ("china", "CN"),
    ("iran", "IR"),
    ("qatar", "QA"),
    ("oman", "OM"),
    ("niger", "NE"),
    ("australia", "AU"),
    ("usa", "US"),
];

const COUNTRY_DISPLAY_NAMES: &[(&str, &str)] = &[
    ("NO", "Norge"),
    ("SE", "Sverige"),
    ("DK", "Danmark"),
    ("FI", "Finland"),
    ("IS", "Island"),
    ("DE", "Tyskland"),
    ("FR", "Frankrike"),
    ("IT", "Italia"),
    ("ES", "Spania"),
    ("PT", "Portugal"),
    ("NL", "Nederland"),
    ("BE", "Belgia"),
    ("PL", "Polen"),
    ("CZ", "Tsjekkia"),
    ("SK", "Slovakia"),
    ("SI", "Slovenia"),
    ("AT", "Østerrike"),
    ("CH", "Sveits"),
    ("TR", "Tyrkia"),
    ("GR", "Hellas"),
    ("RS", "Serbia"),
    ("HR", "Kroatia"),
    ("HU", "Ungarn"),
    ("RO", "Romania"),
    ("BG", "Bulgaria"),
    ("EE", "Estland"),
    ("LV", "Latvia"),
    ("LT", "Litauen"),
    ("UA", "Ukraina"),
    ("RU", "Russland"),
    ("GB", "Storbritannia"),
    ("US", "USA"),
    ("BR", "Brasil"),
    ("AR", "Argentina"),
    ("CA", "Canada"),
    ("JP", "Japan"),
    ("CN", "Kina"),
    ("KR", "Sør-Korea"),
    ("TW", "Taiwan"),
    ("IR", "Iran"),
    ("QA", "Qatar"),
    ("AU", "Australia"),
    ("NZ", "New Zealand"),
];

/// Ordered country alias table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasTable {
    pub version: u32,
    entries: Vec<(String, String)>,
}

impl AliasTable {
    /// Builds a table from `(alias, code)` pairs. Aliases are lower-cased and
    /// codes upper-cased; blank aliases are dropped.
    pub fn new(version: u32, entries: impl IntoIterator<Item = (String, String)>) -> Self {
        let entries = entries
            .into_iter()
            .map(|(alias, code)| (alias.trim().to_lowercase(), code.trim().to_uppercase()))
            .filter(|(alias, _)| !alias.is_empty())
            .collect();
        Self { version, entries }
    }

    pub fn builtin() -> Self {
        Self::new(
            BUILTIN_ALIAS_VERSION,
            BUILTIN_ALIASES
                .iter()
                .map(|(alias, code)| (alias.to_string(), code.to_string())),
        )
    }

    /// Returns a copy with `extra` checked before the existing entries.
    pub fn with_prefix(&self, extra: &[CountryAlias]) -> Self {
        let prefixed: Vec<(String, String)> = extra
            .iter()
            .map(|a| (a.alias.clone(), a.code.clone()))
            .chain(self.entries.iter().cloned())
            .collect();
        Self::new(self.version, prefixed)
    }

    /// First alias contained in the lower-cased `text` wins.
    pub fn lookup(&self, text: &str) -> Option<&str> {
        let haystack = text.to_lowercase();
        self.entries
            .iter()
            .find(|(alias, _)| alias_matches(&haystack, alias))
            .map(|(_, code)| code.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn alias_matches(haystack: &str, alias: &str) -> bool {
    if alias.chars().count() > WHOLE_WORD_ALIAS_LEN {
        return haystack.contains(alias);
    }
    haystack.match_indices(alias).any(|(start, _)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + alias.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

impl Default for AliasTable {
    fn default() -> Self {
        Self::builtin()
    }
}

pub fn country_display_name(code: &str) -> Option<&'static str> {
    COUNTRY_DISPLAY_NAMES
        .iter()
        .find(|(c, _)| c.eq_ignore_ascii_case(code))
        .map(|(_, name)| *name)
}

/// Regional-indicator flag for a two-letter code, e.g. "NO" -> 🇳🇴.
pub fn flag_glyph(code: &str) -> Option<String> {
    if code.len() != 2 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    code.to_ascii_uppercase()
        .chars()
        .map(|c| char::from_u32(0x1F1E6 + (c as u32 - 'A' as u32)))
        .collect()
}

/// Builds the full country label for a code.
pub fn country_label(code: &str) -> CountryLabel {
    let code = code.to_ascii_uppercase();
    CountryLabel {
        flag: flag_glyph(&code),
        label: country_display_name(&code)
            .map(str::to_string)
            .unwrap_or_else(|| code.clone()),
        code,
    }
}

/// One stage rule: any `needles` substring matches unless an `excludes` substring is present.
pub struct StageRule {
    pub needles: &'static [&'static str],
    pub excludes: &'static [&'static str],
    pub label: &'static str,
}

/// Evaluated in order, first match wins.
pub const STAGE_RULES: &[StageRule] = &[
    StageRule {
        needles: &["final"],
        excludes: &["semi", "quarter", "eighth"],
        label: "Finale",
    },
    StageRule {
        needles: &["semi"],
        excludes: &[],
        label: "Semifinale",
    },
    StageRule {
        needles: &["quarter"],
        excludes: &[],
        label: "Kvartfinale",
    },
    StageRule {
        needles: &["eighth"],
        excludes: &[],
        label: "Åttendedelsfinale",
    },
    StageRule {
        needles: &["playoff", "play-offs"],
        excludes: &[],
        label: "Sluttspill",
    },
    StageRule {
        needles: &["regular"],
        excludes: &[],
        label: "Seriespill",
    },
];
