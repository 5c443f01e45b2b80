//! Vendor normalization: raw statement descriptions to canonical merchant
//! names via an ordered table of start-anchored patterns.

use centavo_core::Vendor;
use regex::{Regex, RegexBuilder};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NormalizerError {
    #[error("invalid vendor pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },
}

/// Default pattern table: `(pattern, canonical name)`, evaluated
/// top-to-bottom. Ordering is curated, not computed — multi-token variants
/// (fuel stations of grocery chains) come before their generic parent so
/// they are recognized as distinct vendors.
pub const DEFAULT_VENDOR_PATTERNS: &[(&str, &str)] = &[
    ("KROGER FUEL.*", "KROGER FUEL"),
    ("KROGER.*", "KROGER"),
    ("COSTCO GAS.*", "COSTCO GAS"),
    ("COSTCO WHSE.*", "COSTCO"),
    ("INDIFRESH.*|TST\\*INDI FRESH.*", "INDIFRESH"),
    ("CHERIANS INTERNATIONAL.*", "CHERIANS INTERNATIONAL"),
    ("FRESH MEAT IN MART.*", "FRESH MEAT IN MART"),
    ("WEGMANS.*", "WEGMANS"),
    ("PUBLIX.*", "PUBLIX"),
    ("FCS FOOD AND NUTRITION.*", "FCS FOOD AND NUTRITION"),
    ("PATEL BROTHERS.*", "PATEL BROTHERS"),
    ("AMAZON.*", "AMAZON"),
    ("SQ \\*NALAN INDIAN CUISINE.*", "NALAN INDIAN CUISINE"),
    ("TACO BELL.*", "TACO BELL"),
    ("DOMINO'S.*", "DOMINOS"),
    ("TARGET.*", "TARGET"),
    ("WAL-?MART.*", "WALMART"),
    ("DOLLAR TREE.*|DOLLAR-GENERAL.*", "DOLLAR TREE"),
    ("SHELL OIL.*", "SHELL"),
    ("MCDONALD'S.*", "MCDONALDS"),
    ("DUNKIN.*", "DUNKIN"),
    ("CHIPOTLE.*", "CHIPOTLE"),
    ("SUBWAY.*", "SUBWAY"),
    ("LEAGUE TENNIS.*", "LEAGUE TENNIS"),
    ("TELLO US.*", "TELLO"),
    ("TMOBILE\\*AUTO PAY.*", "TMOBILE"),
    ("COMCAST-XFINITY.*", "COMCAST"),
    ("SAWNEE ELECTRIC MEMBERSH.*", "SAWNEE ELECTRIC"),
    ("CONSTELLATION NEW ENERGY.*", "CONSTELLATION ENERGY"),
    ("FC WATER&SEWER.*", "FC WATER&SEWER"),
    ("RED OAK SANITATION.*", "RED OAK SANITATION"),
    ("WWP\\*GOT BUGS INC.*", "WWP GOT BUGS"),
    ("TRAVELERS-GEICO AGENCY.*", "TRAVELERS-GEICO"),
    ("AAA LIFE INSURANCE.*", "AAA LIFE INSURANCE"),
    ("THE EMORY CLINIC, INC.*", "EMORY CLINIC"),
    ("TELADOC.*", "TELADOC"),
    ("HAWKMUSICACADEMY.*", "HAWKMUSIC ACADEMY"),
    ("JFI\\*URBAN AIR.*", "URBAN AIR"),
    ("AMC .*|AMC \\d+ ONLINE.*", "AMC"),
    ("TJ MAXX.*", "TJ MAXX"),
    ("TST\\* ?DESI DISTRICT.*|TST\\*DESI.*|SQ \\*DESI.*", "DESI DISTRICT"),
    ("SQ \\*BEAUTY AMBASSADORS.*", "BEAUTY AMBASSADORS"),
    ("TANISHQ - ATLANTA.*", "TANISHQ"),
    ("THE HOME DEPOT .*|HOMEDEPOT.*", "HOME DEPOT"),
    ("WAWA \\d+.*", "WAWA"),
    ("ATGPAY ONLINE PA.*", "ATGPAY"),
    ("NSM DBAMR\\.COOPER.*", "NSM DBAMR.COOPER"),
    ("PAYPAL.*", "PAYPAL"),
    ("ROSS STORE.*", "ROSS"),
    ("FORSYTH COUNTY.*", "FORSYTH COUNTY"),
];

/// Maps a raw transaction description to a canonical vendor name.
///
/// Each pattern is compiled start-anchored and case-insensitive and tested
/// against the upper-cased description in table order; the first match wins.
/// With no match, the canonical vendor is the first whitespace-delimited
/// token of the upper-cased description. Pure — the table is fixed at
/// construction.
pub struct VendorNormalizer {
    patterns: Vec<(Regex, String)>,
}

impl VendorNormalizer {
    pub fn new(table: &[(&str, &str)]) -> Result<Self, NormalizerError> {
        let mut patterns = Vec::with_capacity(table.len());
        for (pattern, canonical) in table {
            let regex = RegexBuilder::new(&format!("^(?:{pattern})"))
                .case_insensitive(true)
                .build()
                .map_err(|source| NormalizerError::InvalidPattern {
                    pattern: (*pattern).to_string(),
                    source,
                })?;
            patterns.push((regex, (*canonical).to_string()));
        }
        Ok(VendorNormalizer { patterns })
    }

    pub fn with_defaults() -> Result<Self, NormalizerError> {
        Self::new(DEFAULT_VENDOR_PATTERNS)
    }

    pub fn normalize(&self, description: &str) -> Vendor {
        let upper = description.trim().to_uppercase();
        for (regex, canonical) in &self.patterns {
            if regex.is_match(&upper) {
                return Vendor::new(canonical.clone());
            }
        }
        Vendor::new(upper.split_whitespace().next().unwrap_or(""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer() -> VendorNormalizer {
        VendorNormalizer::with_defaults().unwrap()
    }

    #[test]
    fn default_table_compiles() {
        assert_eq!(
            normalizer().patterns.len(),
            DEFAULT_VENDOR_PATTERNS.len()
        );
    }

    #[test]
    fn first_matching_pattern_wins() {
        let n = normalizer();
        assert_eq!(n.normalize("KROGER #688 CUMMING GA").as_str(), "KROGER");
        // Fuel variant is listed ahead of the parent chain.
        assert_eq!(n.normalize("KROGER FUEL #9912").as_str(), "KROGER FUEL");
        assert_eq!(n.normalize("COSTCO GAS #0123").as_str(), "COSTCO GAS");
        assert_eq!(n.normalize("COSTCO WHSE #0123").as_str(), "COSTCO");
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(normalizer().normalize("kroger #12").as_str(), "KROGER");
    }

    #[test]
    fn matching_is_anchored_at_start() {
        // "PAYMENT TO KROGER" does not start with KROGER; falls back to the
        // first token.
        assert_eq!(normalizer().normalize("PAYMENT TO KROGER").as_str(), "PAYMENT");
    }

    #[test]
    fn prefix_processor_tags_resolve() {
        let n = normalizer();
        assert_eq!(n.normalize("SQ *NALAN INDIAN CUISINE GA").as_str(), "NALAN INDIAN CUISINE");
        assert_eq!(n.normalize("TST*DESI DISTRICT IRVING").as_str(), "DESI DISTRICT");
        assert_eq!(n.normalize("JFI*URBAN AIR ALPHARETTA").as_str(), "URBAN AIR");
    }

    #[test]
    fn alternation_variants_share_a_canonical_name() {
        let n = normalizer();
        assert_eq!(n.normalize("WAL-MART #2717").as_str(), "WALMART");
        assert_eq!(n.normalize("WALMART.COM").as_str(), "WALMART");
        assert_eq!(n.normalize("THE HOME DEPOT #123").as_str(), "HOME DEPOT");
        assert_eq!(n.normalize("HOMEDEPOT.COM").as_str(), "HOME DEPOT");
    }

    #[test]
    fn fallback_is_first_token_uppercased() {
        let n = normalizer();
        assert_eq!(n.normalize("Blue Bottle Coffee").as_str(), "BLUE");
        assert_eq!(n.normalize("  zaxby's 101  ").as_str(), "ZAXBY'S");
    }

    #[test]
    fn empty_description_normalizes_to_empty_vendor() {
        assert_eq!(normalizer().normalize("").as_str(), "");
        assert_eq!(normalizer().normalize("   ").as_str(), "");
    }

    #[test]
    fn invalid_pattern_is_rejected_at_construction() {
        let err = VendorNormalizer::new(&[("KROGER(", "KROGER")]);
        assert!(matches!(err, Err(NormalizerError::InvalidPattern { .. })));
    }
}
