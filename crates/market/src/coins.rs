//! Coin symbol registry.

use std::collections::HashMap;

/// The short canonical form of the SUI coin type.
pub const SUI_SHORT: &str = "0x2::sui::SUI";

/// The zero-padded form of the SUI coin type, as returned by price APIs.
pub const SUI_LONG: &str =
    "0x0000000000000000000000000000000000000000000000000000000000000002::sui::SUI";

/// Expand the short SUI coin type to its zero-padded form.
///
/// Price result mappings are keyed by the padded form; lookups that key by
/// the short form must normalize first or they silently miss.
pub fn normalize(coin_type: &str) -> &str {
    if coin_type == SUI_SHORT { SUI_LONG } else { coin_type }
}

/// Collapse the zero-padded SUI coin type back to its short form.
pub fn shorten(coin_type: &str) -> &str {
    if coin_type == SUI_LONG { SUI_SHORT } else { coin_type }
}

/// Mapping between human-readable coin symbols and on-chain coin types.
///
/// Built once at startup and read-only afterwards. Symbols are stored
/// uppercased; lookups are case-insensitive.
#[derive(Debug, Clone)]
pub struct CoinRegistry {
    symbol_to_type: HashMap<String, String>,
    type_to_symbol: HashMap<String, String>,
}

impl CoinRegistry {
    /// Create a registry with the supported mainnet coins.
    pub fn new() -> Self {
        let coins = [
            ("SUI", SUI_SHORT),
            (
                "AFSUI",
                "0xf325ce1300e8dac124071d3152c5c5ee6174914f8bc2161e88329cf579246efc::afsui::AFSUI",
            ),
            (
                "KSUI",
                "0x41ff228bfd566f0c707173ee6413962a77e3929588d010250e4e76f0d1cc0ad4::ksui::KSUI",
            ),
            (
                "USDC",
                "0x5d4b302506645c37ff133b98c4b50a5ae14841659738d6d733d59d0d217a93bf::coin::COIN",
            ),
            (
                "USDT",
                "0xc060006111016b8a020ad5b33834984a437aaa7d3c74c18e09a95d48aceab08c::coin::COIN",
            ),
            (
                "BTC",
                "0x027792d9fed7f9844eb4839566001bb6f6cb4804f66aa2da6fe1ee242d896881::coin::COIN",
            ),
            (
                "WETH",
                "0xaf8cd5edc19c4512f4259f0bee101a40d41ebed738ade5874359610ef8eeced5::coin::COIN",
            ),
            (
                "CETUS",
                "0x06864a6f921804860930db6ddbe2e16acdf8504495ea7481637a1c8b9a8fe54b::cetus::CETUS",
            ),
        ];

        let mut symbol_to_type = HashMap::new();
        let mut type_to_symbol = HashMap::new();
        for (symbol, coin_type) in coins {
            symbol_to_type.insert(symbol.to_string(), coin_type.to_string());
            type_to_symbol.insert(coin_type.to_string(), symbol.to_string());
        }

        Self {
            symbol_to_type,
            type_to_symbol,
        }
    }

    /// Resolve a symbol to its coin type, case-insensitively.
    pub fn resolve(&self, symbol: &str) -> Option<&str> {
        self.symbol_to_type
            .get(&symbol.to_uppercase())
            .map(String::as_str)
    }

    /// Reverse lookup: the symbol for a coin type.
    ///
    /// Accepts either SUI form.
    pub fn symbol_for(&self, coin_type: &str) -> Option<&str> {
        self.type_to_symbol
            .get(shorten(coin_type))
            .or_else(|| self.type_to_symbol.get(coin_type))
            .map(String::as_str)
    }

    /// Iterate over `(symbol, coin_type)` pairs.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.symbol_to_type
            .iter()
            .map(|(s, t)| (s.as_str(), t.as_str()))
    }
}

impl Default for CoinRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_is_case_insensitive() {
        let registry = CoinRegistry::new();
        assert_eq!(registry.resolve("sui"), registry.resolve("SUI"));
        assert_eq!(registry.resolve("afSUI"), registry.resolve("AFSUI"));
        assert!(registry.resolve("afSUI").is_some());
    }

    #[test]
    fn resolve_unknown_symbol() {
        let registry = CoinRegistry::new();
        assert!(registry.resolve("DOGE").is_none());
    }

    #[test]
    fn reverse_lookup_accepts_both_sui_forms() {
        let registry = CoinRegistry::new();
        assert_eq!(registry.symbol_for(SUI_SHORT), Some("SUI"));
        assert_eq!(registry.symbol_for(SUI_LONG), Some("SUI"));
    }

    #[test]
    fn normalize_round_trip() {
        assert_eq!(normalize(SUI_SHORT), SUI_LONG);
        assert_eq!(shorten(SUI_LONG), SUI_SHORT);
        let other = "0xabc::coin::COIN";
        assert_eq!(normalize(other), other);
        assert_eq!(shorten(other), other);
    }
}
