/// Map a network identifier to the short alias used as a prefix of the emitted constants.
///
/// Identifiers outside the table are returned unchanged.
pub fn resolve_alias(network: &str) -> &str {
    match network {
        "mainnet" => "main",
        "testnet" => "test",
        "devnet" => "dev",
        "localhost" | "hardhat" => "local",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use assert2::assert;
    use rstest::rstest;

    use super::resolve_alias;

    #[rstest]
    #[case("mainnet", "main")]
    #[case("testnet", "test")]
    #[case("devnet", "dev")]
    #[case("localhost", "local")]
    #[case("hardhat", "local")]
    fn known_networks_are_shortened(#[case] network: &str, #[case] alias: &str) {
        assert!(resolve_alias(network) == alias);
        // Repeated lookups are stable.
        assert!(resolve_alias(network) == resolve_alias(network));
    }

    #[rstest]
    #[case("foo")]
    #[case("unknown-chain")]
    #[case("local")]
    #[case("ropsten")]
    #[case("")]
    fn unknown_networks_fall_back_to_identity(#[case] network: &str) {
        assert!(resolve_alias(network) == network);
    }
}
