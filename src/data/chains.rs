use crate::data::types::ChainConfig;

/// Get a chain configuration preset by name.
pub fn get_chain_config(name: &str) -> Option<ChainConfig> {
    let (name, chain_id, rpc_url, symbol) = match name.to_lowercase().as_str() {
        "localhost" | "local" | "anvil" | "hardhat" => {
            ("Localhost", 31337, "http://127.0.0.1:8545", "ETH")
        }
        "ethereum" | "eth" | "mainnet" => ("Ethereum", 1, "https://eth.merkle.io", "ETH"),
        "sepolia" => ("Sepolia", 11155111, "https://rpc.sepolia.org", "ETH"),
        "arbitrum" | "arb" => ("Arbitrum One", 42161, "https://arb1.arbitrum.io/rpc", "ETH"),
        "optimism" | "op" => ("Optimism", 10, "https://mainnet.optimism.io", "ETH"),
        "base" => ("Base", 8453, "https://mainnet.base.org", "ETH"),
        "polygon" | "matic" => ("Polygon", 137, "https://polygon-rpc.com", "MATIC"),
        _ => return None,
    };

    Some(ChainConfig {
        name: name.to_string(),
        chain_id,
        rpc_url: rpc_url.to_string(),
        symbol: symbol.to_string(),
    })
}

/// Display name for a chain id, used when no preset was selected.
pub fn chain_name(chain_id: u64) -> &'static str {
    match chain_id {
        31337 => "Localhost",
        1 => "Mainnet",
        11155111 => "Sepolia",
        10 => "Optimism",
        42161 => "Arbitrum",
        8453 => "Base",
        137 => "Polygon",
        _ => "Unknown",
    }
}

/// Return a list of all supported chain names.
pub fn supported_chains() -> Vec<&'static str> {
    vec![
        "localhost",
        "ethereum",
        "sepolia",
        "arbitrum",
        "optimism",
        "base",
        "polygon",
    ]
}
