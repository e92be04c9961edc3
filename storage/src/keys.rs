//! Record key layout
//!
//! One sled tree holds every record under a type prefix. Numeric ids are
//! zero-padded so prefix scans return records in id order.

pub const ACCOUNT_PREFIX: &str = "account:";
pub const FARM_PREFIX: &str = "farm:";
pub const NFT_PREFIX: &str = "nft:";
pub const LOT_PREFIX: &str = "lot:";
pub const TRADE_PREFIX: &str = "trade:";
pub const HOLDINGS_PREFIX: &str = "holdings:";
pub const DISPLAY_PREFIX: &str = "display:";

pub const BUFFS: &str = "buffs";
pub const SCHEMA_VERSION: &str = "meta:schema_version";

pub fn account(id: u64) -> String {
    format!("{}{:020}", ACCOUNT_PREFIX, id)
}

pub fn holdings(id: u64) -> String {
    format!("{}{:020}", HOLDINGS_PREFIX, id)
}

pub fn display(display_id: u64) -> String {
    format!("{}{:020}", DISPLAY_PREFIX, display_id)
}

pub fn farm(id: u64) -> String {
    format!("{}{:020}", FARM_PREFIX, id)
}

pub fn nft(id: u64) -> String {
    format!("{}{:020}", NFT_PREFIX, id)
}

pub fn lot(id: u64) -> String {
    format!("{}{:020}", LOT_PREFIX, id)
}

pub fn trade(id: u64) -> String {
    format!("{}{:020}", TRADE_PREFIX, id)
}

pub fn counter(name: &str) -> String {
    format!("counter:{}", name)
}

pub fn minted(nft_type: &str) -> String {
    format!("minted:{}", nft_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_sort_numerically() {
        assert!(farm(9) < farm(10));
        assert!(farm(10).starts_with(FARM_PREFIX));
        assert_eq!(account(1), "account:00000000000000000001");
    }
}
