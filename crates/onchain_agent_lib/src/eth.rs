use secp256k1::{PublicKey, SecretKey};
use sha3::Digest;
use sha3::Keccak256;
use web3::types::Address;

use crate::err_custom_create;
use crate::error::AgentError;

pub fn get_eth_addr_from_secret(secret_key: &SecretKey) -> Address {
    Address::from_slice(
        &Keccak256::digest(
            &PublicKey::from_secret_key(&secp256k1::Secp256k1::new(), secret_key)
                .serialize_uncompressed()[1..65],
        )
        .as_slice()[12..],
    )
}

/// Parses a `0x` prefixed, 40 hex digit account address. Mixed case is
/// accepted without checksum validation.
pub fn parse_address(addr: &str) -> Result<Address, AgentError> {
    let addr = addr.trim();
    let Some(digits) = addr.strip_prefix("0x").or_else(|| addr.strip_prefix("0X")) else {
        return Err(err_custom_create!("Address must start with 0x: {}", addr));
    };
    if digits.len() != 40 {
        return Err(err_custom_create!(
            "Address must have 40 hex digits, got {}: {}",
            digits.len(),
            addr
        ));
    }
    let bytes = hex::decode(digits)
        .map_err(|err| err_custom_create!("Invalid address {}: {}", addr, err))?;
    Ok(Address::from_slice(&bytes))
}

pub fn format_address(addr: &Address) -> String {
    format!("{:#x}", addr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_get_eth_addr_from_secret() {
        let sk = SecretKey::from_str("0000000000000000000000000000000000000000000000000000000000000001").unwrap();
        let addr = format_address(&get_eth_addr_from_secret(&sk));
        assert_eq!(addr, "0x7e5f4552091a69125d5dfcb7b8c2659029395bdf");
    }

    #[test]
    fn test_parse_address() {
        let addr = parse_address("0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf").unwrap();
        assert_eq!(format_address(&addr), "0x7e5f4552091a69125d5dfcb7b8c2659029395bdf");

        assert!(parse_address("7e5f4552091a69125d5dfcb7b8c2659029395bdf").is_err());
        assert!(parse_address("0x7e5f").is_err());
        assert!(parse_address("0xzz5f4552091a69125d5dfcb7b8c2659029395bdf").is_err());
        assert!(parse_address("").is_err());
    }
}
